//! Level definitions and the built-in campaign
//!
//! Levels are data. Geometry never changes after construction; only the
//! `collected` flags of the active level mutate during play.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Collectible, GeometryKind, StaticGeometry};
use super::geometry::StaticGeometry as G;
use crate::consts::{SPAWN_X, SPAWN_Y};

/// One playable stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// 1-based position in the campaign
    pub number: u32,
    pub geometry: Vec<StaticGeometry>,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
    pub spawn: Vec2,
}

impl Level {
    pub fn new(number: u32, geometry: Vec<StaticGeometry>, collectibles: Vec<Collectible>) -> Self {
        Self {
            number,
            geometry,
            collectibles,
            spawn: Vec2::new(SPAWN_X, SPAWN_Y),
        }
    }

    /// Clear every `collected` flag
    pub fn reset(&mut self) {
        for item in &mut self.collectibles {
            item.collected = false;
        }
    }

    pub fn remaining(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }

    pub fn has_goal(&self) -> bool {
        self.geometry.iter().any(|g| g.kind == GeometryKind::Goal)
    }
}

/// Ordered campaign of levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    /// Build a set, renumbering levels 1..=N in the given order
    pub fn new(mut levels: Vec<Level>) -> Self {
        for (i, level) in levels.iter_mut().enumerate() {
            level.number = i as u32 + 1;
        }
        Self { levels }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level by 1-based number
    pub fn get(&self, number: u32) -> Option<&Level> {
        let idx = (number as usize).checked_sub(1)?;
        self.levels.get(idx)
    }

    pub fn get_mut(&mut self, number: u32) -> Option<&mut Level> {
        let idx = (number as usize).checked_sub(1)?;
        self.levels.get_mut(idx)
    }

    pub fn is_last(&self, number: u32) -> bool {
        number as usize >= self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// The fifteen-level banana campaign
    pub fn campaign() -> Self {
        Self::new(campaign_levels())
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::campaign()
    }
}

#[derive(Clone, Copy)]
enum Wave {
    Sin,
    Cos,
}

/// Coins laid out along a sine/cosine curve
fn coin_wave(count: u32, x0: f32, dx: f32, y0: f32, amp: f32, freq: f32, wave: Wave) -> Vec<Collectible> {
    (0..count)
        .map(|i| {
            let phase = i as f32 * freq;
            let offset = match wave {
                Wave::Sin => phase.sin(),
                Wave::Cos => phase.cos(),
            };
            Collectible::coin(x0 + i as f32 * dx, y0 + offset * amp)
        })
        .collect()
}

fn coins(points: &[(f32, f32)]) -> Vec<Collectible> {
    points.iter().map(|&(x, y)| Collectible::coin(x, y)).collect()
}

fn ground() -> StaticGeometry {
    StaticGeometry::ground(0.0, 550.0, 800.0, 50.0)
}

fn campaign_levels() -> Vec<Level> {
    vec![
        // 1: tutorial staircase
        Level::new(
            1,
            vec![
                ground(),
                G::solid(100.0, 450.0, 100.0, 30.0),
                G::solid(250.0, 400.0, 100.0, 30.0),
                G::solid(400.0, 350.0, 100.0, 30.0),
                G::solid(550.0, 300.0, 100.0, 30.0),
                G::goal(650.0, 100.0, 100.0, 150.0),
            ],
            coins(&[(120.0, 420.0), (270.0, 370.0), (420.0, 320.0), (570.0, 270.0), (600.0, 280.0)]),
        ),
        // 2: first spikes
        Level::new(
            2,
            vec![
                ground(),
                G::solid(100.0, 450.0, 150.0, 30.0),
                G::solid(350.0, 400.0, 150.0, 30.0),
                G::solid(600.0, 350.0, 150.0, 30.0),
                G::solid(350.0, 300.0, 150.0, 30.0),
                G::solid(100.0, 250.0, 150.0, 30.0),
                G::hazard(375.0, 385.0, 30.0, 20.0),
                G::hazard(625.0, 335.0, 30.0, 20.0),
                G::goal(100.0, 50.0, 100.0, 150.0),
            ],
            coins(&[
                (220.0, 420.0),
                (170.0, 380.0),
                (280.0, 350.0),
                (450.0, 380.0),
                (520.0, 340.0),
                (670.0, 320.0),
                (180.0, 270.0),
                (420.0, 280.0),
                (550.0, 280.0),
                (720.0, 300.0),
            ]),
        ),
        // 3: varied jump heights
        Level::new(
            3,
            vec![
                ground(),
                G::solid(100.0, 480.0, 80.0, 30.0),
                G::solid(250.0, 450.0, 80.0, 30.0),
                G::solid(400.0, 400.0, 80.0, 30.0),
                G::solid(550.0, 320.0, 80.0, 30.0),
                G::solid(400.0, 240.0, 80.0, 30.0),
                G::solid(250.0, 180.0, 80.0, 30.0),
                G::goal(75.0, 20.0, 100.0, 150.0),
            ],
            coins(&[
                (120.0, 450.0),
                (270.0, 420.0),
                (420.0, 370.0),
                (570.0, 290.0),
                (420.0, 210.0),
                (270.0, 150.0),
                (200.0, 250.0),
                (500.0, 350.0),
                (320.0, 300.0),
                (180.0, 350.0),
            ]),
        ),
        // 4: bounce pads
        Level::new(
            4,
            vec![
                ground(),
                G::solid(100.0, 450.0, 120.0, 30.0),
                G::bounce(300.0, 500.0, 120.0, 20.0),
                G::solid(500.0, 400.0, 120.0, 30.0),
                G::bounce(700.0, 500.0, 120.0, 20.0),
                G::solid(500.0, 250.0, 120.0, 30.0),
                G::hazard(325.0, 385.0, 30.0, 20.0),
                G::hazard(725.0, 335.0, 30.0, 20.0),
                G::goal(675.0, 50.0, 100.0, 150.0),
            ],
            coins(&[
                (120.0, 420.0),
                (180.0, 280.0),
                (260.0, 200.0),
                (350.0, 300.0),
                (420.0, 350.0),
                (520.0, 370.0),
                (580.0, 220.0),
                (620.0, 300.0),
                (550.0, 180.0),
                (450.0, 150.0),
            ]),
        ),
        // 5: mixed
        Level::new(
            5,
            vec![
                ground(),
                G::solid(100.0, 480.0, 100.0, 30.0),
                G::bounce(300.0, 450.0, 100.0, 20.0),
                G::solid(500.0, 400.0, 100.0, 30.0),
                G::bounce(700.0, 350.0, 100.0, 20.0),
                G::solid(500.0, 300.0, 100.0, 30.0),
                G::solid(300.0, 250.0, 100.0, 30.0),
                G::bounce(100.0, 200.0, 100.0, 20.0),
                G::hazard(420.0, 435.0, 30.0, 20.0),
                G::hazard(525.0, 385.0, 30.0, 20.0),
                G::hazard(620.0, 335.0, 30.0, 20.0),
                G::hazard(325.0, 235.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            coins(&[
                (120.0, 450.0),
                (180.0, 350.0),
                (250.0, 220.0),
                (350.0, 420.0),
                (420.0, 270.0),
                (520.0, 370.0),
                (570.0, 220.0),
                (620.0, 280.0),
                (150.0, 170.0),
                (320.0, 180.0),
                (520.0, 180.0),
                (420.0, 350.0),
                (580.0, 350.0),
                (180.0, 280.0),
                (450.0, 200.0),
            ]),
        ),
        Level::new(
            6,
            vec![
                ground(),
                G::solid(100.0, 480.0, 80.0, 30.0),
                G::bounce(250.0, 420.0, 80.0, 20.0),
                G::solid(400.0, 360.0, 80.0, 30.0),
                G::bounce(550.0, 420.0, 80.0, 20.0),
                G::solid(700.0, 360.0, 80.0, 30.0),
                G::solid(400.0, 280.0, 80.0, 30.0),
                G::hazard(300.0, 200.0, 30.0, 20.0),
                G::hazard(500.0, 200.0, 30.0, 20.0),
                G::goal(675.0, 50.0, 100.0, 150.0),
            ],
            coins(&[
                (120.0, 450.0),
                (270.0, 390.0),
                (180.0, 320.0),
                (420.0, 330.0),
                (570.0, 390.0),
                (720.0, 330.0),
                (420.0, 250.0),
                (150.0, 250.0),
                (600.0, 250.0),
                (80.0, 400.0),
                (350.0, 450.0),
                (650.0, 450.0),
            ]),
        ),
        Level::new(
            7,
            vec![
                ground(),
                G::solid(100.0, 450.0, 100.0, 30.0),
                G::bounce(300.0, 400.0, 100.0, 20.0),
                G::solid(500.0, 350.0, 100.0, 30.0),
                G::bounce(700.0, 300.0, 100.0, 20.0),
                G::solid(500.0, 250.0, 100.0, 30.0),
                G::solid(300.0, 200.0, 100.0, 30.0),
                G::hazard(250.0, 380.0, 30.0, 20.0),
                G::hazard(450.0, 330.0, 30.0, 20.0),
                G::hazard(650.0, 280.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            coin_wave(15, 100.0, 50.0, 200.0, 200.0, 0.5, Wave::Cos),
        ),
        Level::new(
            8,
            vec![
                ground(),
                G::solid(50.0, 480.0, 80.0, 30.0),
                G::bounce(150.0, 420.0, 80.0, 20.0),
                G::solid(250.0, 370.0, 80.0, 30.0),
                G::bounce(350.0, 420.0, 80.0, 20.0),
                G::solid(450.0, 370.0, 80.0, 30.0),
                G::bounce(550.0, 420.0, 80.0, 20.0),
                G::solid(650.0, 370.0, 80.0, 30.0),
                G::hazard(400.0, 250.0, 30.0, 20.0),
                G::hazard(200.0, 250.0, 30.0, 20.0),
                G::hazard(600.0, 250.0, 30.0, 20.0),
                G::goal(675.0, 50.0, 100.0, 150.0),
            ],
            with_tokens(coin_wave(14, 40.0, 55.0, 150.0, 180.0, 0.6, Wave::Sin), &[(150.0, 380.0)]),
        ),
        Level::new(
            9,
            vec![
                ground(),
                G::solid(80.0, 480.0, 70.0, 30.0),
                G::bounce(200.0, 430.0, 70.0, 20.0),
                G::solid(320.0, 380.0, 70.0, 30.0),
                G::bounce(440.0, 430.0, 70.0, 20.0),
                G::solid(560.0, 380.0, 70.0, 30.0),
                G::bounce(680.0, 430.0, 70.0, 20.0),
                G::solid(400.0, 300.0, 70.0, 30.0),
                G::hazard(150.0, 350.0, 30.0, 20.0),
                G::hazard(350.0, 350.0, 30.0, 20.0),
                G::hazard(550.0, 350.0, 30.0, 20.0),
                G::goal(675.0, 50.0, 100.0, 150.0),
            ],
            coin_wave(16, 30.0, 50.0, 120.0, 200.0, 0.7, Wave::Sin),
        ),
        Level::new(
            10,
            vec![
                ground(),
                G::solid(100.0, 480.0, 90.0, 30.0),
                G::bounce(250.0, 430.0, 90.0, 20.0),
                G::solid(400.0, 380.0, 90.0, 30.0),
                G::bounce(550.0, 430.0, 90.0, 20.0),
                G::solid(100.0, 330.0, 90.0, 30.0),
                G::bounce(400.0, 280.0, 90.0, 20.0),
                G::solid(700.0, 230.0, 90.0, 30.0),
                G::hazard(300.0, 360.0, 30.0, 20.0),
                G::hazard(600.0, 360.0, 30.0, 20.0),
                G::hazard(200.0, 250.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            coin_wave(18, 60.0, 45.0, 100.0, 250.0, 0.5, Wave::Sin),
        ),
        Level::new(
            11,
            vec![
                ground(),
                G::bounce(100.0, 470.0, 100.0, 20.0),
                G::solid(250.0, 410.0, 100.0, 30.0),
                G::bounce(400.0, 470.0, 100.0, 20.0),
                G::solid(550.0, 410.0, 100.0, 30.0),
                G::bounce(700.0, 470.0, 100.0, 20.0),
                G::solid(350.0, 340.0, 100.0, 30.0),
                G::bounce(200.0, 280.0, 100.0, 20.0),
                G::bounce(600.0, 280.0, 100.0, 20.0),
                G::hazard(400.0, 200.0, 30.0, 20.0),
                G::hazard(300.0, 200.0, 30.0, 20.0),
                G::hazard(500.0, 200.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            coin_wave(18, 50.0, 48.0, 120.0, 220.0, 0.6, Wave::Cos),
        ),
        Level::new(
            12,
            vec![
                ground(),
                G::bounce(100.0, 460.0, 80.0, 20.0),
                G::solid(220.0, 400.0, 80.0, 30.0),
                G::bounce(340.0, 460.0, 80.0, 20.0),
                G::solid(460.0, 400.0, 80.0, 30.0),
                G::bounce(580.0, 460.0, 80.0, 20.0),
                G::solid(700.0, 400.0, 80.0, 30.0),
                G::bounce(400.0, 320.0, 80.0, 20.0),
                G::solid(200.0, 280.0, 80.0, 30.0),
                G::solid(600.0, 280.0, 80.0, 30.0),
                G::hazard(250.0, 360.0, 30.0, 20.0),
                G::hazard(550.0, 360.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            with_tokens(coin_wave(20, 40.0, 40.0, 100.0, 250.0, 0.4, Wave::Sin), &[(400.0, 280.0)]),
        ),
        Level::new(
            13,
            vec![
                ground(),
                G::solid(80.0, 470.0, 100.0, 30.0),
                G::bounce(200.0, 420.0, 100.0, 20.0),
                G::solid(320.0, 370.0, 100.0, 30.0),
                G::bounce(440.0, 420.0, 100.0, 20.0),
                G::solid(560.0, 370.0, 100.0, 30.0),
                G::bounce(680.0, 420.0, 100.0, 20.0),
                G::solid(300.0, 290.0, 100.0, 30.0),
                G::solid(500.0, 290.0, 100.0, 30.0),
                G::hazard(275.0, 355.0, 30.0, 20.0),
                G::hazard(450.0, 350.0, 30.0, 20.0),
                G::hazard(650.0, 350.0, 30.0, 20.0),
                G::hazard(400.0, 210.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            coin_wave(20, 30.0, 42.0, 80.0, 280.0, 0.5, Wave::Sin),
        ),
        Level::new(
            14,
            vec![
                ground(),
                G::bounce(100.0, 460.0, 100.0, 20.0),
                G::solid(250.0, 410.0, 100.0, 30.0),
                G::bounce(400.0, 460.0, 100.0, 20.0),
                G::solid(550.0, 410.0, 100.0, 30.0),
                G::bounce(700.0, 460.0, 100.0, 20.0),
                G::solid(150.0, 330.0, 100.0, 30.0),
                G::bounce(400.0, 330.0, 100.0, 20.0),
                G::solid(650.0, 330.0, 100.0, 30.0),
                G::bounce(300.0, 260.0, 100.0, 20.0),
                G::solid(500.0, 260.0, 100.0, 30.0),
                G::hazard(200.0, 390.0, 30.0, 20.0),
                G::hazard(525.0, 395.0, 30.0, 20.0),
                G::hazard(250.0, 300.0, 30.0, 20.0),
                G::hazard(600.0, 300.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            with_tokens(coin_wave(22, 25.0, 38.0, 50.0, 300.0, 0.5, Wave::Cos), &[(300.0, 220.0)]),
        ),
        // 15: finale
        Level::new(
            15,
            vec![
                ground(),
                G::bounce(100.0, 460.0, 100.0, 20.0),
                G::solid(220.0, 410.0, 100.0, 30.0),
                G::bounce(340.0, 460.0, 100.0, 20.0),
                G::solid(460.0, 410.0, 100.0, 30.0),
                G::bounce(580.0, 460.0, 100.0, 20.0),
                G::solid(700.0, 410.0, 100.0, 30.0),
                G::bounce(180.0, 340.0, 100.0, 20.0),
                G::bounce(420.0, 340.0, 100.0, 20.0),
                G::bounce(660.0, 340.0, 100.0, 20.0),
                G::solid(300.0, 260.0, 100.0, 30.0),
                G::solid(500.0, 260.0, 100.0, 30.0),
                G::hazard(150.0, 430.0, 30.0, 20.0),
                G::hazard(350.0, 430.0, 30.0, 20.0),
                G::hazard(575.0, 435.0, 30.0, 20.0),
                G::hazard(350.0, 310.0, 30.0, 20.0),
                G::hazard(600.0, 310.0, 30.0, 20.0),
                G::hazard(250.0, 230.0, 30.0, 20.0),
                G::hazard(550.0, 230.0, 30.0, 20.0),
                G::goal(675.0, 0.0, 100.0, 150.0),
            ],
            with_tokens(coin_wave(25, 20.0, 35.0, 40.0, 320.0, 0.4, Wave::Sin), &[(420.0, 300.0)]),
        ),
    ]
}

fn with_tokens(mut items: Vec<Collectible>, tokens: &[(f32, f32)]) -> Vec<Collectible> {
    items.extend(tokens.iter().map(|&(x, y)| Collectible::life_token(x, y)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::CollectibleKind;

    #[test]
    fn test_campaign_shape() {
        let set = LevelSet::campaign();
        assert_eq!(set.len(), 15);
        for (i, level) in set.iter().enumerate() {
            assert_eq!(level.number, i as u32 + 1);
            assert!(level.has_goal(), "level {} has no goal", level.number);
            assert_eq!(level.geometry[0].hitbox().top(), 581.0);
        }
        assert!(set.is_last(15));
        assert!(!set.is_last(14));
    }

    #[test]
    fn test_lookup_is_one_based() {
        let set = LevelSet::campaign();
        assert!(set.get(0).is_none());
        assert_eq!(set.get(1).map(|l| l.number), Some(1));
        assert!(set.get(16).is_none());
    }

    #[test]
    fn test_life_tokens_present() {
        let set = LevelSet::campaign();
        let tokens = |n: u32| {
            set.get(n)
                .map(|l| {
                    l.collectibles
                        .iter()
                        .filter(|c| c.kind == CollectibleKind::LifeToken)
                        .count()
                })
                .unwrap_or(0)
        };
        assert_eq!(tokens(8), 1);
        assert_eq!(tokens(1), 0);
        assert_eq!(tokens(15), 1);
    }

    #[test]
    fn test_reset_clears_flags() {
        let mut set = LevelSet::campaign();
        let level = set.get_mut(1).unwrap();
        level.collectibles[0].collected = true;
        level.collectibles[3].collected = true;
        assert_eq!(level.remaining(), 3);
        level.reset();
        assert_eq!(level.remaining(), 5);
    }

    #[test]
    fn test_missing_collectibles_default_empty() {
        let json = r#"{"number":1,"geometry":[],"spawn":[0.0,0.0]}"#;
        let level: Level = serde_json::from_str(json).unwrap();
        assert!(level.collectibles.is_empty());
    }
}
