//! Collision detection and response against typed static geometry
//!
//! The tricky part of the platformer: solids must be landable from above while
//! staying transparent from the sides and underneath, and each geometry kind
//! has its own response. Geometry is walked in level-definition order.

use super::actor::Actor;
use super::geometry::{Collectible, CollectibleKind, GeometryKind, Rect, StaticGeometry};
use crate::tuning::PhysicsTuning;

/// What happened when the actor touched a piece of geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Came to rest on a solid top
    Landed { index: usize },
    /// Launched by a bounce pad
    Bounced { index: usize },
    /// Lost a life and went back to the checkpoint
    Respawned { index: usize, lives_left: u32 },
    /// Lost the last life
    Depleted { index: usize },
    /// Touched the level goal
    ReachedGoal { index: usize },
}

/// Result of one resolution pass
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub contacts: Vec<Contact>,
}

impl Resolution {
    pub fn depleted(&self) -> bool {
        self.contacts
            .iter()
            .any(|c| matches!(c, Contact::Depleted { .. }))
    }

    pub fn reached_goal(&self) -> bool {
        self.contacts
            .iter()
            .any(|c| matches!(c, Contact::ReachedGoal { .. }))
    }

    pub fn grounded(&self) -> bool {
        self.contacts
            .iter()
            .any(|c| matches!(c, Contact::Landed { .. }))
    }
}

/// Directional gate shared by solids and bounce pads.
///
/// The actor must be falling or still, horizontally over the surface, and its
/// bottom edge must cross the surface plane this tick: at or above it before
/// integration and below it after. Side and underside contact never qualifies.
pub fn lands_on(actor: &Actor, surface: &Rect) -> bool {
    let top = surface.top();
    actor.vel.y >= 0.0
        && actor.rect().overlaps_horizontally(surface)
        && actor.prev_bottom <= top
        && actor.bottom() > top
}

/// Apply every geometry response for this tick.
///
/// Hazards fire at most once per tick; the respawn clears the overlap so the
/// next tick starts clean. A depleted actor or a goal contact stops the walk.
pub fn resolve_geometry(
    actor: &mut Actor,
    geometry: &[StaticGeometry],
    tuning: &PhysicsTuning,
) -> Resolution {
    let mut result = Resolution::default();
    let mut hazard_taken = false;

    for (index, piece) in geometry.iter().enumerate() {
        let hitbox = piece.hitbox();

        match piece.kind {
            GeometryKind::Solid => {
                if lands_on(actor, &hitbox) {
                    actor.land_on(hitbox.top());
                    result.contacts.push(Contact::Landed { index });
                }
            }
            GeometryKind::Bounce => {
                if lands_on(actor, &hitbox) {
                    actor.pos.y = hitbox.top() - actor.size.y;
                    actor.vel.y = tuning.bounce_force;
                    actor.is_jumping = true;
                    result.contacts.push(Contact::Bounced { index });
                }
            }
            GeometryKind::Hazard => {
                if hazard_taken || !actor.rect().overlaps(&hitbox) {
                    continue;
                }
                hazard_taken = true;
                actor.lives = actor.lives.saturating_sub(1);
                if actor.lives == 0 {
                    result.contacts.push(Contact::Depleted { index });
                    break;
                }
                actor.respawn();
                result.contacts.push(Contact::Respawned {
                    index,
                    lives_left: actor.lives,
                });
            }
            GeometryKind::Goal => {
                if actor.rect().overlaps(&hitbox) {
                    result.contacts.push(Contact::ReachedGoal { index });
                    break;
                }
            }
        }
    }

    result
}

/// A collectible picked up this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub index: usize,
    pub kind: CollectibleKind,
}

/// Collect every uncollected pickup the actor overlaps.
///
/// Coins add one point; life tokens add one life up to `max_lives` if set.
pub fn collect_pickups(
    actor: &mut Actor,
    pickups: &mut [Collectible],
    max_lives: Option<u32>,
) -> Vec<Pickup> {
    let body = actor.rect();
    let mut taken = Vec::new();

    for (index, item) in pickups.iter_mut().enumerate() {
        if item.collected || !body.overlaps(&item.rect) {
            continue;
        }
        item.collected = true;
        match item.kind {
            CollectibleKind::Coin => actor.score += 1,
            CollectibleKind::LifeToken => {
                let lives = actor.lives + 1;
                actor.lives = max_lives.map_or(lives, |cap| lives.min(cap));
            }
        }
        taken.push(Pickup {
            index,
            kind: item.kind,
        });
    }

    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn platform() -> StaticGeometry {
        // Collidable top at y = 306 (300 + trim)
        StaticGeometry::solid(100.0, 300.0, 200.0, 30.0)
    }

    /// Actor positioned so that after `integrate` its bottom sits at `bottom`
    fn actor_falling_to(x: f32, prev_bottom: f32, bottom: f32, vy: f32) -> Actor {
        let mut a = Actor::player(3);
        a.pos = Vec2::new(x, bottom - a.size.y);
        a.vel = Vec2::new(0.0, vy);
        a.prev_bottom = prev_bottom;
        a.is_jumping = true;
        a
    }

    #[test]
    fn test_land_from_above() {
        let tuning = PhysicsTuning::default();
        let geo = [platform()];
        let mut a = actor_falling_to(150.0, 303.0, 310.0, 7.0);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert_eq!(r.contacts, vec![Contact::Landed { index: 0 }]);
        assert_eq!(a.bottom(), 306.0);
        assert_eq!(a.vel.y, 0.0);
        assert!(!a.is_jumping);
    }

    #[test]
    fn test_fast_fall_does_not_tunnel() {
        let tuning = PhysicsTuning::default();
        let geo = [StaticGeometry::solid(100.0, 300.0, 200.0, 10.0)];
        // Crosses the whole 4px hitbox in one tick
        let mut a = actor_falling_to(150.0, 290.0, 330.0, 40.0);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert!(r.grounded());
        assert_eq!(a.bottom(), 306.0);
    }

    #[test]
    fn test_rising_passes_through_underside() {
        let tuning = PhysicsTuning::default();
        let geo = [platform()];
        let mut a = actor_falling_to(150.0, 340.0, 320.0, -10.0);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert!(r.contacts.is_empty());
        assert_eq!(a.vel.y, -10.0);
    }

    #[test]
    fn test_side_overlap_no_landing() {
        let tuning = PhysicsTuning::default();
        let geo = [platform()];
        // Bottom already below the top plane at tick start
        let mut a = actor_falling_to(95.0, 320.0, 320.0, 0.0);
        a.vel.x = 5.0;

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert!(r.contacts.is_empty());
        assert_eq!(a.bottom(), 320.0);
    }

    #[test]
    fn test_bounce_overrides_fall_speed() {
        let tuning = PhysicsTuning::default();
        let geo = [StaticGeometry::bounce(100.0, 300.0, 120.0, 20.0)];
        let mut a = actor_falling_to(120.0, 305.0, 312.0, 1.0);
        a.is_jumping = false;

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert_eq!(r.contacts, vec![Contact::Bounced { index: 0 }]);
        assert_eq!(a.vel.y, tuning.bounce_force);
        assert!(a.is_jumping);
        assert_eq!(a.bottom(), 306.0);
    }

    #[test]
    fn test_hazard_respawns() {
        let tuning = PhysicsTuning::default();
        let geo = [StaticGeometry::hazard(140.0, 280.0, 30.0, 20.0)];
        let mut a = actor_falling_to(150.0, 280.0, 290.0, 1.0);
        a.checkpoint = Vec2::new(50.0, 495.0);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert_eq!(
            r.contacts,
            vec![Contact::Respawned {
                index: 0,
                lives_left: 2
            }]
        );
        assert_eq!(a.lives, 2);
        assert_eq!(a.pos, Vec2::new(50.0, 495.0));
        assert_eq!(a.vel, Vec2::ZERO);
    }

    #[test]
    fn test_hazard_trim_spares_grazing_contact() {
        let tuning = PhysicsTuning::default();
        let geo = [StaticGeometry::hazard(375.0, 385.0, 30.0, 20.0)];
        // Inside the spike art, above its collidable top at 391
        let mut a = actor_falling_to(360.0, 388.0, 388.0, 0.0);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert!(r.contacts.is_empty());
        assert_eq!(a.lives, 3);

        let mut a = actor_falling_to(360.0, 392.0, 392.0, 0.0);
        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert_eq!(a.lives, 2);
        assert!(!r.contacts.is_empty());
    }

    #[test]
    fn test_last_life_depletes_without_respawn() {
        let tuning = PhysicsTuning::default();
        let geo = [
            StaticGeometry::hazard(140.0, 280.0, 30.0, 20.0),
            StaticGeometry::goal(140.0, 280.0, 30.0, 20.0),
        ];
        let mut a = actor_falling_to(150.0, 280.0, 290.0, 1.0);
        a.lives = 1;
        let before = a.pos;

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert!(r.depleted());
        assert!(!r.reached_goal());
        assert_eq!(a.lives, 0);
        assert_eq!(a.pos, before);
    }

    #[test]
    fn test_overlapping_hazards_count_once() {
        let tuning = PhysicsTuning::default();
        let geo = [
            StaticGeometry::hazard(140.0, 280.0, 30.0, 20.0),
            StaticGeometry::hazard(150.0, 280.0, 30.0, 20.0),
        ];
        let mut a = actor_falling_to(150.0, 280.0, 290.0, 1.0);
        // Checkpoint also inside both hazards
        a.checkpoint = a.pos;

        resolve_geometry(&mut a, &geo, &tuning);
        assert_eq!(a.lives, 2);
    }

    #[test]
    fn test_hazard_and_landing_same_tick() {
        let tuning = PhysicsTuning::default();
        let geo = [
            StaticGeometry::hazard(140.0, 280.0, 30.0, 20.0),
            StaticGeometry::ground(0.0, 550.0, 800.0, 50.0),
        ];
        let mut a = actor_falling_to(150.0, 280.0, 290.0, 1.0);
        // Checkpoint just above the ground surface at 581
        a.checkpoint = Vec2::new(50.0, 581.0 - a.size.y);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert_eq!(r.contacts.len(), 1);
        assert_eq!(a.lives, 2);
    }

    #[test]
    fn test_goal_contact() {
        let tuning = PhysicsTuning::default();
        let geo = [StaticGeometry::goal(650.0, 100.0, 100.0, 150.0)];
        let mut a = actor_falling_to(640.0, 200.0, 200.0, -2.0);

        let r = resolve_geometry(&mut a, &geo, &tuning);
        assert!(r.reached_goal());
    }

    #[test]
    fn test_collect_coin_and_token() {
        let mut a = Actor::player(3);
        a.pos = Vec2::new(100.0, 100.0);
        let mut items = vec![
            Collectible::coin(110.0, 110.0),
            Collectible::life_token(120.0, 120.0),
            Collectible::coin(500.0, 500.0),
        ];

        let taken = collect_pickups(&mut a, &mut items, None);
        assert_eq!(taken.len(), 2);
        assert_eq!(a.score, 1);
        assert_eq!(a.lives, 4);
        assert!(items[0].collected && items[1].collected);
        assert!(!items[2].collected);

        // Already collected items are ignored
        let taken = collect_pickups(&mut a, &mut items, None);
        assert!(taken.is_empty());
        assert_eq!(a.score, 1);
    }

    #[test]
    fn test_life_cap() {
        let mut a = Actor::player(3);
        a.pos = Vec2::new(100.0, 100.0);
        let mut items = vec![Collectible::life_token(110.0, 110.0)];
        collect_pickups(&mut a, &mut items, Some(3));
        assert_eq!(a.lives, 3);
        assert!(items[0].collected);
    }

    proptest! {
        #[test]
        fn prop_falling_onto_solid_rests_on_top(
            x in 50.0f32..290.0,
            above in 0.0f32..40.0,
            vy in 0.0f32..40.0,
        ) {
            let tuning = PhysicsTuning::default();
            let geo = [platform()];
            let surface = geo[0].hitbox().top();

            let mut a = Actor::player(3);
            a.pos = Vec2::new(x, surface - above - a.size.y);
            a.vel.y = vy;
            a.is_jumping = true;
            a.integrate(&tuning);

            let crossed = a.prev_bottom <= surface && a.bottom() > surface;
            let r = resolve_geometry(&mut a, &geo, &tuning);
            if crossed {
                prop_assert!(r.grounded());
                prop_assert_eq!(a.bottom(), surface);
                prop_assert_eq!(a.vel.y, 0.0);
                prop_assert!(!a.is_jumping);
            } else {
                prop_assert!(r.contacts.is_empty());
            }
        }

        #[test]
        fn prop_side_entry_never_lands(
            depth in 0.5f32..20.0,
            vy in 0.0f32..5.0,
        ) {
            let tuning = PhysicsTuning::default();
            let geo = [platform()];
            let surface = geo[0].hitbox().top();

            let mut a = Actor::player(3);
            a.pos = Vec2::new(60.0, surface + depth - a.size.y);
            a.vel = Vec2::new(5.0, vy);
            a.prev_bottom = a.bottom();
            a.is_jumping = true;
            let bottom_before = a.bottom();

            let r = resolve_geometry(&mut a, &geo, &tuning);
            prop_assert!(r.contacts.is_empty());
            prop_assert_eq!(a.bottom(), bottom_before);
        }

        #[test]
        fn prop_bounce_always_sets_bounce_force(vy in 0.0f32..60.0) {
            let tuning = PhysicsTuning::default();
            let geo = [StaticGeometry::bounce(100.0, 300.0, 120.0, 20.0)];
            let surface = geo[0].hitbox().top();
            let mut a = actor_falling_to(120.0, surface, surface + vy.max(0.1), vy);

            let r = resolve_geometry(&mut a, &geo, &tuning);
            prop_assert!(!r.contacts.is_empty());
            prop_assert_eq!(a.vel.y, tuning.bounce_force);
            prop_assert!(tuning.bounce_force < tuning.jump_force);
        }

        #[test]
        fn prop_hazard_costs_at_most_one_life(lives in 0u32..5, hazards in 1usize..4) {
            let tuning = PhysicsTuning::default();
            let geo: Vec<_> = (0..hazards)
                .map(|i| StaticGeometry::hazard(140.0 + i as f32 * 5.0, 280.0, 30.0, 20.0))
                .collect();
            let mut a = actor_falling_to(150.0, 280.0, 290.0, 1.0);
            a.lives = lives;
            a.checkpoint = a.pos;

            let r = resolve_geometry(&mut a, &geo, &tuning);
            prop_assert_eq!(a.lives, lives.saturating_sub(1));
            prop_assert_eq!(r.depleted(), lives <= 1);
        }

        #[test]
        fn prop_collected_is_monotonic(xs in proptest::collection::vec(0.0f32..780.0, 1..20)) {
            let mut a = Actor::player(3);
            let mut items: Vec<_> = (0..10).map(|i| Collectible::coin(i as f32 * 75.0, 100.0)).collect();
            for x in xs {
                let before: Vec<bool> = items.iter().map(|c| c.collected).collect();
                a.pos = Vec2::new(x, 80.0);
                collect_pickups(&mut a, &mut items, None);
                for (was, item) in before.iter().zip(&items) {
                    prop_assert!(!*was || item.collected);
                }
            }
            let collected = items.iter().filter(|c| c.collected).count() as u32;
            prop_assert_eq!(a.score, collected);
        }
    }
}
