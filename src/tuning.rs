//! Data-driven game balance
//!
//! One parameterized engine drives every level; the numbers that differ
//! between games live here instead of in per-game loops.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Platformer physics and rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Gravity added per tick while moving up (vy < 0)
    pub rising_gravity: f32,
    /// Gravity added per tick while falling or at rest (vy >= 0)
    pub falling_gravity: f32,
    /// Vertical velocity set by a jump (negative)
    pub jump_force: f32,
    /// Fraction of upward velocity kept on early jump release
    pub jump_cut: f32,
    /// Vertical velocity set by a bounce pad (negative)
    pub bounce_force: f32,
    pub move_speed: f32,
    pub starting_lives: u32,
    /// Optional ceiling for lives gained from tokens
    pub max_lives: Option<u32>,
    pub level_advance_delay_ticks: u32,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            rising_gravity: RISING_GRAVITY,
            falling_gravity: FALLING_GRAVITY,
            jump_force: INITIAL_JUMP_FORCE,
            jump_cut: JUMP_CUT,
            bounce_force: BOUNCE_FORCE,
            move_speed: MOVE_SPEED,
            starting_lives: STARTING_LIVES,
            max_lives: None,
            level_advance_delay_ticks: LEVEL_ADVANCE_DELAY_TICKS,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }
}

impl PhysicsTuning {
    /// Gravity for the current vertical velocity
    #[inline]
    pub fn gravity_for(&self, vy: f32) -> f32 {
        if vy < 0.0 {
            self.rising_gravity
        } else {
            self.falling_gravity
        }
    }
}

/// Course canvas dimensions
pub const COURSE_WIDTH: f32 = 480.0;
pub const COURSE_HEIGHT: f32 = 640.0;
/// Height of the ground strip at the bottom of the course
pub const COURSE_GROUND_HEIGHT: f32 = 60.0;
pub const PIPE_WIDTH: f32 = 60.0;
/// Runner body size
pub const RUNNER_WIDTH: f32 = 76.0;
pub const RUNNER_HEIGHT: f32 = 58.0;

/// Obstacle course pacing (user-adjustable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseTuning {
    pub gravity: f32,
    /// Vertical velocity set by a flap (negative)
    pub flap_velocity: f32,
    /// Vertical gap between upper and lower pipe
    pub pipe_gap: f32,
    /// Ticks between pipe spawns
    pub pipe_spacing: u32,
    /// Horizontal scroll per tick
    pub pipe_speed: f32,
}

impl Default for CourseTuning {
    fn default() -> Self {
        Self {
            gravity: 0.18,
            flap_velocity: -5.0,
            pipe_gap: 180.0,
            pipe_spacing: 160,
            pipe_speed: 2.2,
        }
    }
}

impl CourseTuning {
    /// Clamp values into playable ranges; non-finite values revert to defaults
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let pick = |v: f32, fallback: f32, lo: f32, hi: f32| {
            if v.is_finite() { v.clamp(lo, hi) } else { fallback }
        };
        Self {
            gravity: pick(self.gravity, d.gravity, 0.01, 2.0),
            flap_velocity: pick(self.flap_velocity, d.flap_velocity, -20.0, -0.5),
            pipe_gap: pick(self.pipe_gap, d.pipe_gap, RUNNER_HEIGHT + 20.0, 400.0),
            pipe_spacing: self.pipe_spacing.clamp(1, 600),
            pipe_speed: pick(self.pipe_speed, d.pipe_speed, 0.5, 10.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_phase() {
        let t = PhysicsTuning {
            rising_gravity: 0.3,
            falling_gravity: 0.7,
            ..Default::default()
        };
        assert_eq!(t.gravity_for(-4.0), 0.3);
        assert_eq!(t.gravity_for(0.0), 0.7);
        assert_eq!(t.gravity_for(2.0), 0.7);
    }

    #[test]
    fn test_bounce_stronger_than_jump() {
        let t = PhysicsTuning::default();
        assert!(t.bounce_force < t.jump_force);
        assert!(t.jump_force < 0.0);
    }

    #[test]
    fn test_course_sanitize() {
        let wild = CourseTuning {
            gravity: f32::NAN,
            flap_velocity: 3.0,
            pipe_gap: 10.0,
            pipe_spacing: 0,
            pipe_speed: 99.0,
        };
        let t = wild.sanitized();
        assert_eq!(t.gravity, CourseTuning::default().gravity);
        assert!(t.flap_velocity < 0.0);
        assert!(t.pipe_gap > RUNNER_HEIGHT);
        assert_eq!(t.pipe_spacing, 1);
        assert_eq!(t.pipe_speed, 10.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t: PhysicsTuning = serde_json::from_str(r#"{"move_speed": 7.0}"#).unwrap();
        assert_eq!(t.move_speed, 7.0);
        assert_eq!(t.jump_force, INITIAL_JUMP_FORCE);
    }
}
