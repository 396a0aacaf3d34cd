//! Banana-Rama - arcade platformer and obstacle course
//!
//! Core modules:
//! - `sim`: Simulation (actor physics, collision response, phases, levels)
//! - `tuning`: Data-driven physics and course balance
//! - `timer`: Pause-aware run timer
//! - `highscores`: Campaign leaderboards and course best score
//! - `persistence`: Key-value storage with safe fallbacks
//! - `settings`: Player preferences
//! - `platform`: Physical input to logical actions
//! - `view`: Read-only per-frame snapshot for renderers

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod timer;
pub mod tuning;
pub mod view;

pub use highscores::{CourseBest, Leaderboard};
pub use settings::Settings;
pub use tuning::{CourseTuning, PhysicsTuning};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Platformer canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player body size
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;

    /// Spawn point: resting on the ground hitbox
    pub const SPAWN_X: f32 = 50.0;
    pub const SPAWN_Y: f32 = 495.0;

    /// Gravity while ascending / descending (pixels per tick²)
    pub const RISING_GRAVITY: f32 = 0.5;
    pub const FALLING_GRAVITY: f32 = 0.5;
    /// Jump impulse (negative is up)
    pub const INITIAL_JUMP_FORCE: f32 = -13.5;
    /// Bounce pad impulse, always stronger than a jump
    pub const BOUNCE_FORCE: f32 = -18.0;
    /// Fraction of upward velocity kept when jump is released early
    pub const JUMP_CUT: f32 = 0.5;
    /// Horizontal run speed (pixels per tick)
    pub const MOVE_SPEED: f32 = 5.0;
    pub const STARTING_LIVES: u32 = 3;
    /// Pause between a goal contact and the next level (ticks, 0.25 s)
    pub const LEVEL_ADVANCE_DELAY_TICKS: u32 = 15;

    /// Every platform's collidable top sits this far below its art
    pub const SURFACE_TRIM: f32 = 6.0;
    /// Extra inset on ground tiles (grass art above the real floor)
    pub const GROUND_INSET: f32 = 25.0;

    /// Collectible size
    pub const PICKUP_SIZE: f32 = 20.0;

    /// Ultimate run: under three minutes with 150+ coins
    pub const ULTIMATE_TIME_SECS: f64 = 180.0;
    pub const ULTIMATE_COINS: u32 = 150;
}
