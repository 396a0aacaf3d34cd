//! The player-controlled body

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::tuning::PhysicsTuning;

/// Which way the actor is looking (sprite choice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Airborne flag; jumps are refused while set
    pub is_jumping: bool,
    pub facing: Facing,
    pub lives: u32,
    pub score: u32,
    /// Last safe respawn point
    pub checkpoint: Vec2,
    /// Bottom edge before the most recent integration (landing test)
    #[serde(skip)]
    pub prev_bottom: f32,
}

impl Actor {
    pub fn new(spawn: Vec2, size: Vec2, lives: u32) -> Self {
        Self {
            pos: spawn,
            size,
            vel: Vec2::ZERO,
            is_jumping: false,
            facing: Facing::Right,
            lives,
            score: 0,
            checkpoint: spawn,
            prev_bottom: spawn.y + size.y,
        }
    }

    /// Platformer actor at the default spawn point
    pub fn player(lives: u32) -> Self {
        Self::new(
            Vec2::new(SPAWN_X, SPAWN_Y),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            lives,
        )
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Set horizontal velocity from held direction keys (right wins)
    pub fn steer(&mut self, left: bool, right: bool, move_speed: f32) {
        self.vel.x = 0.0;
        if left {
            self.vel.x = -move_speed;
            self.facing = Facing::Left;
        }
        if right {
            self.vel.x = move_speed;
            self.facing = Facing::Right;
        }
    }

    /// One Euler step: gravity, move, then clamp to the canvas
    pub fn integrate(&mut self, tuning: &PhysicsTuning) {
        self.prev_bottom = self.bottom();

        self.vel.y += tuning.gravity_for(self.vel.y);
        self.pos += self.vel;

        let max_x = (tuning.canvas_width - self.size.x).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);

        // Floor backstop, independent of level geometry
        if self.bottom() > tuning.canvas_height {
            self.pos.y = tuning.canvas_height - self.size.y;
            self.vel.y = 0.0;
            self.is_jumping = false;
        }
    }

    /// Start a jump if grounded. Returns true if the jump happened.
    pub fn jump(&mut self, jump_force: f32) -> bool {
        if self.is_jumping {
            return false;
        }
        self.vel.y = jump_force;
        self.is_jumping = true;
        true
    }

    /// Shorten the jump if still rising. Call once per release.
    pub fn release_jump(&mut self, jump_cut: f32) {
        if self.vel.y < 0.0 {
            self.vel.y *= jump_cut;
        }
    }

    /// Teleport to the checkpoint with zero velocity
    pub fn respawn(&mut self) {
        self.place(self.checkpoint);
    }

    /// Move to a new spawn point, making it the checkpoint
    pub fn reset_to(&mut self, spawn: Vec2) {
        self.checkpoint = spawn;
        self.place(spawn);
    }

    fn place(&mut self, at: Vec2) {
        self.pos = at;
        self.vel = Vec2::ZERO;
        self.is_jumping = false;
        self.prev_bottom = self.bottom();
    }

    /// Rest the bottom edge on a surface
    pub fn land_on(&mut self, surface_y: f32) {
        self.pos.y = surface_y - self.size.y;
        self.vel.y = 0.0;
        self.is_jumping = false;
    }
}
