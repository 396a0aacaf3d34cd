//! Read-only per-frame snapshots for renderers
//!
//! Renderers draw from these and never touch simulation state directly.

use glam::Vec2;

use crate::sim::{
    Collectible, Course, CoursePhase, Facing, GamePhase, Rect, Session, StaticGeometry,
    is_ultimate,
};
use crate::timer::format_time;
use crate::tuning::{COURSE_GROUND_HEIGHT, COURSE_HEIGHT, COURSE_WIDTH};

/// Everything needed to draw one platformer frame
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub level: u32,
    pub level_count: u32,
    pub actor: Rect,
    pub facing: Facing,
    pub airborne: bool,
    pub lives: u32,
    pub score: u32,
    pub geometry: &'a [StaticGeometry],
    /// Uncollected items only
    pub collectibles: Vec<&'a Collectible>,
    /// Run timer as `M:SS.CC`
    pub time: String,
    /// This finished run earned the ultimate title
    pub ultimate_run: bool,
}

impl<'a> FrameView<'a> {
    pub fn of(session: &'a Session, now_ms: f64) -> Self {
        let level = session.level();
        let elapsed = session.timer.elapsed_secs(now_ms);
        Self {
            phase: session.phase,
            level: session.current_level,
            level_count: session.levels.len() as u32,
            actor: session.actor.rect(),
            facing: session.actor.facing,
            airborne: session.actor.is_jumping,
            lives: session.actor.lives,
            score: session.actor.score,
            geometry: level.map(|l| l.geometry.as_slice()).unwrap_or(&[]),
            collectibles: level
                .map(|l| l.collectibles.iter().filter(|c| !c.collected).collect())
                .unwrap_or_default(),
            time: format_time(elapsed),
            ultimate_run: session.phase == GamePhase::Victory
                && is_ultimate(elapsed, session.actor.score),
        }
    }

    /// HUD line, e.g. `Level 3/15  Lives 2  Coins 41  0:42.10`
    pub fn hud(&self, show_timer: bool) -> String {
        let mut line = format!(
            "Level {}/{}  Lives {}  Coins {}",
            self.level, self.level_count, self.lives, self.score
        );
        if show_timer {
            line.push_str("  ");
            line.push_str(&self.time);
        }
        line
    }
}

/// One obstacle-course frame
#[derive(Debug, Clone)]
pub struct CourseView {
    pub phase: CoursePhase,
    pub runner: Rect,
    /// Nose-up/nose-down tilt in radians
    pub tilt: f32,
    /// Upper and lower pipe of every pair
    pub pipes: Vec<(Rect, Rect)>,
    pub ground: Rect,
    pub score: u32,
    pub best: u32,
}

impl CourseView {
    pub fn of(course: &Course) -> Self {
        let gap = course.tuning.pipe_gap;
        let vy = course.runner.vel.y;
        let tilt = match course.phase {
            CoursePhase::Dying | CoursePhase::Over => std::f32::consts::FRAC_PI_2,
            _ => (vy * 0.06).clamp(-std::f32::consts::FRAC_PI_6, std::f32::consts::FRAC_PI_4),
        };
        Self {
            phase: course.phase,
            runner: course.runner.rect(),
            tilt,
            pipes: course.pipes.iter().map(|p| (p.upper(), p.lower(gap))).collect(),
            ground: Rect {
                pos: Vec2::new(0.0, COURSE_HEIGHT - COURSE_GROUND_HEIGHT),
                size: Vec2::new(COURSE_WIDTH, COURSE_GROUND_HEIGHT),
            },
            score: course.score,
            best: course.best,
        }
    }
}

/// Frames averaged by `FpsCounter`
const FPS_WINDOW: usize = 60;

/// Frames per second over the last 60 frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a frame drawn at `now_ms`
    pub fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Slot just past the newest is the oldest; zero until the ring fills
        let oldest = self.frame_times[self.frame_index];
        let elapsed = now_ms - oldest;
        if oldest > 0.0 && elapsed > 0.0 {
            self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
