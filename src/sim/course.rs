//! Side-scrolling obstacle course
//!
//! A second mode on the same actor and AABB core: the runner falls under
//! constant gravity, flaps upward on demand and must thread the gap between
//! scrolling pipe pairs. Pipe heights come from a seeded `Pcg32`, so a run
//! replays exactly from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::geometry::Rect;
use crate::tuning::{
    COURSE_GROUND_HEIGHT, COURSE_HEIGHT, COURSE_WIDTH, CourseTuning, PIPE_WIDTH, RUNNER_HEIGHT,
    RUNNER_WIDTH,
};

/// Runner's fixed horizontal position
pub const RUNNER_X: f32 = 80.0;
/// Shortest allowed upper pipe
pub const MIN_PIPE_TOP: f32 = 40.0;
/// Clearance kept between the lowest gap and the ground
pub const PIPE_MARGIN: f32 = 80.0;
/// Pipes appear this far past the right edge
pub const PIPE_SPAWN_OFFSET: f32 = 20.0;
/// Pipes are dropped once this far past the left edge
pub const PIPE_DESPAWN_X: f32 = -50.0;
/// Downward nudge when the runner crashes
pub const CRASH_VELOCITY: f32 = 3.0;
/// Gravity multiplier during the crash fall
pub const DYING_GRAVITY_SCALE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoursePhase {
    /// Waiting for the first flap
    #[default]
    Ready,
    Running,
    /// Crashed, falling to the ground
    Dying,
    /// Resting on the ground; a flap restarts
    Over,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CourseEvent {
    Started,
    Scored { score: u32 },
    /// Persist the new high-water mark
    NewBest { best: u32 },
    Crashed { score: u32 },
    Settled,
}

/// One upper/lower pipe pair sharing an x position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Height of the upper pipe
    pub top: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn upper(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_WIDTH, self.top)
    }

    pub fn lower(&self, gap: f32) -> Rect {
        let y = self.top + gap;
        Rect::new(self.x, y, PIPE_WIDTH, COURSE_HEIGHT - y - COURSE_GROUND_HEIGHT)
    }

    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }
}

/// Complete state of one obstacle-course instance
#[derive(Debug, Clone)]
pub struct Course {
    pub tuning: CourseTuning,
    pub runner: Actor,
    pub pipes: Vec<Pipe>,
    pub phase: CoursePhase,
    /// Ticks since the run started
    pub frames: u64,
    pub score: u32,
    pub best: u32,
    seed: u64,
    rng: Pcg32,
    events: Vec<CourseEvent>,
}

impl Course {
    /// New course on the ready screen. `best` is the persisted record.
    pub fn new(tuning: CourseTuning, seed: u64, best: u32) -> Self {
        Self {
            tuning: tuning.sanitized(),
            runner: Actor::new(
                runner_spawn(),
                Vec2::new(RUNNER_WIDTH, RUNNER_HEIGHT),
                1,
            ),
            pipes: Vec::new(),
            phase: CoursePhase::Ready,
            frames: 0,
            score: 0,
            best,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Floor the runner can rest on
    pub fn ground_y() -> f32 {
        COURSE_HEIGHT - COURSE_GROUND_HEIGHT
    }

    pub fn drain_events(&mut self) -> Vec<CourseEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flap. Outside a run this resets and starts a new one instead.
    pub fn flap(&mut self) {
        if self.phase != CoursePhase::Running {
            self.restart();
            return;
        }
        self.runner.vel.y = self.tuning.flap_velocity;
    }

    /// Fresh run from the spawn point. The RNG stream continues so
    /// consecutive runs differ while staying reproducible.
    pub fn restart(&mut self) {
        self.runner.reset_to(runner_spawn());
        self.pipes.clear();
        self.frames = 0;
        self.score = 0;
        self.phase = CoursePhase::Running;
        log::info!("Course run started");
        self.events.push(CourseEvent::Started);
    }

    /// Advance one tick
    pub fn step(&mut self) {
        match self.phase {
            CoursePhase::Running => self.step_running(),
            CoursePhase::Dying => self.step_dying(),
            CoursePhase::Ready | CoursePhase::Over => {}
        }
    }

    fn step_running(&mut self) {
        self.frames += 1;
        if self.frames % self.tuning.pipe_spacing.max(1) as u64 == 0 {
            self.spawn_pipe();
        }

        self.runner.vel.y += self.tuning.gravity;
        self.runner.pos.y += self.runner.vel.y;

        let runner_x = self.runner.pos.x;
        for pipe in &mut self.pipes {
            pipe.x -= self.tuning.pipe_speed;
            if !pipe.scored && pipe.right() < runner_x {
                pipe.scored = true;
                self.score += 1;
                self.events.push(CourseEvent::Scored { score: self.score });
                if self.score > self.best {
                    self.best = self.score;
                    self.events.push(CourseEvent::NewBest { best: self.best });
                }
            }
        }
        self.pipes.retain(|p| p.right() >= PIPE_DESPAWN_X);

        if self.hits_bounds() || self.hits_pipe() {
            self.crash();
        }
    }

    fn step_dying(&mut self) {
        self.runner.vel.y += self.tuning.gravity * DYING_GRAVITY_SCALE;
        self.runner.pos.y += self.runner.vel.y;
        let floor = Self::ground_y();
        if self.runner.bottom() >= floor {
            self.runner.land_on(floor);
            self.phase = CoursePhase::Over;
            self.events.push(CourseEvent::Settled);
        }
    }

    fn hits_bounds(&self) -> bool {
        self.runner.bottom() >= Self::ground_y() || self.runner.pos.y <= 0.0
    }

    fn hits_pipe(&self) -> bool {
        let body = self.runner.rect();
        let gap = self.tuning.pipe_gap;
        self.pipes
            .iter()
            .any(|p| body.overlaps(&p.upper()) || body.overlaps(&p.lower(gap)))
    }

    fn crash(&mut self) {
        self.phase = CoursePhase::Dying;
        self.runner.vel.y = CRASH_VELOCITY;
        log::info!("Course run over with score {} (best {})", self.score, self.best);
        self.events.push(CourseEvent::Crashed { score: self.score });
    }

    fn spawn_pipe(&mut self) {
        let max_top = max_pipe_top(self.tuning.pipe_gap);
        let top = if max_top > MIN_PIPE_TOP {
            self.rng.random_range(MIN_PIPE_TOP..max_top)
        } else {
            MIN_PIPE_TOP
        };
        self.pipes.push(Pipe {
            x: COURSE_WIDTH + PIPE_SPAWN_OFFSET,
            top: top.floor(),
            scored: false,
        });
    }
}

fn runner_spawn() -> Vec2 {
    Vec2::new(RUNNER_X, COURSE_HEIGHT / 2.0 - RUNNER_HEIGHT / 2.0)
}

/// Tallest upper pipe that still leaves the gap above the margin
pub fn max_pipe_top(gap: f32) -> f32 {
    (COURSE_HEIGHT - gap - COURSE_GROUND_HEIGHT - PIPE_MARGIN).max(MIN_PIPE_TOP)
}
