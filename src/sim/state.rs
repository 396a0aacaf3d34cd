//! Session state and phase transitions
//!
//! Everything one game instance owns lives in `Session`: no globals, so tests
//! and multiple instances can run side by side. UI-driven transitions
//! (start, pause, retry, level select) are methods here; per-frame
//! simulation is in `tick`.

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::level::{Level, LevelSet};
use crate::consts::{ULTIMATE_COINS, ULTIMATE_TIME_SECS};
use crate::timer::RunTimer;
use crate::tuning::PhysicsTuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    #[default]
    Menu,
    /// Choosing an unlocked level
    LevelSelect,
    /// Active gameplay; the only phase that simulates
    Playing,
    /// Frozen mid-level
    Paused,
    /// Out of lives
    GameOver,
    /// Level cleared, waiting to load the next one
    Win,
    /// Final level cleared
    Victory,
}

/// Notifications for the presentation layer and persistence.
/// Drained by the caller after each tick or transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { score: u32 },
    LifeGained { lives: u32 },
    LifeLost { lives_left: u32 },
    Bounced,
    GameOver,
    LevelLoaded { level: u32 },
    LevelComplete { level: u32 },
    /// New high-water mark; persist it
    LevelUnlocked { max_level: u32 },
    /// Campaign finished; record a leaderboard entry
    Victory { time_secs: f64, coins: u32, ultimate: bool },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Work to run after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Load this level and resume play
    AdvanceLevel { to: u32 },
}

/// A delayed action tied to the phase generation it was scheduled in.
/// If the phase has changed since, it fires as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub action: Deferred,
    pub due_tick: u64,
    pub generation: u64,
}

/// Complete state of one platformer instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub tuning: PhysicsTuning,
    pub levels: LevelSet,
    /// 1-based number of the active level
    pub current_level: u32,
    /// Highest unlocked level (high-water mark)
    pub max_level_reached: u32,
    pub actor: Actor,
    pub phase: GamePhase,
    pub timer: RunTimer,
    /// Ticks simulated outside of pause
    pub time_ticks: u64,
    /// Bumped on every phase change
    generation: u64,
    pending: Option<PendingAction>,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Session {
    /// New session on the title screen
    pub fn new(levels: LevelSet, tuning: PhysicsTuning, max_level_reached: u32) -> Self {
        let max_level = max_level_reached.clamp(1, levels.len().max(1) as u32);
        let mut actor = Actor::player(tuning.starting_lives);
        if let Some(level) = levels.get(1) {
            actor.reset_to(level.spawn);
        }
        Self {
            tuning,
            levels,
            current_level: 1,
            max_level_reached: max_level,
            actor,
            phase: GamePhase::Menu,
            timer: RunTimer::new(),
            time_ticks: 0,
            generation: 0,
            pending: None,
            events: Vec::new(),
        }
    }

    /// Campaign with default tuning and only level 1 unlocked
    pub fn campaign() -> Self {
        Self::new(LevelSet::campaign(), PhysicsTuning::default(), 1)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn level(&self) -> Option<&Level> {
        self.levels.get(self.current_level)
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    /// Switch phase, invalidating anything scheduled under the old one
    pub(crate) fn enter(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        let from = self.phase;
        self.phase = phase;
        self.generation += 1;
        log::info!("Phase {:?} -> {:?}", from, phase);
        self.emit(GameEvent::PhaseChanged { from, to: phase });
    }

    /// Schedule an action `delay_ticks` from now, replacing any pending one
    pub(crate) fn schedule(&mut self, action: Deferred, delay_ticks: u32) {
        self.pending = Some(PendingAction {
            action,
            due_tick: self.time_ticks + delay_ticks as u64,
            generation: self.generation,
        });
    }

    /// Remove and return the pending action if it is due.
    /// Stale actions (scheduled in an earlier generation) are dropped.
    pub(crate) fn take_due_action(&mut self) -> Option<Deferred> {
        let pending = self.pending?;
        if pending.generation != self.generation {
            log::debug!("Dropping stale {:?}", pending.action);
            self.pending = None;
            return None;
        }
        if self.time_ticks < pending.due_tick {
            return None;
        }
        self.pending = None;
        Some(pending.action)
    }

    /// Make `number` the active level: fresh collectibles, actor at spawn.
    /// Lives and score carry over. Returns false for an unknown level.
    pub fn load_level(&mut self, number: u32, now_ms: f64) -> bool {
        let Some(level) = self.levels.get_mut(number) else {
            log::warn!("No level {}", number);
            return false;
        };
        level.reset();
        let spawn = level.spawn;

        self.current_level = number;
        self.actor.reset_to(spawn);
        self.enter(GamePhase::Playing);

        if number == 1 && !self.timer.is_running() {
            self.timer.start(now_ms);
        }
        log::info!("Loaded level {}", number);
        self.emit(GameEvent::LevelLoaded { level: number });
        true
    }

    /// Put the actor back at the level spawn and clear collectibles.
    /// Lives and score are untouched.
    pub fn reset_level(&mut self) {
        if let Some(level) = self.levels.get_mut(self.current_level) {
            level.reset();
            let spawn = level.spawn;
            self.actor.reset_to(spawn);
        }
    }

    /// Level reset plus default lives, zero score and a cleared timer
    pub fn reset_game(&mut self) {
        self.reset_level();
        self.actor.lives = self.tuning.starting_lives;
        self.actor.score = 0;
        self.timer.reset();
    }

    /// Menu "Start": fresh run from level 1
    pub fn start_game(&mut self, now_ms: f64) {
        self.current_level = 1;
        self.reset_game();
        self.load_level(1, now_ms);
    }

    /// Level select from the menu, the pause menu, or an end screen.
    /// Ending a run this way resets lives, score and timer first.
    /// Returns false (and stays put) from any other phase.
    pub fn open_level_select(&mut self, now_ms: f64) -> bool {
        match self.phase {
            GamePhase::Menu => {}
            GamePhase::Paused => self.timer.resume(now_ms),
            GamePhase::GameOver | GamePhase::Victory => self.reset_game(),
            GamePhase::LevelSelect => return true,
            GamePhase::Playing | GamePhase::Win => return false,
        }
        self.enter(GamePhase::LevelSelect);
        true
    }

    /// Start an unlocked level. Locked or unknown levels are refused.
    pub fn select_level(&mut self, number: u32, now_ms: f64) -> bool {
        if self.phase != GamePhase::LevelSelect {
            return false;
        }
        if number == 0 || number > self.max_level_reached {
            log::info!("Level {} is locked", number);
            return false;
        }
        self.load_level(number, now_ms)
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Playing {
            self.timer.pause(now_ms);
            self.enter(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Paused {
            self.timer.resume(now_ms);
            self.enter(GamePhase::Playing);
        }
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            GamePhase::Playing => self.pause(now_ms),
            GamePhase::Paused => self.resume(now_ms),
            _ => {}
        }
    }

    /// Pause menu "Retry level"
    pub fn retry_level(&mut self, now_ms: f64) {
        if self.phase == GamePhase::Paused {
            self.reset_level();
            self.resume(now_ms);
        }
    }

    /// Game-over "Restart": back to level 1 with progress wiped
    pub fn restart_campaign(&mut self, now_ms: f64) {
        self.max_level_reached = 1;
        self.emit(GameEvent::LevelUnlocked { max_level: 1 });
        self.start_game(now_ms);
    }

    /// Win screen "Next level" (skips the remaining delay)
    pub fn next_level(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Win {
            return;
        }
        self.pending = None;
        let next = self.current_level + 1;
        if self.levels.get(next).is_some() {
            self.load_level(next, now_ms);
        } else {
            self.enter(GamePhase::LevelSelect);
        }
    }

    /// Any "Main menu" button: full game reset
    pub fn return_to_menu(&mut self) {
        self.reset_game();
        self.enter(GamePhase::Menu);
    }

    /// Wipe unlocked levels and return to the menu.
    /// Leaderboards and the ultimate flag live in persistence.
    pub fn reset_progress(&mut self) {
        self.max_level_reached = 1;
        self.current_level = 1;
        self.emit(GameEvent::LevelUnlocked { max_level: 1 });
        self.return_to_menu();
    }

    /// Goal contact: raise the high-water mark, then either finish the
    /// campaign or schedule the next level
    pub(crate) fn complete_level(&mut self, now_ms: f64) {
        let level = self.current_level;
        let unlocked = (level + 1).min(self.levels.len() as u32);
        if unlocked > self.max_level_reached {
            self.max_level_reached = unlocked;
            self.emit(GameEvent::LevelUnlocked { max_level: unlocked });
        }
        self.emit(GameEvent::LevelComplete { level });

        if self.levels.is_last(level) {
            let time_secs = self.timer.stop(now_ms);
            let coins = self.actor.score;
            let ultimate = is_ultimate(time_secs, coins);
            self.enter(GamePhase::Victory);
            log::info!("Campaign complete in {:.2}s with {} coins", time_secs, coins);
            self.emit(GameEvent::Victory {
                time_secs,
                coins,
                ultimate,
            });
        } else {
            self.enter(GamePhase::Win);
            self.schedule(
                Deferred::AdvanceLevel { to: level + 1 },
                self.tuning.level_advance_delay_ticks,
            );
        }
    }
}

/// Fast and thorough enough for the ultimate title
pub fn is_ultimate(time_secs: f64, coins: u32) -> bool {
    time_secs < ULTIMATE_TIME_SECS && coins >= ULTIMATE_COINS
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_new_session_on_menu() {
        let s = Session::campaign();
        assert_eq!(s.phase, GamePhase::Menu);
        assert_eq!(s.current_level, 1);
        assert_eq!(s.actor.lives, 3);
        assert_eq!(s.actor.pos, Vec2::new(50.0, 495.0));
    }

    #[test]
    fn test_max_level_clamped() {
        let s = Session::new(LevelSet::campaign(), PhysicsTuning::default(), 99);
        assert_eq!(s.max_level_reached, 15);
        let s = Session::new(LevelSet::campaign(), PhysicsTuning::default(), 0);
        assert_eq!(s.max_level_reached, 1);
    }

    #[test]
    fn test_start_game_starts_timer() {
        let mut s = Session::campaign();
        s.start_game(1_000.0);
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(s.timer.is_running());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelLoaded { level: 1 }));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_locked_level_refused() {
        let mut s = Session::new(LevelSet::campaign(), PhysicsTuning::default(), 3);
        assert!(s.open_level_select(0.0));
        assert!(!s.select_level(4, 0.0));
        assert_eq!(s.phase, GamePhase::LevelSelect);
        assert!(s.select_level(3, 0.0));
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.current_level, 3);
    }

    #[test]
    fn test_level_select_after_game_over_restores_lives() {
        let mut s = Session::new(LevelSet::campaign(), PhysicsTuning::default(), 3);
        s.start_game(0.0);
        s.actor.lives = 0;
        s.actor.score = 12;
        s.enter(GamePhase::GameOver);

        assert!(s.open_level_select(1_000.0));
        assert_eq!(s.phase, GamePhase::LevelSelect);
        assert!(s.select_level(2, 1_000.0));
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.actor.lives, 3);
        assert_eq!(s.actor.score, 0);
    }

    #[test]
    fn test_level_select_refused_mid_level() {
        let mut s = Session::new(LevelSet::campaign(), PhysicsTuning::default(), 3);
        s.start_game(0.0);
        assert!(!s.open_level_select(0.0));
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(!s.select_level(2, 0.0));

        s.pause(500.0);
        assert!(s.open_level_select(800.0));
        assert_eq!(s.phase, GamePhase::LevelSelect);
    }

    #[test]
    fn test_pause_resume_keeps_state() {
        let mut s = Session::campaign();
        s.start_game(0.0);
        s.actor.pos = Vec2::new(300.0, 200.0);
        s.actor.vel = Vec2::new(5.0, -3.0);
        let gen_before = s.generation();

        s.pause(1_000.0);
        assert_eq!(s.phase, GamePhase::Paused);
        s.resume(5_000.0);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.actor.pos, Vec2::new(300.0, 200.0));
        assert_eq!(s.actor.vel, Vec2::new(5.0, -3.0));
        assert_eq!(s.generation(), gen_before + 2);
        assert_eq!(s.timer.elapsed_secs(6_000.0), 2.0);
    }

    #[test]
    fn test_reset_level_keeps_lives_and_score() {
        let mut s = Session::campaign();
        s.start_game(0.0);
        s.actor.lives = 2;
        s.actor.score = 7;
        s.actor.pos = Vec2::new(400.0, 100.0);
        if let Some(level) = s.levels.get_mut(1) {
            level.collectibles[0].collected = true;
        }

        s.reset_level();
        assert_eq!(s.actor.pos, s.actor.checkpoint);
        assert_eq!(s.actor.pos, Vec2::new(50.0, 495.0));
        assert_eq!(s.level().map(|l| l.remaining()), Some(5));
        assert_eq!(s.actor.lives, 2);
        assert_eq!(s.actor.score, 7);

        s.reset_game();
        assert_eq!(s.actor.lives, 3);
        assert_eq!(s.actor.score, 0);
    }

    #[test]
    fn test_stale_action_dropped() {
        let mut s = Session::campaign();
        s.start_game(0.0);
        s.enter(GamePhase::Win);
        s.schedule(Deferred::AdvanceLevel { to: 2 }, 0);
        s.enter(GamePhase::Menu);
        assert_eq!(s.take_due_action(), None);
        assert!(s.pending().is_none());
    }

    #[test]
    fn test_action_waits_for_due_tick() {
        let mut s = Session::campaign();
        s.schedule(Deferred::AdvanceLevel { to: 2 }, 3);
        assert_eq!(s.take_due_action(), None);
        s.time_ticks += 3;
        assert_eq!(s.take_due_action(), Some(Deferred::AdvanceLevel { to: 2 }));
        assert_eq!(s.take_due_action(), None);
    }

    #[test]
    fn test_reset_progress() {
        let mut s = Session::new(LevelSet::campaign(), PhysicsTuning::default(), 7);
        s.start_game(0.0);
        s.reset_progress();
        assert_eq!(s.max_level_reached, 1);
        assert_eq!(s.phase, GamePhase::Menu);
        assert!(
            s.drain_events()
                .contains(&GameEvent::LevelUnlocked { max_level: 1 })
        );
    }

    #[test]
    fn test_ultimate_threshold() {
        assert!(is_ultimate(179.9, 150));
        assert!(!is_ultimate(180.0, 200));
        assert!(!is_ultimate(100.0, 149));
    }
}
