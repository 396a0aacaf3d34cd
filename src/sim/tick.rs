//! Per-frame simulation tick
//!
//! One call per rendered frame: input → integrate → resolve geometry →
//! collect pickups → win/lose checks. Only `Playing` simulates; every other
//! phase is frozen apart from deferred actions.

use super::collision::{Contact, collect_pickups, resolve_geometry};
use super::geometry::CollectibleKind;
use super::state::{Deferred, GameEvent, GamePhase, Session};

/// Logical inputs for a single tick.
///
/// `left`/`right` are held state; the others are edges consumed by this tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key went down
    pub jump_pressed: bool,
    /// Jump key went up
    pub jump_released: bool,
    /// Pause toggle
    pub pause: bool,
    /// Monotonic clock for the run timer (milliseconds)
    pub now_ms: f64,
}

/// Advance the session by one tick
pub fn tick(session: &mut Session, input: &TickInput) {
    if input.pause {
        session.toggle_pause(input.now_ms);
    }

    if session.phase == GamePhase::Paused {
        return;
    }

    session.time_ticks += 1;
    // A transition frame does not also simulate
    if run_deferred(session, input.now_ms) {
        return;
    }

    if session.phase != GamePhase::Playing {
        return;
    }

    let tuning = session.tuning.clone();
    let actor = &mut session.actor;

    actor.steer(input.left, input.right, tuning.move_speed);
    if input.jump_pressed {
        actor.jump(tuning.jump_force);
    }
    if input.jump_released {
        actor.release_jump(tuning.jump_cut);
    }
    actor.integrate(&tuning);

    let Some(level) = session.levels.get_mut(session.current_level) else {
        log::warn!("Active level {} missing", session.current_level);
        return;
    };

    let resolution = resolve_geometry(actor, &level.geometry, &tuning);
    // Pickups only while the actor is still in play
    let pickups = if resolution.depleted() {
        Vec::new()
    } else {
        collect_pickups(actor, &mut level.collectibles, tuning.max_lives)
    };

    let (lives, score) = (actor.lives, actor.score);

    for contact in &resolution.contacts {
        match *contact {
            Contact::Bounced { .. } => session.emit(GameEvent::Bounced),
            Contact::Respawned { lives_left, .. } => {
                session.emit(GameEvent::LifeLost { lives_left });
            }
            Contact::Depleted { .. } => {
                session.emit(GameEvent::LifeLost { lives_left: 0 });
            }
            Contact::Landed { .. } | Contact::ReachedGoal { .. } => {}
        }
    }
    for pickup in &pickups {
        match pickup.kind {
            CollectibleKind::Coin => session.emit(GameEvent::CoinCollected { score }),
            CollectibleKind::LifeToken => session.emit(GameEvent::LifeGained { lives }),
        }
    }

    if resolution.depleted() {
        session.enter(GamePhase::GameOver);
        session.emit(GameEvent::GameOver);
    } else if resolution.reached_goal() {
        session.complete_level(input.now_ms);
    }
}

/// Fire the pending action if it is due and still belongs to this phase.
/// Returns true if something ran.
fn run_deferred(session: &mut Session, now_ms: f64) -> bool {
    match session.take_due_action() {
        Some(Deferred::AdvanceLevel { to }) if session.phase == GamePhase::Win => {
            session.load_level(to, now_ms)
        }
        _ => false,
    }
}
