//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (declaration order of level geometry)
//! - No rendering, storage or platform dependencies

pub mod actor;
pub mod collision;
pub mod course;
pub mod geometry;
pub mod level;
pub mod state;
pub mod tick;

pub use actor::{Actor, Facing};
pub use collision::{Contact, Pickup, Resolution, collect_pickups, lands_on, resolve_geometry};
pub use course::{Course, CourseEvent, CoursePhase, Pipe};
pub use geometry::{Collectible, CollectibleKind, GeometryKind, Rect, StaticGeometry};
pub use level::{Level, LevelSet};
pub use state::{Deferred, GameEvent, GamePhase, PendingAction, Session, is_ultimate};
pub use tick::{TickInput, tick};
