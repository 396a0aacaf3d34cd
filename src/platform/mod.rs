//! Platform abstraction layer
//!
//! Turns browser/native events into the logical inputs the simulation
//! consumes. Storage lives in `persistence`.

pub mod input;

pub use input::{Action, InputState, action_for_key};
