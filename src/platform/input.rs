//! Keyboard mapping and per-frame input snapshots

use crate::sim::TickInput;

/// Logical game action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
}

/// Map a `KeyboardEvent.key` value to an action (case-insensitive)
pub fn action_for_key(key: &str) -> Option<Action> {
    match key.to_ascii_lowercase().as_str() {
        "a" | "arrowleft" => Some(Action::MoveLeft),
        "d" | "arrowright" => Some(Action::MoveRight),
        "w" | "arrowup" | " " | "space" | "spacebar" => Some(Action::Jump),
        "p" | "escape" => Some(Action::Pause),
        _ => None,
    }
}

/// Held keys plus edges collected since the last frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    jump_pressed: bool,
    jump_released: bool,
    pause: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the key is bound
    /// (callers use this to suppress page scrolling).
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = action_for_key(key) else {
            return false;
        };
        match action {
            Action::MoveLeft => self.left = true,
            Action::MoveRight => self.right = true,
            Action::Jump => {
                // Auto-repeat counts as a fresh press, so holding jump hops
                self.jump_held = true;
                self.jump_pressed = true;
            }
            Action::Pause => self.pause = true,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(action) = action_for_key(key) else {
            return false;
        };
        match action {
            Action::MoveLeft => self.left = false,
            Action::MoveRight => self.right = false,
            Action::Jump => {
                self.jump_held = false;
                self.jump_released = true;
            }
            Action::Pause => {}
        }
        true
    }

    /// Request a pause toggle from outside the keyboard (focus loss, menu)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Drop held keys, e.g. when the window loses focus and key-ups are lost
    pub fn release_all(&mut self) {
        if self.jump_held {
            self.jump_released = true;
        }
        self.left = false;
        self.right = false;
        self.jump_held = false;
    }

    /// Snapshot for one tick; edges are consumed
    pub fn take(&mut self, now_ms: f64) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            jump_pressed: self.jump_pressed,
            jump_released: self.jump_released,
            pause: self.pause,
            now_ms,
        };
        self.jump_pressed = false;
        self.jump_released = false;
        self.pause = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for_key("a"), Some(Action::MoveLeft));
        assert_eq!(action_for_key("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(action_for_key("D"), Some(Action::MoveRight));
        assert_eq!(action_for_key(" "), Some(Action::Jump));
        assert_eq!(action_for_key("ArrowUp"), Some(Action::Jump));
        assert_eq!(action_for_key("Escape"), Some(Action::Pause));
        assert_eq!(action_for_key("p"), Some(Action::Pause));
        assert_eq!(action_for_key("q"), None);
    }

    #[test]
    fn test_edges_consumed_once() {
        let mut input = InputState::new();
        input.key_down("w");
        input.key_down("p");
        let first = input.take(16.0);
        assert!(first.jump_pressed);
        assert!(first.pause);
        assert_eq!(first.now_ms, 16.0);

        let second = input.take(32.0);
        assert!(!second.jump_pressed);
        assert!(!second.pause);
        assert!(input.jump_held);
    }

    #[test]
    fn test_held_direction_persists() {
        let mut input = InputState::new();
        input.key_down("ArrowRight");
        assert!(input.take(0.0).right);
        assert!(input.take(0.0).right);
        input.key_up("ArrowRight");
        assert!(!input.take(0.0).right);
    }

    #[test]
    fn test_release_all_emits_jump_release() {
        let mut input = InputState::new();
        input.key_down(" ");
        input.key_down("a");
        input.take(0.0);
        input.release_all();
        let snap = input.take(0.0);
        assert!(snap.jump_released);
        assert!(!snap.left);
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut input = InputState::new();
        assert!(!input.key_down("Tab"));
        assert!(!input.key_up("Tab"));
    }
}
