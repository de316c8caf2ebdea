//! Keyboard / touch routing.
//!
//! Event handlers only flip flags here; the simulation reads held directions and
//! consumes one-shot actions on its next `update`.

use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Interact,
    Pause,
}

/// Key binding table. Keys are compared lower-cased (`KeyboardEvent.key`).
pub fn action_for_key(key: &str) -> Option<Action> {
    match key.to_ascii_lowercase().as_str() {
        "arrowleft" | "a" => Some(Action::MoveLeft),
        "arrowright" | "d" => Some(Action::MoveRight),
        " " | "arrowup" => Some(Action::Jump),
        "e" | "enter" => Some(Action::Interact),
        "escape" | "p" => Some(Action::Pause),
        _ => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    // Lower-cased movement keys currently down; a direction stays held while any
    // of its keys is.
    held: BTreeSet<String>,
    jump_pending: bool,
    interact_pending: bool,
}

impl InputState {
    /// Apply a key-down. Returns the bound action so the caller can handle
    /// session-level ones (pause) and suppress browser scrolling for jump.
    pub fn key_down(&mut self, key: &str) -> Option<Action> {
        let action = action_for_key(key)?;
        match action {
            Action::MoveLeft | Action::MoveRight => {
                self.held.insert(key.to_ascii_lowercase());
                self.sync_directions();
            }
            Action::Jump => self.jump_pending = true,
            Action::Interact => self.interact_pending = true,
            Action::Pause => {}
        }
        Some(action)
    }

    pub fn key_up(&mut self, key: &str) {
        if self.held.remove(&key.to_ascii_lowercase()) {
            self.sync_directions();
        }
    }

    fn sync_directions(&mut self) {
        let held = |dir: Action| self.held.iter().any(|k| action_for_key(k) == Some(dir));
        let (left, right) = (held(Action::MoveLeft), held(Action::MoveRight));
        self.left = left;
        self.right = right;
    }

    pub fn press_jump(&mut self) {
        self.jump_pending = true;
    }

    pub fn press_interact(&mut self) {
        self.interact_pending = true;
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pending)
    }

    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact_pending)
    }

    /// Drop everything (new game, pause, modal overlays).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_cover_both_triggers() {
        assert_eq!(action_for_key("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(action_for_key("A"), Some(Action::MoveLeft));
        assert_eq!(action_for_key("d"), Some(Action::MoveRight));
        assert_eq!(action_for_key(" "), Some(Action::Jump));
        assert_eq!(action_for_key("ArrowUp"), Some(Action::Jump));
        assert_eq!(action_for_key("e"), Some(Action::Interact));
        assert_eq!(action_for_key("Enter"), Some(Action::Interact));
        assert_eq!(action_for_key("Escape"), Some(Action::Pause));
        assert_eq!(action_for_key("x"), None);
    }

    #[test]
    fn held_keys_track_down_and_up() {
        let mut input = InputState::default();
        input.key_down("ArrowRight");
        assert!(input.right);
        input.key_up("d");
        assert!(input.right, "d was never down");
        input.key_up("ArrowRight");
        assert!(!input.right);
    }

    #[test]
    fn direction_stays_held_while_any_of_its_keys_is() {
        let mut input = InputState::default();
        input.key_down("ArrowLeft");
        input.key_down("a");
        input.key_up("a");
        assert!(input.left);
        input.key_down("D");
        assert!(input.left && input.right);
        input.key_up("ArrowLeft");
        assert!(!input.left);
        input.key_up("d");
        assert!(!input.right);
    }

    #[test]
    fn one_shot_actions_are_consumed_once() {
        let mut input = InputState::default();
        assert_eq!(input.key_down(" "), Some(Action::Jump));
        assert!(input.take_jump());
        assert!(!input.take_jump());
        input.press_interact();
        assert!(input.take_interact());
        assert!(!input.take_interact());
    }

    #[test]
    fn clear_drops_held_and_pending() {
        let mut input = InputState::default();
        input.key_down("a");
        input.key_down("e");
        input.clear();
        assert_eq!(input, InputState::default());
    }
}
