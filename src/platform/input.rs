//! Keyboard input to per-tick commands

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Start, launch and fire
    Space,
    /// Toggles the never-expiring laser
    DebugLaser,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Left" | "ArrowLeft" => Some(Key::Left),
            "Right" | "ArrowRight" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Space),
            "l" | "L" => Some(Key::DebugLaser),
            _ => None,
        }
    }
}

/// Level and edge state built from key events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    space_held: bool,
    laser_held: bool,
    serve_pending: bool,
    toggle_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed. Auto-repeat while held does not re-trigger.
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Space => {
                if !self.space_held {
                    self.serve_pending = true;
                }
                self.space_held = true;
            }
            Key::DebugLaser => {
                if !self.laser_held {
                    self.toggle_pending = true;
                }
                self.laser_held = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Space => self.space_held = false,
            Key::DebugLaser => self.laser_held = false,
        }
    }

    /// Press the serve button from code (autopilot)
    pub fn press_serve(&mut self) {
        self.serve_pending = true;
    }

    /// Force the held direction (autopilot)
    pub fn set_direction(&mut self, left: bool, right: bool) {
        self.left = left;
        self.right = right;
    }

    /// Input for the next tick; one-shot presses are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            serve_or_fire: self.serve_pending,
            toggle_laser: self.toggle_pending,
        };
        self.serve_pending = false;
        self.toggle_pending = false;
        input
    }

    /// Drop everything, e.g. after a restart
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_key_name("Right"), Some(Key::Right));
        assert_eq!(Key::from_key_name(" "), Some(Key::Space));
        assert_eq!(Key::from_key_name("L"), Some(Key::DebugLaser));
        assert_eq!(Key::from_key_name("Enter"), None);
    }

    #[test]
    fn test_held_direction_persists() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        assert!(input.take_tick_input().left);
        assert!(input.take_tick_input().left);
        input.key_up(Key::Left);
        assert!(!input.take_tick_input().left);
    }

    #[test]
    fn test_space_is_edge_triggered() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.take_tick_input().serve_or_fire);
        assert!(!input.take_tick_input().serve_or_fire);

        // Auto-repeat while held
        input.key_down(Key::Space);
        assert!(!input.take_tick_input().serve_or_fire);

        input.key_up(Key::Space);
        input.key_down(Key::Space);
        assert!(input.take_tick_input().serve_or_fire);
    }

    #[test]
    fn test_press_between_ticks_is_not_lost() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_up(Key::Space);
        input.key_down(Key::DebugLaser);
        input.key_up(Key::DebugLaser);
        let tick = input.take_tick_input();
        assert!(tick.serve_or_fire);
        assert!(tick.toggle_laser);
    }
}
