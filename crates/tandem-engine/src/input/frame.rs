use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Presses that happened since the previous frame.
///
/// Auto-repeat never counts as a new press. Cleared by the runtime after each
/// frame, whether or not the frame succeeded.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys_pressed.is_empty() && self.buttons_pressed.is_empty()
    }

    #[inline]
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn clicked(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }
}
