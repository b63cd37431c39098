use std::collections::HashSet;

use crate::coords::Viewport;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, MouseButton, Press};

/// What is held right now and where the pointer is.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Logical pixels, top-left origin. `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the held state and records fresh presses in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // releases are not delivered to an unfocused window
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some((x, y)),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, press, repeat } => match press {
                Press::Down => {
                    if self.keys_down.insert(key) && !repeat {
                        frame.keys_pressed.insert(key);
                    }
                }
                Press::Up => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::PointerButton { button, press } => match press {
                Press::Down => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                Press::Up => {
                    self.buttons_down.remove(&button);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Pointer position in normalised device coordinates for `viewport`.
    pub fn pointer_ndc(&self, viewport: Viewport) -> Option<[f32; 2]> {
        let (x, y) = self.pointer_pos?;
        viewport.to_ndc(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, press: Press, repeat: bool) -> InputEvent {
        InputEvent::Key { key, press, repeat }
    }

    #[test]
    fn press_is_reported_once_while_held() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, key(Key::P, Press::Down, false));
        assert!(f.pressed(Key::P));
        f.clear();

        s.apply_event(&mut f, key(Key::P, Press::Down, true));
        assert!(f.is_empty());
        assert!(s.key_down(Key::P));

        s.apply_event(&mut f, key(Key::P, Press::Up, false));
        assert!(!s.key_down(Key::P));
        assert!(f.is_empty());
    }

    #[test]
    fn focus_loss_clears_held() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::E, Press::Down, false));
        s.apply_event(&mut f, InputEvent::PointerButton { button: MouseButton::Left, press: Press::Down });
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(!s.key_down(Key::E));
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn click_counts_once_per_press() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        let down = InputEvent::PointerButton { button: MouseButton::Left, press: Press::Down };
        s.apply_event(&mut f, down);
        assert!(f.clicked(MouseButton::Left));
        f.clear();
        s.apply_event(&mut f, down);
        assert!(!f.clicked(MouseButton::Left));
    }

    #[test]
    fn pointer_ndc_follows_moves() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        let vp = Viewport::new(200.0, 100.0);
        assert_eq!(s.pointer_ndc(vp), None);

        s.apply_event(&mut f, InputEvent::PointerMoved { x: 150.0, y: 25.0 });
        assert_eq!(s.pointer_ndc(vp), Some([0.5, 0.5]));

        s.apply_event(&mut f, InputEvent::PointerLeft);
        assert_eq!(s.pointer_ndc(vp), None);
    }
}
