/// Keys the demos react to.
///
/// Platform keycodes outside this set arrive as `Other` with the raw code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Backspace,
    /// `=` / `+`, main row or keypad.
    Equal,
    /// `-`, main row or keypad.
    Minus,

    A, C, E, G, P, R, T,

    Digit1, Digit2, Digit3, Digit4, Digit5, Digit6,

    Other(u32),
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Press or release, for keys and buttons alike.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Press {
    Down,
    Up,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        press: Press,
        /// OS auto-repeat of a held key.
        repeat: bool,
    },

    /// Pointer position in logical pixels, top-left origin.
    PointerMoved { x: f32, y: f32 },

    PointerButton { button: MouseButton, press: Press },

    /// Pointer left the window surface.
    PointerLeft,

    Focused(bool),
}
