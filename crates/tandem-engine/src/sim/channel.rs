use std::cell::RefCell;
use std::rc::Rc;

/// Light model of the ray-traced box.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

impl LightKind {
    /// Discriminant written into the light uniform.
    pub fn code(self) -> u32 {
        match self {
            LightKind::Point => 0,
            LightKind::Directional => 1,
            LightKind::Spot => 2,
        }
    }
}

/// Surface shading of the ray-traced box.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShadingMode {
    Lambert,
    Phong,
    Toon,
}

impl ShadingMode {
    pub fn code(self) -> u32 {
        match self {
            ShadingMode::Lambert => 0,
            ShadingMode::Phong => 1,
            ShadingMode::Toon => 2,
        }
    }
}

/// A user request addressed to the running scene object.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SimAction {
    TogglePause,
    SpeedUp,
    SlowDown,
    /// Activate up to `n` inactive particles.
    Emit(u32),
    ToggleAttract,
    /// Randomly reseed the automaton grid.
    Reseed,
    /// Pointer click at a normalised device position (`[-1, 1]`, y up).
    Click([f32; 2]),
    ToggleProjection,
    SelectLight(LightKind),
    SelectShading(ShadingMode),
    /// Add `delta` to the camera focal length.
    ChangeFocal(f32),
    ResetCamera,
}

/// Input shared between the event side and one scene object.
#[derive(Debug, Default)]
pub struct SimInput {
    /// Last pointer position in normalised device coordinates.
    pub pointer: Option<[f32; 2]>,
    actions: Vec<SimAction>,
}

impl SimInput {
    pub fn push(&mut self, action: SimAction) {
        self.actions.push(action);
    }

    /// Takes all queued actions in arrival order.
    pub fn drain(&mut self) -> Vec<SimAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn pending(&self) -> usize {
        self.actions.len()
    }
}

/// Single-threaded handle to a [`SimInput`]; the writer and reader each hold a clone.
pub type InputChannel = Rc<RefCell<SimInput>>;

pub fn input_channel() -> InputChannel {
    Rc::new(RefCell::new(SimInput::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let ch = input_channel();
        let reader = ch.clone();

        ch.borrow_mut().push(SimAction::Emit(100));
        ch.borrow_mut().push(SimAction::TogglePause);

        let got = reader.borrow_mut().drain();
        assert_eq!(got, vec![SimAction::Emit(100), SimAction::TogglePause]);
        assert_eq!(reader.borrow().pending(), 0);
    }

    #[test]
    fn pointer_is_shared() {
        let ch = input_channel();
        let reader = Rc::clone(&ch);
        ch.borrow_mut().pointer = Some([0.5, -0.25]);
        assert_eq!(reader.borrow().pointer, Some([0.5, -0.25]));
    }
}
