//! Keyboard and pointer bindings of the demos.

use tandem_engine::input::{InputFrame, Key, MouseButton};
use tandem_engine::scene::Demo;
use tandem_engine::sim::{LightKind, ShadingMode, SimAction};

/// Keys shared by every demo.
const COMMON: [(Key, SimAction); 3] = [
    (Key::P, SimAction::TogglePause),
    (Key::T, SimAction::SpeedUp),
    (Key::R, SimAction::SlowDown),
];

const PARTICLES: [(Key, SimAction); 2] = [
    (Key::E, SimAction::Emit(100)),
    (Key::A, SimAction::ToggleAttract),
];

const AUTOMATON: [(Key, SimAction); 1] = [(Key::G, SimAction::Reseed)];

const RAY_BOX: [(Key, SimAction); 8] = [
    (Key::C, SimAction::ToggleProjection),
    (Key::Digit1, SimAction::SelectLight(LightKind::Point)),
    (Key::Digit2, SimAction::SelectLight(LightKind::Directional)),
    (Key::Digit3, SimAction::SelectLight(LightKind::Spot)),
    (Key::Digit4, SimAction::SelectShading(ShadingMode::Lambert)),
    (Key::Digit5, SimAction::SelectShading(ShadingMode::Phong)),
    (Key::Digit6, SimAction::SelectShading(ShadingMode::Toon)),
    (Key::Backspace, SimAction::ResetCamera),
];

/// Actions triggered by this frame's input, in a fixed order.
pub fn actions(demo: Demo, frame: &InputFrame, pointer: Option<[f32; 2]>, focal_step: f32) -> Vec<SimAction> {
    let specific: &[(Key, SimAction)] = match demo {
        Demo::Particles => &PARTICLES,
        Demo::Automaton => &AUTOMATON,
        Demo::RayBox => &RAY_BOX,
    };

    let mut out: Vec<SimAction> = COMMON
        .iter()
        .chain(specific)
        .filter(|(key, _)| frame.pressed(*key))
        .map(|&(_, action)| action)
        .collect();

    match demo {
        Demo::Automaton => {
            if let Some(ndc) = pointer.filter(|_| frame.clicked(MouseButton::Left)) {
                out.push(SimAction::Click(ndc));
            }
        }
        Demo::RayBox => {
            if frame.pressed(Key::Equal) {
                out.push(SimAction::ChangeFocal(focal_step));
            }
            if frame.pressed(Key::Minus) {
                out.push(SimAction::ChangeFocal(-focal_step));
            }
        }
        Demo::Particles => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(keys: &[Key]) -> InputFrame {
        let mut f = InputFrame::default();
        f.keys_pressed.extend(keys.iter().copied());
        f
    }

    #[test]
    fn common_keys_work_everywhere() {
        for demo in Demo::ALL {
            let got = actions(demo, &frame(&[Key::P, Key::T]), None, 0.1);
            assert_eq!(got, vec![SimAction::TogglePause, SimAction::SpeedUp]);
        }
    }

    #[test]
    fn demo_keys_stay_in_their_demo() {
        let f = frame(&[Key::E, Key::G, Key::Digit3]);
        assert_eq!(actions(Demo::Particles, &f, None, 0.1), vec![SimAction::Emit(100)]);
        assert_eq!(actions(Demo::Automaton, &f, None, 0.1), vec![SimAction::Reseed]);
        assert_eq!(
            actions(Demo::RayBox, &f, None, 0.1),
            vec![SimAction::SelectLight(LightKind::Spot)]
        );
    }

    #[test]
    fn click_needs_pointer_over_window() {
        let mut f = frame(&[]);
        f.buttons_pressed.insert(MouseButton::Left);
        assert!(actions(Demo::Automaton, &f, None, 0.1).is_empty());
        assert_eq!(
            actions(Demo::Automaton, &f, Some([0.5, -0.25]), 0.1),
            vec![SimAction::Click([0.5, -0.25])]
        );
        assert!(actions(Demo::Particles, &f, Some([0.5, -0.25]), 0.1).is_empty());
    }

    #[test]
    fn focal_keys_use_step() {
        let f = frame(&[Key::Equal, Key::Minus]);
        assert_eq!(
            actions(Demo::RayBox, &f, None, 0.25),
            vec![SimAction::ChangeFocal(0.25), SimAction::ChangeFocal(-0.25)]
        );
    }
}
