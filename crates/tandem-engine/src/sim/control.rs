/// Host-side run state of one simulation.
///
/// `paused` gates compute dispatch and step advance; render keeps running.
/// `speed` only scales the step count reported in diagnostics. It never
/// changes how many dispatches happen per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SimControl {
    paused: bool,
    speed: f32,
}

impl SimControl {
    pub const SPEED_UP: f32 = 1.2;
    pub const SLOW_DOWN: f32 = 0.8;

    pub fn new() -> Self {
        Self { paused: false, speed: 1.0 }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Flips the paused flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn speed_up(&mut self) {
        self.speed *= Self::SPEED_UP;
        log::info!("simulation speed: {:.2}x", self.speed);
    }

    pub fn slow_down(&mut self) {
        self.speed *= Self::SLOW_DOWN;
        log::info!("simulation speed: {:.2}x", self.speed);
    }

    /// Step count shown to the user: `ceil(step * speed)`.
    pub fn reported_step(&self, step: u64) -> u64 {
        (step as f64 * f64::from(self.speed)).ceil() as u64
    }
}

impl Default for SimControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_pause_round_trips() {
        let mut c = SimControl::new();
        assert!(c.toggle_pause());
        assert!(c.is_paused());
        assert!(!c.toggle_pause());
    }

    #[test]
    fn reported_step_scales_and_rounds_up() {
        let mut c = SimControl::new();
        assert_eq!(c.reported_step(10), 10);

        c.speed_up();
        assert_eq!(c.reported_step(7), 9); // 8.4

        c.slow_down();
        c.slow_down();
        // 1.2 * 0.8 * 0.8 = 0.768
        assert_eq!(c.reported_step(10), 8);
        assert_eq!(c.reported_step(0), 0);
    }
}
