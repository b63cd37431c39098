use std::time::{Duration, Instant};

/// Longest step handed to a simulation after a stall.
const MAX_DT: Duration = Duration::from_millis(250);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped to `MAX_DT`.
    pub dt: f32,
    /// Frames ticked before this one.
    pub frame: u64,
}

/// Measures frame-to-frame wall time.
///
/// The first tick has no predecessor and reports the nominal interval
/// instead of the time spent creating the window and device.
#[derive(Debug, Clone)]
pub struct FrameClock {
    nominal: Duration,
    last: Option<Instant>,
    frame: u64,
}

impl FrameClock {
    pub fn new(nominal: Duration) -> Self {
        Self {
            nominal: nominal.min(MAX_DT),
            last: None,
            frame: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last.replace(now) {
            Some(last) => now.saturating_duration_since(last).min(MAX_DT),
            None => self.nominal,
        };
        let time = FrameTime {
            dt: dt.as_secs_f32(),
            frame: self.frame,
        };
        self.frame += 1;
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_nominal_then_wall_time() {
        let mut clock = FrameClock::new(Duration::from_millis(16));
        let t0 = Instant::now();

        let first = clock.tick_at(t0 + Duration::from_secs(3));
        assert_eq!(first.frame, 0);
        assert!((first.dt - 0.016).abs() < 1e-6);

        let second = clock.tick_at(t0 + Duration::from_secs(3) + Duration::from_millis(20));
        assert_eq!(second.frame, 1);
        assert!((second.dt - 0.020).abs() < 1e-6);
    }

    #[test]
    fn stalls_are_clamped() {
        let mut clock = FrameClock::new(Duration::from_millis(16));
        let t0 = Instant::now();
        clock.tick_at(t0);
        let after_stall = clock.tick_at(t0 + Duration::from_secs(10));
        assert!((after_stall.dt - 0.25).abs() < 1e-6);
        // a clock running backwards yields zero
        assert_eq!(clock.tick_at(t0).dt, 0.0);
    }
}
