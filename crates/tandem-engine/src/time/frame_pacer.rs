use std::time::{Duration, Instant};

/// Decision returned by [`FramePacer::poll`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pace {
    /// Not due yet; wake up again at this instant.
    Wait(Instant),
    /// Render now. `fps` is set once per second with the measured rate.
    Render { fps: Option<u32> },
}

/// Fixed-interval frame pacing.
///
/// A frame is due once at least one interval has elapsed since the last
/// rendered frame. The overshoot is carried into the next interval, so a
/// late frame does not push every later frame back.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    last: Option<Instant>,
    window_start: Option<Instant>,
    frames_in_window: u32,
}

impl FramePacer {
    /// # Panics
    /// Panics if `target_fps` is zero.
    pub fn new(target_fps: u32) -> Self {
        assert!(target_fps > 0, "target_fps must be non-zero");
        Self::with_interval(Duration::from_secs_f64(1.0 / f64::from(target_fps)))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            window_start: None,
            frames_in_window: 0,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Instant at which the next frame becomes due.
    pub fn next_deadline(&self, now: Instant) -> Instant {
        self.last.map_or(now, |last| last + self.interval)
    }

    /// Decides whether to render at `now`; on `Render`, the frame is counted.
    pub fn poll(&mut self, now: Instant) -> Pace {
        if let Some(last) = self.last {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.interval {
                return Pace::Wait(last + self.interval);
            }

            let carry = elapsed.as_nanos() % self.interval.as_nanos().max(1);
            self.last = Some(now - Duration::from_nanos(carry as u64));
        } else {
            self.last = Some(now);
        }

        Pace::Render { fps: self.count_frame(now) }
    }

    fn count_frame(&mut self, now: Instant) -> Option<u32> {
        self.frames_in_window += 1;
        let start = *self.window_start.get_or_insert(now);

        let span = now.saturating_duration_since(start);
        if span < Duration::from_secs(1) {
            return None;
        }

        let fps = (f64::from(self.frames_in_window) / span.as_secs_f64()).round() as u32;
        log::info!("fps: {fps}");
        self.window_start = Some(now);
        self.frames_in_window = 0;
        Some(fps)
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_poll_renders() {
        let mut p = FramePacer::with_interval(ms(10));
        let t0 = Instant::now();
        assert!(matches!(p.poll(t0), Pace::Render { .. }));
        assert_eq!(p.poll(t0 + ms(3)), Pace::Wait(t0 + ms(10)));
    }

    #[test]
    fn overshoot_is_carried() {
        let mut p = FramePacer::with_interval(ms(10));
        let t0 = Instant::now();
        p.poll(t0);

        // 14ms late: the next frame is due 6ms later, not 10ms.
        assert!(matches!(p.poll(t0 + ms(14)), Pace::Render { .. }));
        assert_eq!(p.next_deadline(t0 + ms(14)), t0 + ms(20));
        assert!(matches!(p.poll(t0 + ms(20)), Pace::Render { .. }));
    }

    #[test]
    fn fps_reported_once_per_second() {
        let mut p = FramePacer::with_interval(ms(10));
        let t0 = Instant::now();

        let mut reports = Vec::new();
        for i in 0..=200u64 {
            if let Pace::Render { fps: Some(fps) } = p.poll(t0 + ms(i * 10)) {
                reports.push(fps);
            }
        }
        assert_eq!(reports, vec![101, 100]);
    }

    #[test]
    fn default_is_sixty_hz() {
        let p = FramePacer::default();
        assert_eq!(p.interval().as_micros(), 16_666);
    }
}
