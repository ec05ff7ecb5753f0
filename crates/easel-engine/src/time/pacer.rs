use std::time::{Duration, Instant};

/// Minimum-frame-period pacing for a producer loop.
///
/// The producer calls [`FramePacer::deadline`] when it finishes a frame to
/// learn how long it must wait before starting the next one, then
/// [`FramePacer::mark`] once it actually starts. The first frame has no
/// predecessor and is never delayed by the period, only by `extra`.
#[derive(Debug, Clone)]
pub struct FramePacer {
    period: Duration,
    last_start: Option<Instant>,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self { period, last_start: None }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Earliest instant the next frame may start, given `now` and an
    /// additional caller-requested delay.
    pub fn deadline(&self, now: Instant, extra: Duration) -> Instant {
        let paced = match self.last_start {
            Some(start) => (start + self.period).max(now),
            None => now,
        };
        paced + extra
    }

    /// Records that a frame started at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_start = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_only_waits_for_extra() {
        let pacer = FramePacer::new(Duration::from_millis(16));
        let now = Instant::now();
        assert_eq!(pacer.deadline(now, Duration::ZERO), now);
        assert_eq!(pacer.deadline(now, Duration::from_millis(5)), now + Duration::from_millis(5));
    }

    #[test]
    fn fast_frame_waits_out_the_period() {
        let mut pacer = FramePacer::new(Duration::from_millis(16));
        let start = Instant::now();
        pacer.mark(start);
        let now = start + Duration::from_millis(4);
        assert_eq!(pacer.deadline(now, Duration::ZERO), start + Duration::from_millis(16));
    }

    #[test]
    fn slow_frame_is_not_delayed_further() {
        let mut pacer = FramePacer::new(Duration::from_millis(16));
        let start = Instant::now();
        pacer.mark(start);
        let now = start + Duration::from_millis(40);
        assert_eq!(pacer.deadline(now, Duration::from_millis(10)), now + Duration::from_millis(10));
    }
}
