/// Limits a host callback stream (e.g. `requestAnimationFrame`) to a target rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_ms: f64,
}

impl FrameThrottle {
    pub fn new(fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / fps.max(f64::MIN_POSITIVE),
            last_ms: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether a frame should be painted at `timestamp_ms`.
    ///
    /// The accepted time is snapped back by the overshoot so the long-run rate
    /// stays at the target instead of drifting below it.
    pub fn accept(&mut self, timestamp_ms: f64) -> bool {
        let elapsed = timestamp_ms - self.last_ms;
        if elapsed < self.interval_ms {
            return false;
        }
        self.last_ms = timestamp_ms - (elapsed % self.interval_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted_over_one_second(fps: f64, host_hz: f64) -> usize {
        let mut throttle = FrameThrottle::new(fps);
        let step = 1000.0 / host_hz;
        (1..=host_hz as usize)
            .filter(|&i| throttle.accept(i as f64 * step))
            .count()
    }

    #[test]
    fn fast_host_is_limited_to_target_rate() {
        let painted = accepted_over_one_second(30.0, 240.0);
        assert!((27..=31).contains(&painted), "painted {painted} frames");
    }

    #[test]
    fn slow_host_paints_every_callback() {
        assert_eq!(accepted_over_one_second(30.0, 20.0), 20);
    }

    #[test]
    fn first_callback_at_zero_is_skipped() {
        let mut throttle = FrameThrottle::new(30.0);
        assert!(!throttle.accept(0.0));
        assert!(throttle.accept(40.0));
        assert!(!throttle.accept(50.0));
    }

    #[test]
    fn reset_rewinds_the_clock() {
        let mut throttle = FrameThrottle::new(30.0);
        assert!(throttle.accept(5000.0));
        throttle.reset();
        assert!(throttle.accept(34.0));
    }
}
