use std::time::{Duration, Instant};

/// Default reposition interval, one update per animation frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Local rate limiter for pointer-move repositioning. Not a scheduler:
/// it only answers "may I run now", and counts how many requests were
/// deferred inside the current window so bursts collapse to a single
/// trailing update.
pub struct FrameThrottle {
    interval: Duration,
    window_start: Option<Instant>,
    deferred_count: u64,
}

impl FrameThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: None,
            deferred_count: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if a new interval window has started and the caller
    /// may reposition now.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        match self.window_start {
            None => {
                self.window_start = Some(now);
                true
            }
            Some(start) => {
                if now.duration_since(start) >= self.interval {
                    self.window_start = Some(now);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn incr_deferred(&mut self) {
        self.deferred_count = self.deferred_count.saturating_add(1);
    }

    /// Requests swallowed by the throttle since creation.
    pub fn deferred(&self) -> u64 {
        self.deferred_count
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_immediate() {
        let mut throttle = FrameThrottle::default();
        assert!(throttle.allow());
    }

    #[test]
    fn requests_inside_the_window_are_denied() {
        let mut throttle = FrameThrottle::new(Duration::from_secs(60));
        assert!(throttle.allow());
        assert!(!throttle.allow());
        assert!(!throttle.allow());
    }

    #[test]
    fn window_reopens_after_the_interval() {
        let mut throttle = FrameThrottle::new(Duration::from_millis(1));
        assert!(throttle.allow());
        std::thread::sleep(Duration::from_millis(3));
        assert!(throttle.allow());
    }
}
