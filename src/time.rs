//! Fixed-interval poll timer.
//!
//! `draw_web()` runs at display rate with a variable delta. `PollTimer`
//! turns those frames into whole poll intervals, so the miner refreshes its
//! pending counter and checks auto-collect on a steady one-second cadence.

pub struct PollTimer {
    interval_ms: f64,
    /// Milliseconds not yet consumed as polls.
    accumulator: f64,
    /// None until the first frame.
    last_timestamp: Option<f64>,
}

impl PollTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1) as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a frame timestamp (`performance.now()`), get the number of
    /// polls that fell due. A gap is clamped to one interval, so a tab that
    /// was backgrounded for an hour catches up with a single poll; accrual
    /// is wall-clock based and loses nothing.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, self.interval_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let polls = (self.accumulator / self.interval_ms) as u32;
        self.accumulator -= polls as f64 * self.interval_ms;
        polls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero() {
        let mut t = PollTimer::new(1_000);
        assert_eq!(t.update(5_000.0), 0);
    }

    #[test]
    fn one_poll_per_interval() {
        let mut t = PollTimer::new(1_000);
        t.update(0.0);
        assert_eq!(t.update(999.0), 0);
        assert_eq!(t.update(1_000.0), 1);
    }

    #[test]
    fn remainder_carried_over() {
        let mut t = PollTimer::new(1_000);
        t.update(0.0);
        assert_eq!(t.update(600.0), 0);
        assert_eq!(t.update(1_200.0), 1); // 1200ms accumulated
        assert_eq!(t.update(2_000.0), 1); // 200 + 800
    }

    #[test]
    fn long_gap_yields_single_poll() {
        let mut t = PollTimer::new(1_000);
        t.update(0.0);
        assert_eq!(t.update(3_600_000.0), 1);
        assert_eq!(t.update(3_600_016.0), 0);
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let mut t = PollTimer::new(1_000);
        t.update(10_000.0);
        assert_eq!(t.update(5_000.0), 0);
        assert_eq!(t.update(6_000.0), 1);
    }

    #[test]
    fn steady_60fps() {
        let mut t = PollTimer::new(1_000);
        t.update(0.0);
        let mut total = 0;
        for i in 1..=300 {
            total += t.update(i as f64 * 16.667);
        }
        // ~5 seconds of frames
        assert!((4..=5).contains(&total), "expected ~5 polls, got {total}");
    }
}
