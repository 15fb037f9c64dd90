//! Repeating tasks with jittered delay.
//!
//! A counter does not run on a fixed interval. Each step runs once, then
//! tells the scheduler how long to wait before the next step. The next timer
//! is only armed after the current step returns, so steps never overlap.

use gloo_timers::callback::Timeout;
use serde::Deserialize;

use crate::rng::RandomSource;

/// Inclusive delay window in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    pub min_ms: u32,
    pub max_ms: u32,
}

impl DelayRange {
    pub const fn new(min_ms: u32, max_ms: u32) -> Self {
        Self { min_ms, max_ms }
    }

    /// Uniform draw in `min_ms..=max_ms`.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max_ms <= self.min_ms {
            return self.min_ms;
        }
        // Widened: the span of `0..=u32::MAX` does not fit in u32.
        let span = u64::from(self.max_ms) - u64::from(self.min_ms) + 1;
        let offset = ((rng.next_f64() * span as f64) as u64).min(span - 1);
        (u64::from(self.min_ms) + offset) as u32
    }

    #[cfg(test)]
    pub fn contains(&self, ms: u32) -> bool {
        (self.min_ms..=self.max_ms).contains(&ms)
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }
}

/// Run `step` after `first_delay_ms`, then keep running it, each time
/// waiting for the delay returned by the previous run. Runs until unload.
pub fn repeat<F>(first_delay_ms: u32, step: F)
where
    F: FnMut() -> u32 + 'static,
{
    arm(first_delay_ms, Box::new(step));
}

fn arm(delay_ms: u32, mut step: Box<dyn FnMut() -> u32>) {
    Timeout::new(delay_ms, move || {
        let next = step();
        arm(next, step);
    })
    .forget();
}

/// Run `f` once after `delay_ms`.
pub fn once<F>(delay_ms: u32, f: F)
where
    F: FnOnce() + 'static,
{
    Timeout::new(delay_ms, f).forget();
}

/// Offline replay of a repeating task: fires `step` on a virtual clock
/// until `horizon_ms`, returning the firing times.
#[cfg(test)]
pub fn replay<F>(first_delay_ms: u32, horizon_ms: u64, mut step: F) -> Vec<u64>
where
    F: FnMut() -> u32,
{
    let mut fired = Vec::new();
    let mut now = first_delay_ms as u64;
    while now <= horizon_ms {
        fired.push(now);
        now += step() as u64;
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Lcg, Scripted};

    #[test]
    fn sample_hits_both_bounds() {
        let range = DelayRange::new(500, 1500);
        assert_eq!(range.sample(&mut Scripted::new(&[0.0])), 500);
        assert_eq!(range.sample(&mut Scripted::new(&[0.999_999_9])), 1500);
    }

    #[test]
    fn sample_degenerate_range() {
        let range = DelayRange::new(1200, 1200);
        assert_eq!(range.sample(&mut Lcg::new(3)), 1200);
    }

    #[test]
    fn sample_always_contained() {
        let range = DelayRange::new(2000, 4000);
        let mut rng = Lcg::new(99);
        for _ in 0..5_000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }

    #[test]
    fn sample_full_u32_range_does_not_overflow() {
        let range = DelayRange::new(0, u32::MAX);
        assert_eq!(range.sample(&mut Scripted::new(&[0.0])), 0);
        assert_eq!(range.sample(&mut Scripted::new(&[0.999_999_999_99])), u32::MAX);
        let mut rng = Lcg::new(4);
        for _ in 0..1_000 {
            let _ = range.sample(&mut rng);
        }
    }

    #[test]
    fn inverted_range_is_invalid() {
        assert!(!DelayRange::new(10, 5).is_valid());
        assert!(DelayRange::new(5, 5).is_valid());
    }

    #[test]
    fn replay_accumulates_delays() {
        let mut delays = vec![100, 200, 300].into_iter();
        let fired = replay(50, 700, || delays.next().unwrap_or(1_000));
        assert_eq!(fired, vec![50, 150, 350, 650]);
    }

    #[test]
    fn replay_first_delay_past_horizon_never_fires() {
        let fired = replay(1500, 1000, || 1);
        assert!(fired.is_empty());
    }
}
