//! Randomness sources for the cosmetic counters.
//!
//! In the browser every draw comes from `Math.random()`. Tests use a seeded
//! LCG so walks are reproducible.

/// A source of uniformly distributed floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// `floor(r * n)`, i.e. uniform in `0..n`.
    fn below(&mut self, n: u32) -> u32 {
        ((self.next_f64() * n as f64) as u32).min(n.saturating_sub(1))
    }

    /// Uniform integer in `lo..=hi`. Returns `lo` when the range is inverted.
    fn between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        // Widened: `hi - lo + 1` can exceed both i32 and u32.
        let span = i64::from(hi) - i64::from(lo) + 1;
        let offset = ((self.next_f64() * span as f64) as i64).min(span - 1);
        (i64::from(lo) + offset) as i32
    }

    /// Fair coin.
    fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

/// `Math.random()` from the JS host.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Deterministic 64-bit LCG (Knuth MMIX constants).
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

#[cfg(test)]
impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

#[cfg(test)]
impl RandomSource for Lcg {
    fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        // Top 53 bits → [0, 1)
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of draws, then repeats the last one.
#[cfg(test)]
pub struct Scripted {
    draws: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            pos: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn next_f64(&mut self) -> f64 {
        let v = self
            .draws
            .get(self.pos)
            .or(self.draws.last())
            .copied()
            .unwrap_or(0.0);
        self.pos += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcg_stays_in_unit_interval() {
        let mut rng = Lcg::new(42);
        for _ in 0..10_000 {
            let r = rng.next_f64();
            assert!((0.0..1.0).contains(&r), "out of range: {r}");
        }
    }

    #[test]
    fn lcg_is_deterministic() {
        let mut a = Lcg::new(7);
        let mut b = Lcg::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn between_is_inclusive_on_both_ends() {
        assert_eq!(Scripted::new(&[0.0]).between(9, 22), 9);
        assert_eq!(Scripted::new(&[0.999_999]).between(9, 22), 22);
    }

    #[test]
    fn between_inverted_range_returns_lo() {
        assert_eq!(Scripted::new(&[0.7]).between(5, 5), 5);
        assert_eq!(Scripted::new(&[0.7]).between(5, 1), 5);
    }

    #[test]
    fn below_matches_floor() {
        // floor(0.5 * 7) = 3
        assert_eq!(Scripted::new(&[0.5]).below(7), 3);
        assert_eq!(Scripted::new(&[0.0]).below(7), 0);
        assert_eq!(Scripted::new(&[0.99]).below(7), 6);
    }

    #[test]
    fn between_covers_whole_range() {
        let mut rng = Lcg::new(1);
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[(rng.between(1, 4) - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn between_full_i32_range_does_not_overflow() {
        assert_eq!(Scripted::new(&[0.0]).between(i32::MIN, i32::MAX), i32::MIN);
        assert_eq!(Scripted::new(&[0.999_999_999_9]).between(i32::MIN, i32::MAX), i32::MAX);
        let mut rng = Lcg::new(17);
        for _ in 0..1_000 {
            let v = rng.between(i32::MAX - 3, i32::MAX);
            assert!(v >= i32::MAX - 3);
        }
    }

    #[test]
    fn coin_splits_at_half() {
        assert!(Scripted::new(&[0.49]).coin());
        assert!(!Scripted::new(&[0.5]).coin());
    }
}
