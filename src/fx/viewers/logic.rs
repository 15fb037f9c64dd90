//! Bounded random walk behind the "viewers online" number.

use crate::config::ViewerConfig;
use crate::rng::RandomSource;

/// A value pinned to `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl CounterState {
    pub fn new(value: i32, min: i32, max: i32) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    /// Add `delta` and clamp. Returns the new value.
    pub fn apply(&mut self, delta: i64) -> i32 {
        let next = (i64::from(self.value) + delta).clamp(i64::from(self.min), i64::from(self.max));
        self.value = next as i32;
        self.value
    }
}

pub struct ViewerCounter<R> {
    pub state: CounterState,
    config: ViewerConfig,
    rng: R,
}

impl<R: RandomSource> ViewerCounter<R> {
    /// Seed in `seed_base..seed_base + seed_spread`.
    pub fn new(config: ViewerConfig, mut rng: R) -> Self {
        let offset = rng.below(config.seed_spread.max(1) as u32);
        let seed = (i64::from(config.seed_base) + i64::from(offset))
            .clamp(i64::from(config.min), i64::from(config.max)) as i32;
        Self {
            state: CounterState::new(seed, config.min, config.max),
            config,
            rng,
        }
    }

    pub fn value(&self) -> i32 {
        self.state.value
    }

    /// Signed step for the current value, before clamping. Computed in
    /// i64 so no i32 `step` or nudge can overflow.
    fn delta(&mut self) -> i64 {
        let c = &self.config;
        let value = self.state.value;
        let step = i64::from(c.step.max(0));
        // 2 * i32::MAX + 1 still fits in u32.
        let mut delta = i64::from(self.rng.below((2 * step + 1) as u32)) - step;
        if value < c.low_water {
            delta += i64::from(self.rng.between(1, c.nudge_up_max));
        }
        if value > c.high_water {
            delta -= i64::from(self.rng.between(1, c.nudge_down_max));
        }
        delta
    }

    /// One walk step. Returns the value to render.
    pub fn tick(&mut self) -> i32 {
        let delta = self.delta();
        self.state.apply(delta)
    }

    pub fn next_delay(&mut self) -> u32 {
        self.config.delay.sample(&mut self.rng)
    }
}
