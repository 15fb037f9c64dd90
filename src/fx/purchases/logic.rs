//! "Recent purchases" counter: a random walk that never leaves its range and
//! slows down after the first few updates.

use crate::config::PurchaseConfig;
use crate::rng::RandomSource;
use crate::schedule::DelayRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseState {
    pub value: i32,
    pub min: i32,
    pub max: i32,
    /// Monotonic. Selects the delay phase.
    pub updates_so_far: u32,
}

impl PurchaseState {
    /// Direction for a step of `magnitude`. Forced when one side would
    /// leave the range, otherwise `coin` decides (true = add).
    pub fn direction(&self, magnitude: i32, coin: bool) -> Direction {
        let (value, magnitude) = (i64::from(self.value), i64::from(magnitude));
        if value + magnitude > i64::from(self.max) {
            Direction::Subtract
        } else if value - magnitude < i64::from(self.min) {
            Direction::Add
        } else if coin {
            Direction::Add
        } else {
            Direction::Subtract
        }
    }

    pub fn apply(&mut self, magnitude: i32, direction: Direction) -> i32 {
        match direction {
            Direction::Add => self.value = self.value.saturating_add(magnitude),
            Direction::Subtract => self.value = self.value.saturating_sub(magnitude),
        }
        self.updates_so_far = self.updates_so_far.saturating_add(1);
        self.value
    }
}

/// Result of one update, for the DOM layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    pub value: i32,
    pub next_delay_ms: u32,
}

pub struct PurchaseCounter<R> {
    pub state: PurchaseState,
    config: PurchaseConfig,
    rng: R,
}

impl<R: RandomSource> PurchaseCounter<R> {
    pub fn new(config: PurchaseConfig, mut rng: R) -> Self {
        let value = rng.between(config.min, config.max);
        Self {
            state: PurchaseState {
                value,
                min: config.min,
                max: config.max,
                updates_so_far: 0,
            },
            config,
            rng,
        }
    }

    pub fn value(&self) -> i32 {
        self.state.value
    }

    /// Delay window for the next update given how many have happened.
    pub fn delay_phase(&self) -> DelayRange {
        if self.state.updates_so_far < self.config.fast_updates {
            self.config.fast_delay
        } else {
            self.config.normal_delay
        }
    }

    pub fn tick(&mut self) -> Update {
        let magnitude = self
            .rng
            .between(self.config.min_change, self.config.max_change);
        let coin = self.rng.coin();
        let direction = self.state.direction(magnitude, coin);
        let value = self.state.apply(magnitude, direction);
        let next_delay_ms = self.delay_phase().sample(&mut self.rng);
        Update {
            value,
            next_delay_ms,
        }
    }
}
