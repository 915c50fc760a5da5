//! Injectable randomness
//!
//! Gap heights, pickup spawns and rarity rolls all go through
//! [`RandomSource`], so tests can pin exact outcomes.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform source in `[0, 1)`
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Uniform value in `[min, max)`; returns `min` for an empty range
    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_f32()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

/// PCG-backed source. Unseeded by default: each session draws fresh entropy.
#[derive(Debug, Clone)]
pub struct PcgRandom(Pcg32);

impl PcgRandom {
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random::<u64>())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

impl Default for PcgRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for PcgRandom {
    fn next_f32(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        // Keep the [0, 1) contract even for sloppy scripts
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
