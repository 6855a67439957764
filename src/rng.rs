//! Seeded random source shared by thermal kicks and preset scatter.

use std::f64::consts::TAU;

use bevy::math::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reproducible random source for one simulation run.
#[derive(Clone, Debug)]
pub struct SimRng {
    seed: u64,
    inner: StdRng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the original seed.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Uniform value in `[low, high)`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// Unit vector with uniformly distributed direction.
    pub fn unit_vector(&mut self) -> DVec2 {
        let angle = self.inner.gen_range(0.0..TAU);
        DVec2::new(angle.cos(), angle.sin())
    }

    /// Uniform point inside an axis-aligned box.
    pub fn point_in(&mut self, min: DVec2, max: DVec2) -> DVec2 {
        DVec2::new(self.range(min.x, max.x), self.range(min.y, max.y))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::new(0)
    }
}
