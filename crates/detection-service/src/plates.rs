//! Simulated license-plate pool.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Fixed candidate list of simulated plate strings, drawn uniformly per
/// vehicle detection. The pool is deliberately small so repeated detections
/// collide on the same plate and exercise duplicate suppression downstream.
pub struct PlatePool {
    plates: Vec<String>,
    rng: Mutex<StdRng>,
}

impl PlatePool {
    /// Build a pool from an explicit candidate list and a fixed seed.
    pub fn new(plates: Vec<String>, seed: u64) -> Self {
        Self::with_rng(plates, StdRng::seed_from_u64(seed))
    }

    /// Five candidates in the `MH-12-AB-1000..=1005` range, generated once
    /// from process randomness.
    pub fn simulated() -> Self {
        let mut rng = StdRng::from_entropy();
        let plates = (0..5)
            .map(|_| format!("MH-12-AB-{}", rng.gen_range(1000..=1005)))
            .collect();
        Self::with_rng(plates, rng)
    }

    fn with_rng(plates: Vec<String>, rng: StdRng) -> Self {
        assert!(!plates.is_empty(), "plate pool must not be empty");
        Self {
            plates,
            rng: Mutex::new(rng),
        }
    }

    /// Draw one candidate uniformly.
    pub fn draw(&self) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let idx = rng.gen_range(0..self.plates.len());
        self.plates[idx].clone()
    }

    pub fn plates(&self) -> &[String] {
        &self.plates
    }
}
