//! Injectable randomness
//!
//! Every probabilistic decision in SensorWatch (simulated failures, anomaly
//! injection, signal noise) draws from an [`Entropy`] implementation handed
//! in by the caller. Production code uses [`SeededEntropy`]; tests pin the
//! outcome with a fixed seed, a [`ConstantEntropy`] or a [`ScriptedEntropy`]
//! so both sides of every branch can be exercised.
//!
//! Implementors only provide [`Entropy::next_f64`]; everything else is
//! derived from it.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed values in `[0, 1)`
pub trait Entropy {
    /// Next uniform sample in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Returns true with probability `rate`
    ///
    /// Rates at or below 0 never fire and rates at or above 1 always fire,
    /// without consuming a sample.
    fn chance(&mut self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        self.next_f64() < rate
    }

    /// Uniform sample in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Normally distributed sample (Box-Muller)
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z
    }

    /// Uniformly chosen index into a collection of `len` items
    ///
    /// Returns 0 for an empty collection.
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}

/// ChaCha-backed generator, reproducible when seeded
pub struct SeededEntropy {
    rng: ChaCha8Rng,
}

impl SeededEntropy {
    /// Deterministic generator for reproducible runs
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system
    pub fn from_os() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, OS-seeded otherwise
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_os(),
        }
    }
}

impl Default for SeededEntropy {
    fn default() -> Self {
        Self::from_os()
    }
}

impl Entropy for SeededEntropy {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

impl std::fmt::Debug for SeededEntropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededEntropy")
            .field("rng", &"<ChaCha8Rng>")
            .finish()
    }
}

/// Always returns the same sample
///
/// `ConstantEntropy(0.0)` makes every `chance` fire, `ConstantEntropy(0.999)`
/// makes every realistic `chance` miss.
#[derive(Debug, Clone, Copy)]
pub struct ConstantEntropy(pub f64);

impl Entropy for ConstantEntropy {
    fn next_f64(&mut self) -> f64 {
        self.0.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Replays a fixed sequence of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedEntropy {
    samples: Vec<f64>,
    position: usize,
}

impl ScriptedEntropy {
    /// Create from a sequence of samples in `[0, 1)`
    ///
    /// An empty script behaves like `ConstantEntropy(0.0)`.
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Number of samples drawn so far
    pub fn drawn(&self) -> usize {
        self.position
    }
}

impl Entropy for ScriptedEntropy {
    fn next_f64(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.position % self.samples.len()];
        self.position += 1;
        sample.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_deterministic() {
        let mut a = SeededEntropy::from_seed(42);
        let mut b = SeededEntropy::from_seed(42);

        for _ in 0..10 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn chance_extremes_never_sample() {
        let mut script = ScriptedEntropy::new(vec![0.5]);
        for _ in 0..100 {
            assert!(!script.chance(0.0));
            assert!(script.chance(1.0));
        }
        assert_eq!(script.drawn(), 0);
    }

    #[test]
    fn chance_probability() {
        let mut entropy = SeededEntropy::from_seed(7);
        let samples = 10_000;
        let hits = (0..samples).filter(|_| entropy.chance(0.3)).count();

        // Expect ~3000, allow 10% deviation
        assert!(hits > 2700 && hits < 3300, "got {} hits", hits);
    }

    #[test]
    fn uniform_within_bounds() {
        let mut entropy = SeededEntropy::from_seed(1);
        for _ in 0..1000 {
            let v = entropy.uniform(15.0, 35.0);
            assert!((15.0..35.0).contains(&v));
        }
    }

    #[test]
    fn gaussian_centres_on_mean() {
        let mut entropy = SeededEntropy::from_seed(3);
        let n = 5000;
        let total: f64 = (0..n).map(|_| entropy.gaussian(10.0, 2.0)).sum();
        let avg = total / n as f64;
        assert!((avg - 10.0).abs() < 0.2, "mean was {}", avg);
    }

    #[test]
    fn zero_std_gaussian_is_mean() {
        let mut entropy = ConstantEntropy(0.25);
        assert_eq!(entropy.gaussian(5.0, 0.0), 5.0);
    }

    #[test]
    fn pick_index_in_range() {
        assert_eq!(ConstantEntropy(0.999).pick_index(5), 4);
        assert_eq!(ConstantEntropy(0.0).pick_index(5), 0);
        assert_eq!(ConstantEntropy(0.5).pick_index(0), 0);
    }

    #[test]
    fn scripted_cycles() {
        let mut script = ScriptedEntropy::new(vec![0.1, 0.9]);
        assert_eq!(script.next_f64(), 0.1);
        assert_eq!(script.next_f64(), 0.9);
        assert_eq!(script.next_f64(), 0.1);
        assert_eq!(script.drawn(), 3);
    }
}
