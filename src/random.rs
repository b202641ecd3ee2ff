//! Random number generation and binomial sampling.
//!
//! # Reproducibility
//!
//! For reproducible draws, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;

use crate::distributions::Binomial;

/// Creates a fast, seeded random number generator.
///
/// # Examples
/// ```
/// use u_numkit::random::create_rng;
/// use rand::Rng;
/// let mut rng = create_rng(42);
/// let x: f64 = rng.random();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Pre-computed inverse-CDF sampler for a [`Binomial`] distribution.
///
/// Stores the running sums `P(X ≤ 0), …, P(X ≤ n)`, accumulated in the
/// same ascending order as [`Binomial::probability_less_or_equal`], and
/// maps a uniform variate to an outcome by binary search.
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
///
/// # Examples
/// ```
/// use u_numkit::distributions::Binomial;
/// use u_numkit::random::{create_rng, BinomialSampler};
/// let b = Binomial::new(20, 0.45).unwrap();
/// let sampler = BinomialSampler::new(&b);
/// let mut rng = create_rng(42);
/// assert!(sampler.sample(&mut rng) <= 20);
/// ```
#[derive(Debug, Clone)]
pub struct BinomialSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl BinomialSampler {
    pub fn new(distribution: &Binomial) -> Self {
        let mut cumulative = Vec::with_capacity(distribution.trials() as usize + 1);
        let mut total = 0.0;
        for k in 0..=distribution.trials() {
            total += distribution.mass_unchecked(k);
            cumulative.push(total);
        }
        Self { cumulative, total }
    }

    /// Draws one outcome in `0..=n`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        let last = self.cumulative.len() - 1;
        if self.total <= 0.0 || !self.total.is_finite() {
            return last as u64;
        }
        let threshold = rng.random_range(0.0..self.total);
        // First index whose running sum exceeds the threshold.
        let idx = self.cumulative.partition_point(|&c| c <= threshold);
        idx.min(last) as u64
    }

    /// Number of outcomes, `n + 1`.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Always false: a binomial has at least the outcome `0`.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Total mass in the table; `1` up to rounding.
    pub fn total_mass(&self) -> f64 {
        self.total
    }
}

// ============================================================================
// Tests
// ============================================================================
