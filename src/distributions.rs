//! Probability distributions.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Binomial`] | n, p | np | np(1−p) |
//!
//! # Summation order
//!
//! Cumulative queries add point masses one by one in a fixed order: the
//! upper tails (`P(X > k)`, `P(X ≥ k)`) run from `n` downwards, the lower
//! tails (`P(X < k)`, `P(X ≤ k)`) from `0` upwards. Results are therefore
//! reproducible to the last bit across calls and platforms with the same
//! `pow` implementation.

use std::fmt;

use once_cell::sync::OnceCell;
use rand::Rng;

use crate::combinatorics;
use crate::error::{Error, Result};
use crate::random::BinomialSampler;

// ============================================================================
// Binomial Distribution
// ============================================================================

/// Binomial distribution `B(n, p)`: number of successes in `n` independent
/// Bernoulli trials with success probability `p`.
///
/// # Mathematical Definition
/// - PMF: P(X = k) = C(n, k) · pᵏ · (1−p)ⁿ⁻ᵏ
/// - Mean: np
/// - Variance: np(1−p)
///
/// Parameters are fixed at construction. The mean, variance and standard
/// deviation are computed on first access and kept for the lifetime of
/// the instance.
///
/// # Examples
/// ```
/// use u_numkit::distributions::Binomial;
/// let x = Binomial::new(20, 0.45).unwrap();
/// assert_eq!(x.to_string(), "B(20, 0.45)");
/// assert!((x.expected() - 9.0).abs() < 1e-12);
/// assert!((x.mass_at(8).unwrap() - 0.16230037134255265).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct Binomial {
    trials: u64,
    p: f64,
    expected: OnceCell<f64>,
    variance: OnceCell<f64>,
    sigma: OnceCell<f64>,
}

impl Binomial {
    /// Creates a new binomial distribution with `trials` trials and success
    /// probability `p`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `p` is not finite or lies
    /// outside `[0, 1]`.
    pub fn new(trials: u64, p: f64) -> Result<Self> {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidArgument(format!(
                "Binomial requires p in [0, 1], got p={p}"
            )));
        }
        Ok(Self {
            trials,
            p,
            expected: OnceCell::new(),
            variance: OnceCell::new(),
            sigma: OnceCell::new(),
        })
    }

    /// Number of trials `n`.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Success probability `p` of a single trial.
    pub fn success_probability(&self) -> f64 {
        self.p
    }

    /// E(X) = np
    pub fn expected(&self) -> f64 {
        *self.expected.get_or_init(|| self.trials as f64 * self.p)
    }

    /// V(X) = np(1−p)
    pub fn variance(&self) -> f64 {
        *self
            .variance
            .get_or_init(|| self.expected() * (1.0 - self.p))
    }

    /// σ(X) = √(np(1−p))
    pub fn sigma(&self) -> f64 {
        *self.sigma.get_or_init(|| self.variance().sqrt())
    }

    /// P(X = k) = C(n, k) · pᵏ · (1−p)ⁿ⁻ᵏ
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `k > n`.
    pub fn mass_at(&self, k: u64) -> Result<f64> {
        if k > self.trials {
            return Err(Error::InvalidArgument(format!(
                "mass_at requires k <= n, got k={k}, n={}",
                self.trials
            )));
        }
        let coef = combinatorics::coefficient(self.trials, k)?;
        if coef.is_finite() {
            return Ok(
                coef * self.p.powf(k as f64) * (1.0 - self.p).powf((self.trials - k) as f64)
            );
        }

        // C(n, k) overflowed f64: only reachable for 0 < p < 1 masses with a
        // huge n, evaluate in log space instead.
        let kf = k as f64;
        let rest = (self.trials - k) as f64;
        let ln_mass = combinatorics::ln_choose(self.trials, k)?
            + kf * self.p.ln()
            + rest * (1.0 - self.p).ln();
        Ok(ln_mass.exp())
    }

    /// P(X > k), summed from `n` down to `k + 1`.
    ///
    /// Returns `0.0` when `k >= n`.
    pub fn probability_greater_than(&self, k: u64) -> f64 {
        match k.checked_add(1) {
            Some(lo) => self.sum_descending(lo),
            None => 0.0,
        }
    }

    /// P(X ≥ k), summed from `n` down to `k`.
    ///
    /// Returns `0.0` when `k > n`.
    pub fn probability_greater_or_equal(&self, k: u64) -> f64 {
        self.sum_descending(k)
    }

    /// P(X < k), summed from `0` up to `k − 1`.
    ///
    /// Returns `0.0` for `k = 0`; every `k > n` yields the full mass.
    pub fn probability_less_than(&self, k: u64) -> f64 {
        match k.checked_sub(1) {
            Some(hi) => self.sum_ascending(hi),
            None => 0.0,
        }
    }

    /// P(X ≤ k), summed from `0` up to `k`.
    pub fn probability_less_or_equal(&self, k: u64) -> f64 {
        self.sum_ascending(k)
    }

    /// Point masses `P(X = 0), …, P(X = n)`.
    pub fn pmf(&self) -> Vec<f64> {
        (0..=self.trials).map(|i| self.mass_unchecked(i)).collect()
    }

    /// Bar-chart input: `(x, P(X = x))` for `x` in `0..n`.
    ///
    /// The last outcome `x = n` is not part of the series.
    ///
    /// # Examples
    /// ```
    /// use u_numkit::distributions::Binomial;
    /// let series = Binomial::new(4, 0.5).unwrap().bar_series();
    /// assert_eq!(series.len(), 4);
    /// assert_eq!(series[0].0, 0);
    /// assert!((series[2].1 - 0.375).abs() < 1e-15);
    /// ```
    pub fn bar_series(&self) -> Vec<(u64, f64)> {
        (0..self.trials)
            .map(|x| (x, self.mass_unchecked(x)))
            .collect()
    }

    /// Draws one outcome.
    ///
    /// Builds a [`BinomialSampler`] on every call; keep a sampler around
    /// when drawing repeatedly.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        BinomialSampler::new(self).sample(rng)
    }

    fn sum_descending(&self, lo: u64) -> f64 {
        if lo > self.trials {
            return 0.0;
        }
        let mut total = 0.0;
        for i in (lo..=self.trials).rev() {
            total += self.mass_unchecked(i);
        }
        total
    }

    fn sum_ascending(&self, hi: u64) -> f64 {
        let hi = hi.min(self.trials);
        let mut total = 0.0;
        for i in 0..=hi {
            total += self.mass_unchecked(i);
        }
        total
    }

    /// Caller guarantees `k <= n`.
    pub(crate) fn mass_unchecked(&self, k: u64) -> f64 {
        self.mass_at(k).unwrap_or(0.0)
    }
}

impl PartialEq for Binomial {
    fn eq(&self, other: &Self) -> bool {
        self.trials == other.trials && self.p == other.p
    }
}

impl fmt::Display for Binomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B({}, {:?})", self.trials, self.p)
    }
}

// ============================================================================
// Tests
// ============================================================================
