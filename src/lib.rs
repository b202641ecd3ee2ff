//! # u-numkit
//!
//! Small numeric building blocks: a binomial distribution model and a
//! dense matrix value type.
//!
//! ## Modules
//!
//! - [`combinatorics`] — Memoized factorials and binomial coefficients
//! - [`distributions`] — Binomial distribution: masses, tails, moments
//! - [`matrix`] — Immutable dense matrix with shape-checked algebra
//! - [`random`] — Seeded RNG and binomial sampling
//! - [`error`] — Crate-wide error type
//!
//! ## Design Philosophy
//!
//! - **Errors are values**: every precondition violation is an [`Error`],
//!   never a panic
//! - **Immutable values**: operations return new instances
//! - **Reproducible sums**: cumulative probabilities are accumulated in a
//!   fixed order
//! - **Property-based testing**: mathematical invariants verified via proptest

pub mod combinatorics;
pub mod distributions;
pub mod error;
pub mod matrix;
pub mod random;

pub use distributions::Binomial;
pub use error::{Error, Result};
pub use matrix::{Matrix, MatrixIndex, Shape};
