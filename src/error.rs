//! Error type shared by every module of the crate.
//!
//! All precondition violations are reported as values; nothing in the
//! library panics on caller input.

use thiserror::Error;

use crate::matrix::Shape;

/// Crate-wide error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An argument is outside the domain of the operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operand shapes are incompatible for the requested operation.
    #[error("shape mismatch in {op}: left {left}, right {right}")]
    ShapeMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    /// A 1-based element index falls outside the matrix.
    #[error("index (i={i}, j={j}) out of range for shape {shape}")]
    IndexOutOfRange { i: usize, j: usize, shape: Shape },

    /// The receiver is not in a state the operation accepts.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// An exact integer result does not fit the return type.
    #[error("overflow: {0}")]
    Overflow(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
