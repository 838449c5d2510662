//! Error type shared by every generator and container in the crate.

use thiserror::Error;

/// Errors raised when a caller hands the generators invalid input.
///
/// All of these are synchronous validation failures; nothing is retried and
/// no partially generated output is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldgenError {
    #[error("invalid size {size}: dimensions must be at least 1")]
    InvalidSize { size: usize },

    #[error("coordinate ({x}, {y}) is outside a grid of size {size}")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("diamond-square needs a size of 2^k + 1, got {size}")]
    InvalidGeometry { size: usize },

    #[error("invalid normalization range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("lattice steps must be finite and positive, got ({step_x}, {step_y})")]
    InvalidStep { step_x: f64, step_y: f64 },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("plates have not been generated yet")]
    NotGenerated,
}

pub type Result<T> = std::result::Result<T, WorldgenError>;
