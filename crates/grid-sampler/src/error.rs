//! Error types for grid construction.
//!
//! Per-query conditions (a coordinate outside the grid, a dataless grid)
//! are never errors; they are reported through the missing-value sentinel
//! or `Option`/`bool` results so hot-path sampling stays branch-light.
//! Only construction-time contract violations surface here.

use thiserror::Error;

/// Errors raised while validating grid construction inputs.
#[derive(Error, Debug)]
pub enum GridError {
    /// The dimension vector has an unsupported number of axes.
    #[error("dimension vector must have 1-3 entries, got {0}")]
    DimensionCount(usize),

    /// An axis was declared with zero extent.
    #[error("axis {axis} has zero extent")]
    ZeroExtent { axis: usize },

    /// A per-axis vector does not match the axis count.
    #[error("{name} has length {actual}, expected {expected}")]
    VectorLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The supplied block count does not match the block-grid product.
    #[error("expected {expected} blocks, got {actual}")]
    BlockCount { expected: usize, actual: usize },

    /// A block buffer has the wrong length.
    #[error("block {block} has length {actual}, expected {expected}")]
    BlockLength {
        block: usize,
        expected: usize,
        actual: usize,
    },

    /// A per-axis coordinate array does not cover the axis.
    #[error("coordinate array for axis {axis} has length {actual}, expected {expected}")]
    CoordinateLength {
        axis: usize,
        expected: usize,
        actual: usize,
    },

    /// A coordinate array is not monotone non-decreasing.
    #[error("coordinates on axis {axis} are not monotone non-decreasing")]
    UnsortedAxis { axis: usize },

    /// Axis extents are inverted (max below min).
    #[error("extents on axis {axis} are inverted: max {max} < min {min}")]
    InvertedExtents { axis: usize, min: f64, max: f64 },

    /// The topology cannot be built with the given number of axes.
    #[error("a {topology} grid requires {expected} axes, got {actual}")]
    AxisCount {
        topology: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// A mesh adjacency table is malformed.
    #[error("adjacency table error: {0}")]
    Adjacency(String),

    /// Periodic boundaries were requested on a topology/axis that cannot
    /// support them.
    #[error("periodic boundaries are not supported on axis {axis} of a {topology} grid")]
    UnsupportedPeriodicity { topology: &'static str, axis: usize },
}

impl GridError {
    /// Create a `VectorLength` error.
    pub fn vector_length(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::VectorLength {
            name,
            expected,
            actual,
        }
    }

    /// Create an `Adjacency` error.
    pub fn adjacency(msg: impl Into<String>) -> Self {
        Self::Adjacency(msg.into())
    }
}

/// Result type for grid construction.
pub type Result<T> = std::result::Result<T, GridError>;
