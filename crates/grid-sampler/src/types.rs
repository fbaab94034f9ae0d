//! Core types shared by every grid topology.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Maximum number of coordinate axes a grid can have.
pub const MAX_AXES: usize = 3;

/// A logical grid index, padded to three components.
///
/// Grids with fewer than three axes leave the trailing components at zero.
pub type GridIndex = [usize; 3];

/// A user coordinate, padded to three components.
///
/// Grids with fewer than three axes leave the trailing components at zero.
pub type GridCoord = [f64; 3];

/// An axis-aligned box in user coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl BoundingBox {
    /// Create a new bounding box from its corner coordinates.
    pub fn new(min: GridCoord, max: GridCoord) -> Self {
        Self { min, max }
    }

    /// Check if a point is contained within this box (boundary inclusive).
    pub fn contains(&self, point: &GridCoord) -> bool {
        (0..MAX_AXES).all(|d| point[d] >= self.min[d] && point[d] <= self.max[d])
    }

    /// Check if this box intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        (0..MAX_AXES).all(|d| self.max[d] >= other.min[d] && self.min[d] <= other.max[d])
    }

    /// Extent of the box along one axis.
    pub fn extent(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// Center point of the box.
    pub fn center(&self) -> GridCoord {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }
}

/// Interpolation order applied by coordinate-based sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationOrder {
    /// Nearest neighbor (order 0, preserves exact node values).
    Nearest,
    /// Linear within the containing cell (order 1).
    #[default]
    Linear,
}

impl InterpolationOrder {
    /// Build from a numeric order. Anything above 1 clamps to `Linear`.
    pub fn from_order(order: u32) -> Self {
        match order {
            0 => Self::Nearest,
            _ => Self::Linear,
        }
    }

    /// The numeric order.
    pub fn order(&self) -> u32 {
        match self {
            Self::Nearest => 0,
            Self::Linear => 1,
        }
    }
}

impl std::fmt::Display for InterpolationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

/// Construction descriptor for block-organized grid storage.
///
/// Carries the per-axis extents, block edge lengths, periodicity flags,
/// and the optional missing-value sentinel. Validation is always on:
/// constructors reject malformed shapes instead of deferring to
/// debug-only assertions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridShape {
    /// Per-axis extents (1-3 entries, all non-zero).
    pub dims: Vec<usize>,
    /// Per-axis block edge lengths.
    pub block_size: Vec<usize>,
    /// Per-axis periodicity flags.
    pub periodic: Vec<bool>,
    /// Sentinel marking cells with no valid data.
    pub missing_value: Option<f32>,
}

impl GridShape {
    /// Create a shape with no periodic axes and no missing value.
    pub fn new(dims: Vec<usize>, block_size: Vec<usize>) -> Self {
        let naxes = dims.len();
        Self {
            dims,
            block_size,
            periodic: vec![false; naxes],
            missing_value: None,
        }
    }

    /// Set the per-axis periodicity flags.
    pub fn with_periodic(mut self, periodic: Vec<bool>) -> Self {
        self.periodic = periodic;
        self
    }

    /// Set the missing-value sentinel.
    pub fn with_missing_value(mut self, missing_value: f32) -> Self {
        self.missing_value = Some(missing_value);
        self
    }

    /// Number of coordinate axes.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of grid points.
    pub fn total_points(&self) -> usize {
        self.dims.iter().product()
    }

    /// Validate the shape vectors against each other.
    pub fn validate(&self) -> Result<()> {
        let naxes = self.dims.len();
        if naxes == 0 || naxes > MAX_AXES {
            return Err(GridError::DimensionCount(naxes));
        }
        for (axis, &n) in self.dims.iter().enumerate() {
            if n == 0 {
                return Err(GridError::ZeroExtent { axis });
            }
        }
        if self.block_size.len() != naxes {
            return Err(GridError::vector_length(
                "block size",
                naxes,
                self.block_size.len(),
            ));
        }
        for (axis, &b) in self.block_size.iter().enumerate() {
            if b == 0 {
                return Err(GridError::ZeroExtent { axis });
            }
        }
        if self.periodic.len() != naxes {
            return Err(GridError::vector_length(
                "periodicity",
                naxes,
                self.periodic.len(),
            ));
        }
        Ok(())
    }
}
