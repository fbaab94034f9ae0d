//! Axis-aligned grid with monotone but irregular per-axis spacing.

use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::{tensor_stencil, AxisBracket, CellStencil, Grid, GridCore, Topology};
use crate::math::{periodic, search};
use crate::types::{BoundingBox, GridCoord, GridIndex, GridShape, InterpolationOrder};

/// A stretched grid: separable axes with externally supplied, monotone
/// non-decreasing coordinate arrays.
///
/// Point location binary-searches each axis independently for the
/// bracketing node pair; a coordinate outside any single axis declares
/// the whole point outside the grid.
pub struct StretchedGrid<'a> {
    core: GridCore<'a>,
    axes: Vec<&'a [f64]>,
}

impl<'a> StretchedGrid<'a> {
    /// Construct from a shape, borrowed block buffers, and one borrowed
    /// coordinate array per axis.
    pub fn new(
        shape: GridShape,
        blocks: Vec<&'a mut [f32]>,
        axes: Vec<&'a [f64]>,
    ) -> Result<Self> {
        let core = GridCore::new(&shape, blocks)?;
        let ndim = core.ndim();
        if axes.len() != ndim {
            return Err(GridError::vector_length("axis coordinates", ndim, axes.len()));
        }
        for (axis, coords) in axes.iter().enumerate() {
            let expected = core.dims()[axis];
            if coords.len() != expected {
                return Err(GridError::CoordinateLength {
                    axis,
                    expected,
                    actual: coords.len(),
                });
            }
            if coords.windows(2).any(|w| w[1] < w[0]) {
                return Err(GridError::UnsortedAxis { axis });
            }
        }

        debug!(dims = ?core.dims(), "constructed stretched grid");
        Ok(Self { core, axes })
    }

    /// The coordinate array of one axis.
    pub fn axis_coords(&self, axis: usize) -> &[f64] {
        self.axes[axis]
    }

    fn axis_min(&self, axis: usize) -> f64 {
        if axis < self.axes.len() {
            self.axes[axis][0]
        } else {
            0.0
        }
    }

    fn axis_max(&self, axis: usize) -> f64 {
        if axis < self.axes.len() {
            *self.axes[axis].last().unwrap()
        } else {
            0.0
        }
    }
}

impl Grid for StretchedGrid<'_> {
    fn core(&self) -> &GridCore<'_> {
        &self.core
    }

    fn topology(&self) -> Topology {
        Topology::Stretched
    }

    fn set_value(&mut self, index: &[usize], value: f32) {
        self.core.set_at(index, value);
    }

    fn set_interpolation_order(&mut self, order: InterpolationOrder) {
        self.core.set_interpolation_order(order);
    }

    fn bounding_box(&self) -> BoundingBox {
        let mut min = [0f64; 3];
        let mut max = [0f64; 3];
        for d in 0..self.axes.len() {
            min[d] = self.axis_min(d);
            max[d] = self.axis_max(d);
        }
        BoundingBox::new(min, max)
    }

    fn user_coordinates(&self, index: &[usize]) -> Option<GridCoord> {
        let padded = super::pad_index(index, self.core.ndim())?;
        if !self.core.layout().contains(&padded) {
            return None;
        }
        let mut coords = [0f64; 3];
        for (d, axis) in self.axes.iter().enumerate() {
            coords[d] = axis[padded[d]];
        }
        Some(coords)
    }

    fn fold_coords(&self, coords: &mut GridCoord) {
        for d in 0..self.axes.len() {
            if self.core.periodic_axis(d) {
                coords[d] = periodic::fold(coords[d], self.axis_min(d), self.axis_max(d));
            }
        }
    }

    fn nearest_index(&self, coords: &GridCoord) -> Option<GridIndex> {
        let mut index = [0usize; 3];
        for (d, axis) in self.axes.iter().enumerate() {
            let (i, w) = search::bracket(axis, coords[d])?;
            index[d] = if w > 0.5 { i + 1 } else { i };
        }
        Some(index)
    }

    fn locate_cell(&self, coords: &GridCoord) -> Option<CellStencil> {
        let mut brackets = [AxisBracket::pinned(0); 3];
        for (d, axis) in self.axes.iter().enumerate() {
            let (i, w) = search::bracket(axis, coords[d])?;
            brackets[d] = if axis.len() == 1 {
                AxisBracket::pinned(0)
            } else {
                AxisBracket {
                    lo: i,
                    hi: i + 1,
                    frac: w,
                }
            };
        }
        Some(tensor_stencil(&brackets))
    }

    fn enclosing_region(&self, bbox: &BoundingBox) -> Option<(GridIndex, GridIndex)> {
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        for (d, axis) in self.axes.iter().enumerate() {
            let n = axis.len();
            if bbox.max[d] < axis[0] || bbox.min[d] > axis[n - 1] {
                return None;
            }
            lo[d] = match search::bracket(axis, bbox.min[d]) {
                Some((i, _)) => i,
                None => 0,
            };
            hi[d] = match search::bracket(axis, bbox.max[d]) {
                Some((i, w)) => {
                    if w > 0.0 {
                        (i + 1).min(n - 1)
                    } else {
                        i
                    }
                }
                None => n - 1,
            };
        }
        Some((lo, hi))
    }
}
