//! Axis-aligned grid with affine index/coordinate mapping.

use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::{tensor_stencil, AxisBracket, CellStencil, Grid, GridCore, Topology};
use crate::math::periodic;
use crate::types::{BoundingBox, GridCoord, GridIndex, GridShape, InterpolationOrder, MAX_AXES};

/// A regular (uniformly spaced, axis-aligned) grid.
///
/// Index and coordinate are related by an affine map from the per-axis
/// extents, so point location is O(1) arithmetic. On a periodic axis the
/// declared maximum is the wrap point: node spacing is `span / dims` and
/// the last cell interpolates across the seam back to node zero.
pub struct RegularGrid<'a> {
    core: GridCore<'a>,
    min: GridCoord,
    max: GridCoord,
}

impl<'a> RegularGrid<'a> {
    /// Construct from a shape, borrowed block buffers, and per-axis
    /// minimum/maximum extents.
    pub fn new(
        shape: GridShape,
        blocks: Vec<&'a mut [f32]>,
        min: &[f64],
        max: &[f64],
    ) -> Result<Self> {
        let core = GridCore::new(&shape, blocks)?;
        let ndim = core.ndim();
        if min.len() != ndim {
            return Err(GridError::vector_length("minimum extents", ndim, min.len()));
        }
        if max.len() != ndim {
            return Err(GridError::vector_length("maximum extents", ndim, max.len()));
        }
        let mut lo = [0f64; 3];
        let mut hi = [0f64; 3];
        for axis in 0..ndim {
            if max[axis] < min[axis] {
                return Err(GridError::InvertedExtents {
                    axis,
                    min: min[axis],
                    max: max[axis],
                });
            }
            lo[axis] = min[axis];
            hi[axis] = max[axis];
        }

        debug!(dims = ?core.dims(), "constructed regular grid");
        Ok(Self { core, min: lo, max: hi })
    }

    /// Node spacing along one (padded) axis.
    pub fn spacing(&self, axis: usize) -> f64 {
        let n = self.core.layout().dims_padded()[axis];
        let span = self.max[axis] - self.min[axis];
        if self.core.periodic_axis(axis) {
            span / n as f64
        } else if n > 1 {
            span / (n - 1) as f64
        } else {
            0.0
        }
    }

    fn axis_bracket(&self, axis: usize, x: f64) -> Option<AxisBracket> {
        let n = self.core.layout().dims_padded()[axis];
        let min = self.min[axis];
        let max = self.max[axis];
        if n == 1 {
            return (x >= min && x <= max).then(|| AxisBracket::pinned(0));
        }
        let spacing = self.spacing(axis);
        if spacing <= 0.0 {
            return (x >= min && x <= max).then(|| AxisBracket::pinned(0));
        }
        let t = (x - min) / spacing;
        if self.core.periodic_axis(axis) {
            let cell = t.floor();
            let lo = (cell as i64).rem_euclid(n as i64) as usize;
            return Some(AxisBracket {
                lo,
                hi: (lo + 1) % n,
                frac: t - cell,
            });
        }
        if x < min || x > max {
            return None;
        }
        let lo = (t.floor() as usize).min(n - 2);
        Some(AxisBracket {
            lo,
            hi: lo + 1,
            frac: (t - lo as f64).clamp(0.0, 1.0),
        })
    }
}

impl Grid for RegularGrid<'_> {
    fn core(&self) -> &GridCore<'_> {
        &self.core
    }

    fn topology(&self) -> Topology {
        Topology::Regular
    }

    fn set_value(&mut self, index: &[usize], value: f32) {
        self.core.set_at(index, value);
    }

    fn set_interpolation_order(&mut self, order: InterpolationOrder) {
        self.core.set_interpolation_order(order);
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }

    fn user_coordinates(&self, index: &[usize]) -> Option<GridCoord> {
        let padded = super::pad_index(index, self.core.ndim())?;
        if !self.core.layout().contains(&padded) {
            return None;
        }
        let mut coords = [0f64; 3];
        for d in 0..MAX_AXES {
            coords[d] = self.min[d] + padded[d] as f64 * self.spacing(d);
        }
        Some(coords)
    }

    fn fold_coords(&self, coords: &mut GridCoord) {
        for d in 0..MAX_AXES {
            if self.core.periodic_axis(d) {
                coords[d] = periodic::fold(coords[d], self.min[d], self.max[d]);
            }
        }
    }

    fn nearest_index(&self, coords: &GridCoord) -> Option<GridIndex> {
        let mut index = [0usize; 3];
        for d in 0..MAX_AXES {
            let n = self.core.layout().dims_padded()[d];
            let spacing = self.spacing(d);
            if n == 1 || spacing <= 0.0 {
                if coords[d] < self.min[d] || coords[d] > self.max[d] {
                    return None;
                }
                continue;
            }
            let t = (coords[d] - self.min[d]) / spacing;
            if self.core.periodic_axis(d) {
                index[d] = (t.round() as i64).rem_euclid(n as i64) as usize;
            } else {
                if coords[d] < self.min[d] || coords[d] > self.max[d] {
                    return None;
                }
                index[d] = (t.round().max(0.0) as usize).min(n - 1);
            }
        }
        Some(index)
    }

    fn locate_cell(&self, coords: &GridCoord) -> Option<CellStencil> {
        let mut brackets = [AxisBracket::pinned(0); 3];
        for d in 0..MAX_AXES {
            brackets[d] = self.axis_bracket(d, coords[d])?;
        }
        Some(tensor_stencil(&brackets))
    }

    fn enclosing_region(&self, bbox: &BoundingBox) -> Option<(GridIndex, GridIndex)> {
        let mut lo = [0usize; 3];
        let mut hi = [0usize; 3];
        for d in 0..MAX_AXES {
            let n = self.core.layout().dims_padded()[d];
            if bbox.max[d] < self.min[d] || bbox.min[d] > self.max[d] {
                return None;
            }
            let spacing = self.spacing(d);
            if spacing <= 0.0 {
                hi[d] = n - 1;
                continue;
            }
            let t_lo = (bbox.min[d] - self.min[d]) / spacing;
            let t_hi = (bbox.max[d] - self.min[d]) / spacing;
            lo[d] = (t_lo.floor().max(0.0) as usize).min(n - 1);
            hi[d] = (t_hi.ceil().max(0.0) as usize).min(n - 1);
        }
        Some((lo, hi))
    }
}
