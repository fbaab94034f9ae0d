//! Logically rectangular grid with non-separable horizontal coordinates.

use tracing::{debug, trace};

use crate::error::{GridError, Result};
use crate::grid::{CellStencil, Grid, GridCore, StencilNode, Topology};
use crate::math::{periodic, search, wachspress};
use crate::spatial::SpatialIndex;
use crate::types::{BoundingBox, GridCoord, GridIndex, GridShape, InterpolationOrder};

/// A 2D plane of per-node coordinates, indexed i-fastest.
#[derive(Debug, Clone, Copy)]
pub struct CoordPlane<'a> {
    nx: usize,
    ny: usize,
    values: &'a [f64],
}

impl<'a> CoordPlane<'a> {
    /// Wrap a borrowed plane of `nx * ny` coordinates.
    pub fn new(nx: usize, ny: usize, values: &'a [f64]) -> Result<Self> {
        if values.len() != nx * ny {
            return Err(GridError::vector_length(
                "coordinate plane",
                nx * ny,
                values.len(),
            ));
        }
        Ok(Self { nx, ny, values })
    }

    /// Coordinate of node `(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.nx + i]
    }

    fn min_max(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in self.values {
            min = min.min(v);
            max = max.max(v);
        }
        (min, max)
    }
}

/// A curvilinear grid: horizontal X/Y node coordinates are themselves 2D
/// planes, the vertical axis is a sorted coordinate array.
///
/// There is no closed-form coordinate-to-index inverse; point location
/// asks the injected [`SpatialIndex`] for the nearest mesh node, then
/// tests the at-most-four quadrilateral cells sharing that node with
/// Wachspress coordinates. The vertical axis is searched independently,
/// exactly like a stretched axis.
///
/// Nearest-neighbor sampling trusts the spatial index inside the
/// axis-aligned hull of the mesh: a hull point outside the (possibly
/// non-convex) mesh boundary still maps to its nearest node. Linear
/// sampling performs the full containment test and yields the missing
/// value there instead.
pub struct CurvilinearGrid<'a> {
    core: GridCore<'a>,
    x: CoordPlane<'a>,
    y: CoordPlane<'a>,
    z: &'a [f64],
    index: &'a dyn SpatialIndex,
}

impl<'a> CurvilinearGrid<'a> {
    /// Construct from a shape, borrowed block buffers, borrowed X/Y
    /// coordinate planes, a sorted Z array (empty for 2D grids), and a
    /// prebuilt spatial index over the horizontal node coordinates.
    pub fn new(
        shape: GridShape,
        blocks: Vec<&'a mut [f32]>,
        x: &'a [f64],
        y: &'a [f64],
        z: &'a [f64],
        index: &'a dyn SpatialIndex,
    ) -> Result<Self> {
        let core = GridCore::new(&shape, blocks)?;
        let ndim = core.ndim();
        if ndim < 2 {
            return Err(GridError::AxisCount {
                topology: "curvilinear",
                expected: "2 or 3",
                actual: ndim,
            });
        }
        for axis in 0..2 {
            if core.periodic_axis(axis) {
                return Err(GridError::UnsupportedPeriodicity {
                    topology: "curvilinear",
                    axis,
                });
            }
        }

        let (nx, ny) = (core.dims()[0], core.dims()[1]);
        let x = CoordPlane::new(nx, ny, x)?;
        let y = CoordPlane::new(nx, ny, y)?;

        let nz = if ndim == 3 { core.dims()[2] } else { 0 };
        if z.len() != nz {
            return Err(GridError::CoordinateLength {
                axis: 2,
                expected: nz,
                actual: z.len(),
            });
        }
        if z.windows(2).any(|w| w[1] < w[0]) {
            return Err(GridError::UnsortedAxis { axis: 2 });
        }

        debug!(nx, ny, nz, "constructed curvilinear grid");
        Ok(Self {
            core,
            x,
            y,
            z,
            index,
        })
    }

    fn quad(&self, ci: usize, cj: usize) -> [[f64; 2]; 4] {
        [
            [self.x.at(ci, cj), self.y.at(ci, cj)],
            [self.x.at(ci + 1, cj), self.y.at(ci + 1, cj)],
            [self.x.at(ci + 1, cj + 1), self.y.at(ci + 1, cj + 1)],
            [self.x.at(ci, cj + 1), self.y.at(ci, cj + 1)],
        ]
    }

    /// Locate the horizontal cell containing `(px, py)`.
    ///
    /// Returns the cell's low corner `(ci, cj)` and the Wachspress
    /// weights of the point against the cell's four corners.
    fn locate_quad(&self, px: f64, py: f64) -> Option<(usize, usize, Vec<f64>)> {
        let (nx, ny) = (self.x.nx, self.x.ny);
        if nx < 2 || ny < 2 {
            return None;
        }
        let node = self.index.nearest(px, py)?;
        if node >= nx * ny {
            trace!(node, "spatial index returned an out-of-mesh node");
            return None;
        }
        let (ni, nj) = (node % nx, node / nx);

        // The at-most-four cells incident to the nearest node, clamped at
        // the mesh boundary.
        let ci_lo = ni.saturating_sub(1);
        let ci_hi = ni.min(nx - 2);
        let cj_lo = nj.saturating_sub(1);
        let cj_hi = nj.min(ny - 2);
        for cj in cj_lo..=cj_hi {
            for ci in ci_lo..=ci_hi {
                if let Some(weights) =
                    wachspress::wachspress_weights(&self.quad(ci, cj), [px, py])
                {
                    return Some((ci, cj, weights));
                }
            }
        }
        trace!(px, py, "point outside every cell incident to its nearest node");
        None
    }
}

impl Grid for CurvilinearGrid<'_> {
    fn core(&self) -> &GridCore<'_> {
        &self.core
    }

    fn topology(&self) -> Topology {
        Topology::Curvilinear
    }

    fn set_value(&mut self, index: &[usize], value: f32) {
        self.core.set_at(index, value);
    }

    fn set_interpolation_order(&mut self, order: InterpolationOrder) {
        self.core.set_interpolation_order(order);
    }

    fn bounding_box(&self) -> BoundingBox {
        // Horizontal extents are not index-aligned; every node on the
        // plane contributes.
        let (x_min, x_max) = self.x.min_max();
        let (y_min, y_max) = self.y.min_max();
        let (z_min, z_max) = match self.z {
            [] => (0.0, 0.0),
            z => (z[0], *z.last().unwrap()),
        };
        BoundingBox::new([x_min, y_min, z_min], [x_max, y_max, z_max])
    }

    fn user_coordinates(&self, index: &[usize]) -> Option<GridCoord> {
        let padded = super::pad_index(index, self.core.ndim())?;
        if !self.core.layout().contains(&padded) {
            return None;
        }
        let z = if self.z.is_empty() {
            0.0
        } else {
            self.z[padded[2]]
        };
        Some([
            self.x.at(padded[0], padded[1]),
            self.y.at(padded[0], padded[1]),
            z,
        ])
    }

    fn fold_coords(&self, coords: &mut GridCoord) {
        if !self.z.is_empty() && self.core.periodic_axis(2) {
            coords[2] = periodic::fold(coords[2], self.z[0], *self.z.last().unwrap());
        }
    }

    fn nearest_index(&self, coords: &GridCoord) -> Option<GridIndex> {
        let (nx, ny) = (self.x.nx, self.x.ny);
        let node = self.index.nearest(coords[0], coords[1])?;
        if node >= nx * ny {
            return None;
        }
        let mut index = [node % nx, node / nx, 0];
        if !self.z.is_empty() {
            let (k, w) = search::bracket(self.z, coords[2])?;
            index[2] = if w > 0.5 { k + 1 } else { k };
        }
        Some(index)
    }

    fn locate_cell(&self, coords: &GridCoord) -> Option<CellStencil> {
        let (ci, cj, weights) = self.locate_quad(coords[0], coords[1])?;
        let corners = [(ci, cj), (ci + 1, cj), (ci + 1, cj + 1), (ci, cj + 1)];

        let mut nodes = Vec::with_capacity(8);
        if self.z.is_empty() {
            for (corner, &w) in corners.iter().zip(&weights) {
                nodes.push(StencilNode {
                    index: [corner.0, corner.1, 0],
                    weight: w,
                });
            }
        } else {
            let (k, zw) = search::bracket(self.z, coords[2])?;
            for (corner, &w) in corners.iter().zip(&weights) {
                nodes.push(StencilNode {
                    index: [corner.0, corner.1, k],
                    weight: w * (1.0 - zw),
                });
            }
            if k + 1 < self.z.len() {
                for (corner, &w) in corners.iter().zip(&weights) {
                    nodes.push(StencilNode {
                        index: [corner.0, corner.1, k + 1],
                        weight: w * zw,
                    });
                }
            }
        }
        Some(CellStencil { nodes })
    }

    fn enclosing_region(&self, bbox: &BoundingBox) -> Option<(GridIndex, GridIndex)> {
        let (nx, ny) = (self.x.nx, self.x.ny);
        let mut found = false;
        let mut lo = [usize::MAX, usize::MAX, 0];
        let mut hi = [0usize; 3];
        // No index-aligned inverse exists, so scan the horizontal plane.
        for j in 0..ny {
            for i in 0..nx {
                let px = self.x.at(i, j);
                let py = self.y.at(i, j);
                if px >= bbox.min[0]
                    && px <= bbox.max[0]
                    && py >= bbox.min[1]
                    && py <= bbox.max[1]
                {
                    found = true;
                    lo[0] = lo[0].min(i);
                    lo[1] = lo[1].min(j);
                    hi[0] = hi[0].max(i);
                    hi[1] = hi[1].max(j);
                }
            }
        }
        if !found {
            return None;
        }
        if !self.z.is_empty() {
            let nz = self.z.len();
            if bbox.max[2] < self.z[0] || bbox.min[2] > self.z[nz - 1] {
                return None;
            }
            lo[2] = match search::bracket(self.z, bbox.min[2]) {
                Some((k, _)) => k,
                None => 0,
            };
            hi[2] = match search::bracket(self.z, bbox.max[2]) {
                Some((k, w)) => {
                    if w > 0.0 {
                        (k + 1).min(nz - 1)
                    } else {
                        k
                    }
                }
                None => nz - 1,
            };
        }
        Some((lo, hi))
    }
}
