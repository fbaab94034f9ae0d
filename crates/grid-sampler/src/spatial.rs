//! Spatial index query contract.
//!
//! Curvilinear and unstructured point location starts from the mesh node
//! nearest to the query point. The index that answers that query (a
//! KD-tree in production deployments) is built and owned by the caller;
//! this crate only consumes the single `nearest` query behind a trait.

use crate::error::{GridError, Result};

/// Nearest-node query over horizontal mesh coordinates.
///
/// `nearest` returns the flat node index closest to `(x, y)`, or `None`
/// for an empty index. Implementations must be safe for concurrent reads;
/// grids issue at most one `nearest` call per point-location query.
pub trait SpatialIndex: Send + Sync {
    /// Index of the node nearest to `(x, y)`.
    fn nearest(&self, x: f64, y: f64) -> Option<usize>;
}

/// Brute-force reference implementation of [`SpatialIndex`].
///
/// Scans every node per query, so it is only suitable for small meshes
/// and for suppliers that have no prebuilt tree. Production callers
/// should inject their own accelerated index.
#[derive(Debug, Clone)]
pub struct LinearScan {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearScan {
    /// Build a scan index over per-node coordinate arrays.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GridError::vector_length("node y coordinates", x.len(), y.len()));
        }
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
        })
    }
}

impl SpatialIndex for LinearScan {
    fn nearest(&self, x: f64, y: f64) -> Option<usize> {
        let mut best = None;
        let mut best_dist = f64::INFINITY;
        for i in 0..self.x.len() {
            let dx = self.x[i] - x;
            let dy = self.y[i] - y;
            let dist = dx * dx + dy * dy;
            if dist < best_dist {
                best_dist = dist;
                best = Some(i);
            }
        }
        best
    }
}
