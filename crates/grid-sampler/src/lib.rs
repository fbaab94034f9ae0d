//! Unified sampling of scalar fields on simulation meshes.
//!
//! Simulation output stores one scalar field per variable on one of
//! several mesh topologies. This crate gives renderers, flow
//! integrators, and statistics code a single access contract over all of
//! them: index addressing against block-organized storage, coordinate
//! sampling with nearest-neighbor or linear interpolation, point
//! location, bounding queries, and lazy iteration.
//!
//! # Architecture
//!
//! ```text
//! caller-owned storage                     grid-sampler
//! ────────────────────                     ────────────
//! dims / block sizes ──► GridShape ──┐
//! block buffers ─────────────────────┼──► RegularGrid ────┐
//! coordinate arrays ─────────────────┤    StretchedGrid ──┤   Grid trait
//! adjacency tables ──────────────────┤    CurvilinearGrid ┼──► value()
//! spatial index ─────────────────────┘    UnstructuredGrid2D  iter()
//!                                                             locate_cell()
//! ```
//!
//! The topology-specific work is reduced to point location and the
//! index/coordinate mapping; interpolation dispatch, range scans, and
//! block-walking iteration are implemented once on the [`Grid`] trait.
//! Point location shares three numerical primitives: bracketing binary
//! search on monotone axes, Wachspress generalized barycentric weights
//! for non-rectangular cells, and periodic coordinate folding.
//!
//! # Example
//!
//! ```
//! use grid_sampler::{Grid, GridShape, RegularGrid};
//!
//! // A 4x4 field stored in four 2x2 blocks, borrowed by the grid.
//! let mut blocks = vec![vec![0.0f32; 4]; 4];
//! let refs: Vec<&mut [f32]> = blocks.iter_mut().map(|b| b.as_mut_slice()).collect();
//! let mut grid = RegularGrid::new(
//!     GridShape::new(vec![4, 4], vec![2, 2]),
//!     refs,
//!     &[0.0, 0.0],
//!     &[3.0, 3.0],
//! )?;
//!
//! for j in 0..4 {
//!     for i in 0..4 {
//!         grid.set_value(&[i, j], (i + 4 * j) as f32);
//!     }
//! }
//! assert_eq!(grid.value_at_index(&[2, 3]), 14.0);
//! assert_eq!(grid.value(&[1.5, 1.5]), 7.5);
//! # Ok::<(), grid_sampler::GridError>(())
//! ```

pub mod blocks;
pub mod error;
pub mod grid;
pub mod math;
pub mod spatial;
pub mod types;

// Re-export commonly used types at the crate root
pub use blocks::BlockLayout;
pub use error::{GridError, Result};
pub use grid::{
    AnyGrid, CellStencil, CoordPlane, CurvilinearGrid, Grid, GridCore, GridIter, RegularGrid,
    StencilNode, StretchedGrid, Topology, UnstructuredGrid2D,
};
pub use spatial::{LinearScan, SpatialIndex};
pub use types::{BoundingBox, GridCoord, GridIndex, GridShape, InterpolationOrder};
