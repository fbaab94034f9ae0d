//! The shared grid contract and its per-topology implementations.
//!
//! Every topology exposes the same access surface: index-based reads and
//! writes against block-organized storage, coordinate-based sampling with
//! nearest-neighbor or linear interpolation, point location, bounding
//! queries, and lazy iteration. The topology-specific part is reduced to
//! point location and the index/coordinate mapping; everything else is
//! provided once on the [`Grid`] trait.

mod curvilinear;
mod iter;
mod regular;
mod stretched;
mod unstructured;

pub use curvilinear::{CoordPlane, CurvilinearGrid};
pub use iter::GridIter;
pub use regular::RegularGrid;
pub use stretched::StretchedGrid;
pub use unstructured::UnstructuredGrid2D;

use crate::blocks::BlockLayout;
use crate::error::{GridError, Result};
use crate::types::{BoundingBox, GridCoord, GridIndex, GridShape, InterpolationOrder};

/// The mesh topology of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Axis-aligned with affine index/coordinate mapping.
    Regular,
    /// Axis-aligned with monotone but irregular per-axis spacing.
    Stretched,
    /// Logically rectangular with 2D horizontal coordinate planes.
    Curvilinear,
    /// Arbitrary 2D polygon mesh with explicit adjacency.
    Unstructured2D,
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Stretched => write!(f, "stretched"),
            Self::Curvilinear => write!(f, "curvilinear"),
            Self::Unstructured2D => write!(f, "unstructured2d"),
        }
    }
}

/// One node of an interpolation stencil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilNode {
    /// Padded logical index of the node.
    pub index: GridIndex,
    /// Interpolation weight of the node's value.
    pub weight: f64,
}

/// The containing cell of a located point, as nodes plus weights.
///
/// Structured topologies produce the tensor-product corner stencil of the
/// containing voxel; curvilinear quads and unstructured N-gons produce
/// Wachspress weights over the cell's vertices. Weights are non-negative
/// and sum to one. The stencil is transient query state, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStencil {
    /// Stencil nodes; the first node anchors the cell (its lowest corner
    /// on structured topologies, the first face vertex on meshes).
    pub nodes: Vec<StencilNode>,
}

impl CellStencil {
    /// Padded index of the cell's anchor node.
    pub fn anchor(&self) -> GridIndex {
        self.nodes[0].index
    }
}

/// One axis of a structured cell bracket.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisBracket {
    pub lo: usize,
    pub hi: usize,
    pub frac: f64,
}

impl AxisBracket {
    /// A degenerate bracket pinned to a single node.
    pub fn pinned(node: usize) -> Self {
        Self {
            lo: node,
            hi: node,
            frac: 0.0,
        }
    }
}

/// Expand per-axis brackets into the tensor-product corner stencil.
pub(crate) fn tensor_stencil(brackets: &[AxisBracket]) -> CellStencil {
    let mut nodes = vec![StencilNode {
        index: [0; 3],
        weight: 1.0,
    }];
    for (d, br) in brackets.iter().enumerate() {
        if br.hi == br.lo {
            for node in &mut nodes {
                node.index[d] = br.lo;
            }
            continue;
        }
        let mut expanded = Vec::with_capacity(nodes.len() * 2);
        for node in &nodes {
            let mut lo = *node;
            lo.index[d] = br.lo;
            lo.weight *= 1.0 - br.frac;
            expanded.push(lo);
            let mut hi = *node;
            hi.index[d] = br.hi;
            hi.weight *= br.frac;
            expanded.push(hi);
        }
        nodes = expanded;
    }
    CellStencil { nodes }
}

/// Pad a caller-supplied index to three components.
///
/// The slice length must equal the grid's axis count; anything else is
/// treated as out of range.
pub(crate) fn pad_index(index: &[usize], ndim: usize) -> Option<GridIndex> {
    if index.len() != ndim {
        return None;
    }
    let mut padded = [0usize; 3];
    padded[..ndim].copy_from_slice(index);
    Some(padded)
}

/// Pad caller-supplied coordinates to three components.
pub(crate) fn pad_coords(coords: &[f64], ndim: usize) -> Option<GridCoord> {
    if coords.len() != ndim {
        return None;
    }
    let mut padded = [0f64; 3];
    padded[..ndim].copy_from_slice(coords);
    Some(padded)
}

/// Shared storage and sampling state owned by every topology.
///
/// The block buffers are borrowed from the caller: the grid never
/// allocates or frees them, and the borrow checker guarantees the
/// supplier outlives the grid.
pub struct GridCore<'a> {
    layout: BlockLayout,
    blocks: Vec<&'a mut [f32]>,
    periodic: [bool; 3],
    missing_value: f32,
    has_missing: bool,
    order: InterpolationOrder,
}

impl<'a> GridCore<'a> {
    /// Assemble core state from a validated shape and borrowed blocks.
    ///
    /// The block list may be empty for a dataless (metadata-only) grid;
    /// otherwise its length must match the layout's block count and every
    /// buffer must hold exactly one block of floats.
    pub fn new(shape: &GridShape, blocks: Vec<&'a mut [f32]>) -> Result<Self> {
        shape.validate()?;
        let layout = BlockLayout::new(&shape.dims, &shape.block_size)?;

        if !blocks.is_empty() && blocks.len() != layout.num_blocks() {
            return Err(GridError::BlockCount {
                expected: layout.num_blocks(),
                actual: blocks.len(),
            });
        }
        for (i, block) in blocks.iter().enumerate() {
            if block.len() != layout.block_len() {
                return Err(GridError::BlockLength {
                    block: i,
                    expected: layout.block_len(),
                    actual: block.len(),
                });
            }
        }

        let mut periodic = [false; 3];
        periodic[..shape.periodic.len()].copy_from_slice(&shape.periodic);

        Ok(Self {
            layout,
            blocks,
            periodic,
            missing_value: shape.missing_value.unwrap_or(f32::INFINITY),
            has_missing: shape.missing_value.is_some(),
            order: InterpolationOrder::default(),
        })
    }

    /// Block geometry of the grid.
    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Number of coordinate axes.
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Per-axis extents.
    pub fn dims(&self) -> &[usize] {
        self.layout.dims()
    }

    /// Per-axis periodicity flags.
    pub fn periodic(&self) -> &[bool] {
        &self.periodic[..self.layout.ndim()]
    }

    /// Periodicity of one (padded) axis.
    pub(crate) fn periodic_axis(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// The missing-value sentinel.
    pub fn missing_value(&self) -> f32 {
        self.missing_value
    }

    /// Whether a caller-supplied missing value is in effect.
    pub fn has_missing(&self) -> bool {
        self.has_missing
    }

    /// Whether `value` marks a cell with no valid data.
    ///
    /// NaN always counts as missing; the sentinel itself matches by exact
    /// comparison when one was supplied.
    pub fn is_missing(&self, value: f32) -> bool {
        value.is_nan() || (self.has_missing && value == self.missing_value)
    }

    /// Current interpolation order.
    pub fn interpolation_order(&self) -> InterpolationOrder {
        self.order
    }

    /// Set the interpolation order.
    pub fn set_interpolation_order(&mut self, order: InterpolationOrder) {
        self.order = order;
    }

    /// Whether the grid carries no block data.
    pub fn is_dataless(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Read the value at a logical index.
    ///
    /// Out-of-range components, a wrong-arity index, and dataless grids
    /// all yield the missing-value sentinel; boundary interpolation
    /// stencils probe out of range as a matter of course, so this is a
    /// normal query outcome, not an error.
    pub fn value_at(&self, index: &[usize]) -> f32 {
        match pad_index(index, self.ndim()) {
            Some(padded) => self.value_at_node(&padded),
            None => self.missing_value,
        }
    }

    /// Read the value at a padded logical index.
    pub fn value_at_node(&self, index: &GridIndex) -> f32 {
        if self.blocks.is_empty() || !self.layout.contains(index) {
            return self.missing_value;
        }
        let (block, offset) = self.layout.locate(index);
        self.blocks[block][offset]
    }

    /// Write the value at a logical index.
    ///
    /// A no-op when the index is out of range or the grid is dataless.
    pub fn set_at(&mut self, index: &[usize], value: f32) {
        let Some(padded) = pad_index(index, self.ndim()) else {
            return;
        };
        if self.blocks.is_empty() || !self.layout.contains(&padded) {
            return;
        }
        let (block, offset) = self.layout.locate(&padded);
        self.blocks[block][offset] = value;
    }

    /// Raw read access for the block-walking iterator.
    pub(crate) fn raw_block(&self, block: usize) -> &[f32] {
        self.blocks[block]
    }
}

/// The shared access contract implemented by every topology.
///
/// All read-only queries take `&self` and are safe to issue concurrently;
/// `set_value` takes `&mut self`, so the borrow checker enforces the
/// caller-side synchronization the storage contract requires.
pub trait Grid: Send + Sync {
    /// Shared storage and sampling state.
    fn core(&self) -> &GridCore<'_>;

    /// The grid's mesh topology.
    fn topology(&self) -> Topology;

    /// Write a value at a logical index; no-op out of range.
    fn set_value(&mut self, index: &[usize], value: f32);

    /// Set the interpolation order used by [`value`][Grid::value].
    fn set_interpolation_order(&mut self, order: InterpolationOrder);

    /// Axis-aligned bounds of the grid in user coordinates.
    ///
    /// O(1) for separable topologies; curvilinear and unstructured grids
    /// must visit every node.
    fn bounding_box(&self) -> BoundingBox;

    /// User coordinates of a grid node, or `None` out of range.
    fn user_coordinates(&self, index: &[usize]) -> Option<GridCoord>;

    /// Fold coordinates on periodic axes back into range.
    fn fold_coords(&self, coords: &mut GridCoord);

    /// Padded index of the node nearest to (already folded) coordinates.
    fn nearest_index(&self, coords: &GridCoord) -> Option<GridIndex>;

    /// Locate the cell containing (already folded) coordinates and return
    /// its interpolation stencil. `None` means the point is outside the
    /// grid, a legitimate boundary outcome.
    fn locate_cell(&self, coords: &GridCoord) -> Option<CellStencil>;

    /// Smallest index-aligned region covering `bbox`, clamped to the
    /// grid, as inclusive (min, max) corner indices.
    ///
    /// # Panics
    ///
    /// Panics on topologies without a meaningful index-aligned region
    /// (unstructured meshes); calling it there is a programming error.
    fn enclosing_region(&self, bbox: &BoundingBox) -> Option<(GridIndex, GridIndex)>;

    /// Number of logical index axes.
    fn ndim(&self) -> usize {
        self.core().ndim()
    }

    /// Number of user-coordinate axes.
    ///
    /// Equal to [`ndim`][Grid::ndim] on logically rectangular topologies;
    /// an unstructured mesh addresses a 1D vertex space positioned by 2D
    /// coordinates.
    fn num_coord_axes(&self) -> usize {
        self.core().ndim()
    }

    /// Per-axis extents.
    fn dims(&self) -> &[usize] {
        self.core().dims()
    }

    /// The missing-value sentinel.
    fn missing_value(&self) -> f32 {
        self.core().missing_value()
    }

    /// Current interpolation order.
    fn interpolation_order(&self) -> InterpolationOrder {
        self.core().interpolation_order()
    }

    /// Read the value at a logical index; missing sentinel out of range.
    fn value_at_index(&self, index: &[usize]) -> f32 {
        self.core().value_at(index)
    }

    /// Whether folded coordinates land inside the grid.
    fn inside(&self, coords: &[f64]) -> bool {
        let Some(mut padded) = pad_coords(coords, self.num_coord_axes()) else {
            return false;
        };
        self.fold_coords(&mut padded);
        self.locate_cell(&padded).is_some()
    }

    /// Sample the field at user coordinates.
    ///
    /// Folds periodic axes, rejects coordinates outside the bounding
    /// extents with the missing-value sentinel, then dispatches on the
    /// interpolation order. A missing value at any stencil node makes the
    /// whole sample missing.
    fn value(&self, coords: &[f64]) -> f32 {
        let core = self.core();
        let missing = core.missing_value();
        if core.is_dataless() {
            return missing;
        }
        let Some(mut padded) = pad_coords(coords, self.num_coord_axes()) else {
            return missing;
        };
        self.fold_coords(&mut padded);
        if !self.bounding_box().contains(&padded) {
            return missing;
        }
        match core.interpolation_order() {
            InterpolationOrder::Nearest => match self.nearest_index(&padded) {
                Some(index) => core.value_at_node(&index),
                None => missing,
            },
            InterpolationOrder::Linear => match self.locate_cell(&padded) {
                Some(stencil) => {
                    let mut acc = 0.0;
                    for node in &stencil.nodes {
                        let v = core.value_at_node(&node.index);
                        if core.is_missing(v) {
                            return missing;
                        }
                        acc += node.weight * v as f64;
                    }
                    acc as f32
                }
                None => missing,
            },
        }
    }

    /// Padded anchor index of the cell containing `coords`.
    fn cell_indices(&self, coords: &[f64]) -> Option<GridIndex> {
        let Some(mut padded) = pad_coords(coords, self.num_coord_axes()) else {
            return None;
        };
        self.fold_coords(&mut padded);
        self.locate_cell(&padded).map(|stencil| stencil.anchor())
    }

    /// User coordinates of every node of the cell containing `coords`.
    fn cell_coordinates(&self, coords: &[f64]) -> Option<Vec<GridCoord>> {
        let ndim = self.ndim();
        let Some(mut padded) = pad_coords(coords, self.num_coord_axes()) else {
            return None;
        };
        self.fold_coords(&mut padded);
        let stencil = self.locate_cell(&padded)?;
        stencil
            .nodes
            .iter()
            .map(|node| self.user_coordinates(&node.index[..ndim]))
            .collect()
    }

    /// Minimum and maximum data values, skipping missing entries.
    ///
    /// A full scan; returns the sentinel pair when every value is missing.
    fn range(&self) -> (f32, f32)
    where
        Self: Sized,
    {
        let core = self.core();
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut any = false;
        for (_, v) in self.iter() {
            if core.is_missing(v) {
                continue;
            }
            any = true;
            min = min.min(v);
            max = max.max(v);
        }
        if any {
            (min, max)
        } else {
            (core.missing_value(), core.missing_value())
        }
    }

    /// Lazy iteration over every `(index, value)` pair in row-major,
    /// fastest-varying-axis-first order. Restart by calling again.
    fn iter(&self) -> GridIter<'_>
    where
        Self: Sized,
    {
        GridIter::new(self.core(), None)
    }

    /// Like [`iter`][Grid::iter], restricted to nodes whose user
    /// coordinates fall inside `bbox`.
    fn iter_region(&self, bbox: &BoundingBox) -> GridIter<'_>
    where
        Self: Sized,
    {
        GridIter::new(self.core(), Some((self, *bbox)))
    }
}

/// A grid of any topology, dispatched exhaustively.
///
/// The tagged-variant form keeps heterogeneous collections of grids
/// monomorphic and lets the compiler check that every topology handles
/// every operation.
pub enum AnyGrid<'a> {
    Regular(RegularGrid<'a>),
    Stretched(StretchedGrid<'a>),
    Curvilinear(CurvilinearGrid<'a>),
    Unstructured2D(UnstructuredGrid2D<'a>),
}

impl<'a> From<RegularGrid<'a>> for AnyGrid<'a> {
    fn from(grid: RegularGrid<'a>) -> Self {
        Self::Regular(grid)
    }
}

impl<'a> From<StretchedGrid<'a>> for AnyGrid<'a> {
    fn from(grid: StretchedGrid<'a>) -> Self {
        Self::Stretched(grid)
    }
}

impl<'a> From<CurvilinearGrid<'a>> for AnyGrid<'a> {
    fn from(grid: CurvilinearGrid<'a>) -> Self {
        Self::Curvilinear(grid)
    }
}

impl<'a> From<UnstructuredGrid2D<'a>> for AnyGrid<'a> {
    fn from(grid: UnstructuredGrid2D<'a>) -> Self {
        Self::Unstructured2D(grid)
    }
}

macro_rules! dispatch {
    ($self:ident, $grid:ident => $body:expr) => {
        match $self {
            AnyGrid::Regular($grid) => $body,
            AnyGrid::Stretched($grid) => $body,
            AnyGrid::Curvilinear($grid) => $body,
            AnyGrid::Unstructured2D($grid) => $body,
        }
    };
}

impl Grid for AnyGrid<'_> {
    fn core(&self) -> &GridCore<'_> {
        dispatch!(self, grid => grid.core())
    }

    fn topology(&self) -> Topology {
        dispatch!(self, grid => grid.topology())
    }

    fn num_coord_axes(&self) -> usize {
        dispatch!(self, grid => grid.num_coord_axes())
    }

    fn set_value(&mut self, index: &[usize], value: f32) {
        dispatch!(self, grid => grid.set_value(index, value))
    }

    fn set_interpolation_order(&mut self, order: InterpolationOrder) {
        dispatch!(self, grid => grid.set_interpolation_order(order))
    }

    fn bounding_box(&self) -> BoundingBox {
        dispatch!(self, grid => grid.bounding_box())
    }

    fn user_coordinates(&self, index: &[usize]) -> Option<GridCoord> {
        dispatch!(self, grid => grid.user_coordinates(index))
    }

    fn fold_coords(&self, coords: &mut GridCoord) {
        dispatch!(self, grid => grid.fold_coords(coords))
    }

    fn nearest_index(&self, coords: &GridCoord) -> Option<GridIndex> {
        dispatch!(self, grid => grid.nearest_index(coords))
    }

    fn locate_cell(&self, coords: &GridCoord) -> Option<CellStencil> {
        dispatch!(self, grid => grid.locate_cell(coords))
    }

    fn enclosing_region(&self, bbox: &BoundingBox) -> Option<(GridIndex, GridIndex)> {
        dispatch!(self, grid => grid.enclosing_region(bbox))
    }
}
