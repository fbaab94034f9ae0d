//! Arbitrary 2D polygon mesh with explicit vertex/face adjacency.

use tracing::{debug, trace};

use crate::error::{GridError, Result};
use crate::grid::{CellStencil, Grid, GridCore, StencilNode, Topology};
use crate::math::wachspress;
use crate::spatial::SpatialIndex;
use crate::types::{BoundingBox, GridCoord, GridIndex, GridShape, InterpolationOrder};

/// An unstructured 2D mesh grid: a flat vertex index space with per-node
/// coordinates and bounded-fan-out adjacency tables.
///
/// `vertex_on_face` lists each face's vertex ring (`max_vertex_per_face`
/// slots per face); `face_on_vertex` lists each vertex's incident faces
/// (`max_face_per_vertex` slots per vertex). A negative id is the
/// missing/boundary sentinel terminating a fan list. Point location asks
/// the injected [`SpatialIndex`] for the nearest vertex and tests that
/// vertex's incident faces with the N-gon Wachspress routine; faces with
/// fewer than three resolved vertices cannot contain a point and are
/// skipped. The Z coordinate plays no part; the mesh is 2D by
/// construction.
pub struct UnstructuredGrid2D<'a> {
    core: GridCore<'a>,
    x: &'a [f64],
    y: &'a [f64],
    vertex_on_face: &'a [i64],
    face_on_vertex: &'a [i64],
    max_vertex_per_face: usize,
    max_face_per_vertex: usize,
    num_faces: usize,
    index: &'a dyn SpatialIndex,
}

impl<'a> UnstructuredGrid2D<'a> {
    /// Construct from a one-axis shape (the vertex count), borrowed block
    /// buffers, per-node coordinates, adjacency tables, their fan-out
    /// bounds, and a prebuilt spatial index over the node coordinates.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shape: GridShape,
        blocks: Vec<&'a mut [f32]>,
        x: &'a [f64],
        y: &'a [f64],
        vertex_on_face: &'a [i64],
        face_on_vertex: &'a [i64],
        max_vertex_per_face: usize,
        max_face_per_vertex: usize,
        index: &'a dyn SpatialIndex,
    ) -> Result<Self> {
        let core = GridCore::new(&shape, blocks)?;
        if core.ndim() != 1 {
            return Err(GridError::AxisCount {
                topology: "unstructured",
                expected: "1",
                actual: core.ndim(),
            });
        }
        if core.periodic_axis(0) {
            return Err(GridError::UnsupportedPeriodicity {
                topology: "unstructured",
                axis: 0,
            });
        }

        let num_vertices = core.dims()[0];
        if x.len() != num_vertices {
            return Err(GridError::vector_length("node x coordinates", num_vertices, x.len()));
        }
        if y.len() != num_vertices {
            return Err(GridError::vector_length("node y coordinates", num_vertices, y.len()));
        }
        if max_vertex_per_face == 0 || max_face_per_vertex == 0 {
            return Err(GridError::adjacency("fan-out bounds must be non-zero"));
        }
        if vertex_on_face.len() % max_vertex_per_face != 0 {
            return Err(GridError::adjacency(format!(
                "vertex-on-face table length {} is not a multiple of the fan-out {}",
                vertex_on_face.len(),
                max_vertex_per_face
            )));
        }
        let num_faces = vertex_on_face.len() / max_vertex_per_face;
        if face_on_vertex.len() != num_vertices * max_face_per_vertex {
            return Err(GridError::adjacency(format!(
                "face-on-vertex table has length {}, expected {}",
                face_on_vertex.len(),
                num_vertices * max_face_per_vertex
            )));
        }
        if let Some(&id) = vertex_on_face
            .iter()
            .find(|&&id| id >= num_vertices as i64)
        {
            return Err(GridError::adjacency(format!(
                "vertex id {id} out of range for {num_vertices} vertices"
            )));
        }
        if let Some(&id) = face_on_vertex.iter().find(|&&id| id >= num_faces as i64) {
            return Err(GridError::adjacency(format!(
                "face id {id} out of range for {num_faces} faces"
            )));
        }

        debug!(num_vertices, num_faces, "constructed unstructured grid");
        Ok(Self {
            core,
            x,
            y,
            vertex_on_face,
            face_on_vertex,
            max_vertex_per_face,
            max_face_per_vertex,
            num_faces,
            index,
        })
    }

    /// Number of faces described by the adjacency tables.
    pub fn num_faces(&self) -> usize {
        self.num_faces
    }

    /// The resolved vertex ring of one face, stopping at the sentinel.
    fn face_vertices(&self, face: usize) -> impl Iterator<Item = usize> + '_ {
        self.vertex_on_face[face * self.max_vertex_per_face..]
            .iter()
            .take(self.max_vertex_per_face)
            .take_while(|&&id| id >= 0)
            .map(|&id| id as usize)
    }

    /// Locate the face containing `(px, py)` starting from its nearest
    /// vertex; returns the face's vertex ring and Wachspress weights.
    fn locate_face(&self, px: f64, py: f64) -> Option<(Vec<usize>, Vec<f64>)> {
        let vertex = self.index.nearest(px, py)?;
        if vertex >= self.x.len() {
            trace!(vertex, "spatial index returned an out-of-mesh vertex");
            return None;
        }

        let fan = &self.face_on_vertex
            [vertex * self.max_face_per_vertex..(vertex + 1) * self.max_face_per_vertex];
        for &face_id in fan {
            if face_id < 0 {
                break;
            }
            let face = face_id as usize;
            let ring: Vec<usize> = self.face_vertices(face).collect();
            if ring.len() < 3 {
                continue;
            }
            let polygon: Vec<[f64; 2]> =
                ring.iter().map(|&v| [self.x[v], self.y[v]]).collect();
            if let Some(weights) = wachspress::wachspress_weights(&polygon, [px, py]) {
                return Some((ring, weights));
            }
        }
        trace!(px, py, "point outside every face incident to its nearest vertex");
        None
    }
}

impl Grid for UnstructuredGrid2D<'_> {
    fn core(&self) -> &GridCore<'_> {
        &self.core
    }

    fn topology(&self) -> Topology {
        Topology::Unstructured2D
    }

    fn num_coord_axes(&self) -> usize {
        // A 1D vertex index space positioned by 2D coordinates.
        2
    }

    fn set_value(&mut self, index: &[usize], value: f32) {
        self.core.set_at(index, value);
    }

    fn set_interpolation_order(&mut self, order: InterpolationOrder) {
        self.core.set_interpolation_order(order);
    }

    fn bounding_box(&self) -> BoundingBox {
        let mut min = [f64::INFINITY, f64::INFINITY, 0.0];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY, 0.0];
        for v in 0..self.x.len() {
            min[0] = min[0].min(self.x[v]);
            min[1] = min[1].min(self.y[v]);
            max[0] = max[0].max(self.x[v]);
            max[1] = max[1].max(self.y[v]);
        }
        BoundingBox::new(min, max)
    }

    fn user_coordinates(&self, index: &[usize]) -> Option<GridCoord> {
        let padded = super::pad_index(index, 1)?;
        if padded[0] >= self.x.len() {
            return None;
        }
        Some([self.x[padded[0]], self.y[padded[0]], 0.0])
    }

    fn fold_coords(&self, _coords: &mut GridCoord) {
        // No periodic axes on an unstructured mesh.
    }

    fn nearest_index(&self, coords: &GridCoord) -> Option<GridIndex> {
        let vertex = self.index.nearest(coords[0], coords[1])?;
        if vertex >= self.x.len() {
            return None;
        }
        Some([vertex, 0, 0])
    }

    fn locate_cell(&self, coords: &GridCoord) -> Option<CellStencil> {
        let (ring, weights) = self.locate_face(coords[0], coords[1])?;
        let nodes = ring
            .iter()
            .zip(&weights)
            .map(|(&v, &w)| StencilNode {
                index: [v, 0, 0],
                weight: w,
            })
            .collect();
        Some(CellStencil { nodes })
    }

    /// Unsupported: an unstructured mesh has no index-aligned regions.
    fn enclosing_region(&self, _bbox: &BoundingBox) -> Option<(GridIndex, GridIndex)> {
        panic!("enclosing_region is not meaningful on an unstructured mesh");
    }
}
