//! Test data generators for creating synthetic field data.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

/// Creates a dense row-major test field with predictable values.
///
/// Each node value is calculated as: `i + 1000 * j + 1000000 * k`
///
/// This makes it easy to verify that data is being addressed correctly
/// by checking that the value at `(i, j, k)` decodes back to its index.
///
/// # Arguments
///
/// * `dims` - Per-axis extents (1-3 entries)
///
/// # Returns
///
/// A `Vec<f32>` in row-major order with the first axis varying fastest.
///
/// # Example
///
/// ```
/// use test_utils::create_index_field;
///
/// let field = create_index_field(&[4, 3]);
/// assert_eq!(field.len(), 12);
/// assert_eq!(field[0], 0.0); // (0, 0) -> 0 + 1000*0
/// assert_eq!(field[1], 1.0); // (1, 0)
/// assert_eq!(field[4], 1000.0); // (0, 1)
/// ```
pub fn create_index_field(dims: &[usize]) -> Vec<f32> {
    let (nx, ny, nz) = padded_dims(dims);
    let mut data = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                data.push((i + 1000 * j + 1_000_000 * k) as f32);
            }
        }
    }
    data
}

/// Creates a dense row-major field equal to a linear ramp `a*i + b*j`.
///
/// Linear fields are reproduced exactly by every linear interpolation
/// scheme, which makes them convenient sampling oracles.
pub fn create_ramp_field(dims: &[usize], a: f64, b: f64) -> Vec<f32> {
    let (nx, ny, nz) = padded_dims(dims);
    let mut data = Vec::with_capacity(nx * ny * nz);
    for _k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                data.push((a * i as f64 + b * j as f64) as f32);
            }
        }
    }
    data
}

/// Partitions a dense row-major field into block buffers.
///
/// Block geometry follows the grid convention: `ceil(dims / block_size)`
/// blocks per axis, each buffer holding `product(block_size)` floats.
/// Slots past the field edge in partial boundary blocks are set to
/// `fill`.
///
/// # Arguments
///
/// * `data` - Dense field in row-major order, `product(dims)` values
/// * `dims` - Per-axis extents (1-3 entries)
/// * `block_size` - Per-axis block edge lengths
/// * `fill` - Value for the padding slots of partial blocks
///
/// # Returns
///
/// One `Vec<f32>` per block, ordered with the first block axis varying
/// fastest.
pub fn partition_blocks(
    data: &[f32],
    dims: &[usize],
    block_size: &[usize],
    fill: f32,
) -> Vec<Vec<f32>> {
    let (nx, ny, nz) = padded_dims(dims);
    let (bx, by, bz) = padded_dims(block_size);
    assert_eq!(data.len(), nx * ny * nz, "dense field does not match dims");

    let bd = [
        (nx + bx - 1) / bx,
        (ny + by - 1) / by,
        (nz + bz - 1) / bz,
    ];
    let mut blocks = vec![vec![fill; bx * by * bz]; bd[0] * bd[1] * bd[2]];

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let block = (i / bx) + bd[0] * ((j / by) + bd[1] * (k / bz));
                let offset = (i % bx) + bx * ((j % by) + by * (k % bz));
                blocks[block][offset] = data[i + nx * (j + ny * k)];
            }
        }
    }
    blocks
}

/// Builds the node coordinates of a sheared structured plane.
///
/// Node `(i, j)` sits at `(i + shear * j, j)`, producing parallelogram
/// cells that exercise non-axis-aligned point location while staying
/// easy to reason about.
///
/// # Returns
///
/// `(x, y)` coordinate planes of `nx * ny` values each, i-fastest.
pub fn create_sheared_plane(nx: usize, ny: usize, shear: f64) -> (Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(nx * ny);
    let mut y = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            x.push(i as f64 + shear * j as f64);
            y.push(j as f64);
        }
    }
    (x, y)
}

/// An unstructured quad mesh over a unit-spaced node lattice.
///
/// Node `v = i + nx * j` sits at `(i, j)`; each lattice cell becomes one
/// quad face. The adjacency tables follow the bounded-fan-out convention:
/// fixed-width rows padded with `-1` sentinels.
pub struct QuadMesh {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vertex_on_face: Vec<i64>,
    pub face_on_vertex: Vec<i64>,
    pub max_vertex_per_face: usize,
    pub max_face_per_vertex: usize,
}

/// Builds an unstructured quad mesh covering an `nx` x `ny` node lattice.
///
/// Faces are numbered `ci + (nx - 1) * cj` over the lattice cells; each
/// face's vertex ring runs counter-clockwise from its low corner. Every
/// interior vertex lists its four incident faces, boundary vertices fewer,
/// with `-1` terminating each fan.
pub fn create_quad_mesh(nx: usize, ny: usize) -> QuadMesh {
    assert!(nx >= 2 && ny >= 2, "a quad mesh needs at least 2x2 nodes");
    let mut x = Vec::with_capacity(nx * ny);
    let mut y = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            x.push(i as f64);
            y.push(j as f64);
        }
    }

    let max_vertex_per_face = 4;
    let mut vertex_on_face = Vec::with_capacity((nx - 1) * (ny - 1) * max_vertex_per_face);
    for cj in 0..ny - 1 {
        for ci in 0..nx - 1 {
            let v00 = (ci + nx * cj) as i64;
            vertex_on_face.extend_from_slice(&[
                v00,
                v00 + 1,
                v00 + 1 + nx as i64,
                v00 + nx as i64,
            ]);
        }
    }

    let max_face_per_vertex = 4;
    let mut face_on_vertex = vec![-1i64; nx * ny * max_face_per_vertex];
    for j in 0..ny {
        for i in 0..nx {
            let fan = &mut face_on_vertex
                [(i + nx * j) * max_face_per_vertex..(i + nx * j + 1) * max_face_per_vertex];
            let mut slot = 0;
            for cj in j.saturating_sub(1)..=j.min(ny - 2) {
                for ci in i.saturating_sub(1)..=i.min(nx - 2) {
                    fan[slot] = (ci + (nx - 1) * cj) as i64;
                    slot += 1;
                }
            }
        }
    }

    QuadMesh {
        x,
        y,
        vertex_on_face,
        face_on_vertex,
        max_vertex_per_face,
        max_face_per_vertex,
    }
}

fn padded_dims(dims: &[usize]) -> (usize, usize, usize) {
    assert!(
        !dims.is_empty() && dims.len() <= 3,
        "dims must have 1-3 entries"
    );
    (
        dims[0],
        dims.get(1).copied().unwrap_or(1),
        dims.get(2).copied().unwrap_or(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_field_decodes_indices() {
        let field = create_index_field(&[3, 2, 2]);
        assert_eq!(field.len(), 12);
        assert_eq!(field[2 + 3 * (1 + 2 * 1)], 1_001_002.0);
    }

    #[test]
    fn test_partition_blocks_round_trip() {
        let dims = [5usize, 3];
        let field = create_index_field(&dims);
        let blocks = partition_blocks(&field, &dims, &[2, 2], -1.0);
        // ceil(5/2) * ceil(3/2) = 3 * 2 blocks of 4 floats.
        assert_eq!(blocks.len(), 6);
        assert!(blocks.iter().all(|b| b.len() == 4));

        // Node (4, 2) lives in block (2, 1) at offset (0, 0).
        assert_eq!(blocks[2 + 3 * 1][0], 2004.0);
        // The padding slot next to it keeps the fill value.
        assert_eq!(blocks[2 + 3 * 1][1], -1.0);
    }

    #[test]
    fn test_ramp_field_is_linear() {
        let field = create_ramp_field(&[3, 3], 2.0, 0.5);
        assert_eq!(field[0], 0.0);
        assert_eq!(field[2], 4.0);
        assert_eq!(field[3], 0.5);
    }

    #[test]
    fn test_quad_mesh_adjacency() {
        let mesh = create_quad_mesh(3, 3);
        assert_eq!(mesh.x.len(), 9);
        assert_eq!(mesh.vertex_on_face.len(), 4 * 4);
        // Face 3 is the upper-right cell, ring from its low corner.
        assert_eq!(&mesh.vertex_on_face[3 * 4..4 * 4], &[4, 5, 8, 7]);
        // The center vertex touches all four faces.
        assert_eq!(&mesh.face_on_vertex[4 * 4..5 * 4], &[0, 1, 2, 3]);
        // A corner vertex touches one, sentinel-terminated.
        assert_eq!(&mesh.face_on_vertex[0..4], &[0, -1, -1, -1]);
    }

    #[test]
    fn test_sheared_plane_coordinates() {
        let (x, y) = create_sheared_plane(3, 2, 0.5);
        assert_eq!(x.len(), 6);
        assert_eq!(x[1 + 3 * 1], 1.5);
        assert_eq!(y[1 + 3 * 1], 1.0);
    }
}
