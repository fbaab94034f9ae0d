//! End-to-end sampling tests across every topology.
//!
//! These tests exercise the public surface the way renderer and
//! flow-integrator code does: construct a grid over caller-owned block
//! buffers, then sample, locate, and iterate.

use grid_sampler::{
    AnyGrid, BoundingBox, Grid, GridShape, InterpolationOrder, LinearScan, RegularGrid,
    StretchedGrid, Topology,
};
use test_utils::{
    create_index_field, create_quad_mesh, create_ramp_field, create_sheared_plane,
    partition_blocks,
};

fn block_refs(blocks: &mut [Vec<f32>]) -> Vec<&mut [f32]> {
    blocks.iter_mut().map(|b| b.as_mut_slice()).collect()
}

// =============================================================================
// Regular grid
// =============================================================================

#[test]
fn test_regular_end_to_end() {
    // 4x4x1 field in 2x2x1 blocks, v(i, j) = i + 4 j.
    let dims = [4usize, 4, 1];
    let mut dense = vec![0.0f32; 16];
    for j in 0..4 {
        for i in 0..4 {
            dense[i + 4 * j] = (i + 4 * j) as f32;
        }
    }
    let mut blocks = partition_blocks(&dense, &dims, &[2, 2, 1], 0.0);
    let refs = block_refs(&mut blocks);
    let mut grid = RegularGrid::new(
        GridShape::new(dims.to_vec(), vec![2, 2, 1]),
        refs,
        &[0.0, 0.0, 0.0],
        &[3.0, 3.0, 0.0],
    )
    .unwrap();

    assert_eq!(grid.value_at_index(&[2, 3, 0]), 14.0);

    // Linear sample mid-cell: bilinear average of (1,1) (2,1) (1,2) (2,2).
    let v = grid.value(&[1.5, 1.5, 0.0]);
    assert!((v - 7.5).abs() < 1e-6);

    // Nearest order reproduces node values exactly.
    grid.set_interpolation_order(InterpolationOrder::Nearest);
    for j in 0..4 {
        for i in 0..4 {
            assert_eq!(
                grid.value(&[i as f64, j as f64, 0.0]),
                grid.value_at_index(&[i, j, 0])
            );
        }
    }
}

#[test]
fn test_set_value_access_round_trip() {
    let dims = [5usize, 4, 3];
    let field = create_index_field(&dims);
    let mut blocks = partition_blocks(&field, &dims, &[2, 3, 2], 0.0);
    let refs = block_refs(&mut blocks);
    let mut grid = RegularGrid::new(
        GridShape::new(dims.to_vec(), vec![2, 3, 2]),
        refs,
        &[0.0, 0.0, 0.0],
        &[4.0, 3.0, 2.0],
    )
    .unwrap();

    for k in 0..3 {
        for j in 0..4 {
            for i in 0..5 {
                let expect = (i + 1000 * j + 1_000_000 * k) as f32;
                assert_eq!(grid.value_at_index(&[i, j, k]), expect);
                grid.set_value(&[i, j, k], expect + 0.5);
                assert_eq!(grid.value_at_index(&[i, j, k]), expect + 0.5);
            }
        }
    }
}

#[test]
fn test_iteration_covers_grid_in_access_order() {
    let dims = [5usize, 4, 3];
    let field = create_index_field(&dims);
    let mut blocks = partition_blocks(&field, &dims, &[2, 3, 2], 0.0);
    let refs = block_refs(&mut blocks);
    let grid = RegularGrid::new(
        GridShape::new(dims.to_vec(), vec![2, 3, 2]),
        refs,
        &[0.0, 0.0, 0.0],
        &[4.0, 3.0, 2.0],
    )
    .unwrap();

    let items: Vec<_> = grid.iter().collect();
    assert_eq!(items.len(), 5 * 4 * 3);
    for (index, value) in items {
        assert_eq!(value, grid.value_at_index(&index[..3]));
    }
}

#[test]
fn test_periodic_sampling_is_translation_invariant() {
    // Ten nodes covering [0, 10) on a periodic axis.
    let mut blocks = vec![(0..10).map(|i| (i * i) as f32).collect::<Vec<_>>()];
    let refs = block_refs(&mut blocks);
    let mut grid = RegularGrid::new(
        GridShape::new(vec![10], vec![10]).with_periodic(vec![true]),
        refs,
        &[0.0],
        &[10.0],
    )
    .unwrap();

    for order in [InterpolationOrder::Nearest, InterpolationOrder::Linear] {
        grid.set_interpolation_order(order);
        for x in [0.0, 0.3, 2.5, 7.9, 9.99] {
            assert_eq!(grid.value(&[x]), grid.value(&[x + 10.0]), "{order} at {x}");
            assert_eq!(grid.value(&[x]), grid.value(&[x - 10.0]), "{order} at {x}");
        }
    }
}

#[test]
fn test_linear_order_reproduces_ramp_field() {
    // A ramp field is its own interpolation oracle: linear schemes
    // reproduce 2x + 0.5y exactly everywhere inside the grid.
    let dims = [5usize, 4];
    let field = create_ramp_field(&dims, 2.0, 0.5);
    let mut blocks = partition_blocks(&field, &dims, &[2, 2], 0.0);
    let refs = block_refs(&mut blocks);
    let grid = RegularGrid::new(
        GridShape::new(dims.to_vec(), vec![2, 2]),
        refs,
        &[0.0, 0.0],
        &[4.0, 3.0],
    )
    .unwrap();

    for (x, y) in [(0.5, 0.5), (1.75, 2.25), (3.9, 0.1), (4.0, 3.0)] {
        let v = grid.value(&[x, y]);
        let expect = (2.0 * x + 0.5 * y) as f32;
        assert!((v - expect).abs() < 1e-5, "at ({x},{y})");
    }
}

#[test]
fn test_range_skips_missing_values() {
    let mut blocks = vec![vec![2.0, -5.0, 9.0, -999.0]];
    let refs = block_refs(&mut blocks);
    let grid = RegularGrid::new(
        GridShape::new(vec![4], vec![4]).with_missing_value(-999.0),
        refs,
        &[0.0],
        &[3.0],
    )
    .unwrap();
    assert_eq!(grid.range(), (-5.0, 9.0));
}

// =============================================================================
// Stretched grid
// =============================================================================

#[test]
fn test_stretched_bracket_location() {
    let x_axis = [0.0, 1.0, 3.0, 7.0];
    let field = create_index_field(&[4]);
    let mut blocks = partition_blocks(&field, &[4], &[2], 0.0);
    let refs = block_refs(&mut blocks);
    let grid = StretchedGrid::new(
        GridShape::new(vec![4], vec![2]),
        refs,
        vec![&x_axis[..]],
    )
    .unwrap();

    // 1 <= 2 <= 3 brackets nodes [1, 2].
    let anchor = grid.cell_indices(&[2.0]).unwrap();
    assert_eq!(anchor[0], 1);

    // One failing axis puts the whole point outside.
    assert!(!grid.inside(&[8.0]));
    assert_eq!(grid.value(&[8.0]), f32::INFINITY);
}

// =============================================================================
// Mixed topologies behind the tagged variant
// =============================================================================

#[test]
fn test_any_grid_dispatch() {
    let x_axis = [0.0, 1.0, 3.0, 7.0];
    let y_axis = [0.0, 2.0, 4.0];

    let mut regular_blocks = vec![vec![1.0f32; 12]];
    let regular_refs = block_refs(&mut regular_blocks);
    let regular = RegularGrid::new(
        GridShape::new(vec![4, 3], vec![4, 3]),
        regular_refs,
        &[0.0, 0.0],
        &[3.0, 2.0],
    )
    .unwrap();

    let mut stretched_blocks = vec![vec![2.0f32; 12]];
    let stretched_refs = block_refs(&mut stretched_blocks);
    let stretched = StretchedGrid::new(
        GridShape::new(vec![4, 3], vec![4, 3]),
        stretched_refs,
        vec![&x_axis[..], &y_axis[..]],
    )
    .unwrap();

    let grids: Vec<AnyGrid> = vec![regular.into(), stretched.into()];
    for grid in &grids {
        assert!(grid.inside(&[0.5, 0.5]));
        let (min, max) = grid.range();
        assert_eq!(min, max);
        assert_eq!(grid.iter().count(), 12);
    }
    assert_eq!(grids[0].topology(), Topology::Regular);
    assert_eq!(grids[1].topology(), Topology::Stretched);
    assert_eq!(grids[0].value(&[0.5, 0.5]), 1.0);
    assert_eq!(grids[1].value(&[0.5, 0.5]), 2.0);
}

// =============================================================================
// Region-bounded iteration
// =============================================================================

#[test]
fn test_region_iteration_is_coordinate_bounded() {
    let x_axis = [0.0, 1.0, 3.0, 7.0];
    let y_axis = [0.0, 2.0, 4.0];
    let field = create_index_field(&[4, 3]);
    let mut blocks = partition_blocks(&field, &[4, 3], &[2, 2], 0.0);
    let refs = block_refs(&mut blocks);
    let grid = StretchedGrid::new(
        GridShape::new(vec![4, 3], vec![2, 2]),
        refs,
        vec![&x_axis[..], &y_axis[..]],
    )
    .unwrap();

    let bbox = BoundingBox::new([0.5, 0.0, 0.0], [3.5, 2.0, 0.0]);
    let items: Vec<_> = grid.iter_region(&bbox).collect();
    // Nodes with x in {1, 3} and y in {0, 2}.
    assert_eq!(items.len(), 4);
    for (index, value) in items {
        assert!((1..=2).contains(&index[0]));
        assert!(index[1] <= 1);
        assert_eq!(value, grid.value_at_index(&index[..2]));
    }
}

// =============================================================================
// Unstructured mesh driven through shared generators
// =============================================================================

#[test]
fn test_unstructured_end_to_end() {
    use grid_sampler::UnstructuredGrid2D;

    let (nx, ny) = (4usize, 3usize);
    let mesh = create_quad_mesh(nx, ny);
    let index = LinearScan::new(&mesh.x, &mesh.y).unwrap();

    // Per-vertex field equal to the x coordinate.
    let mut blocks = vec![mesh.x.iter().map(|&v| v as f32).collect::<Vec<f32>>()];
    let refs = block_refs(&mut blocks);
    let mut grid = UnstructuredGrid2D::new(
        GridShape::new(vec![nx * ny], vec![nx * ny]),
        refs,
        &mesh.x,
        &mesh.y,
        &mesh.vertex_on_face,
        &mesh.face_on_vertex,
        mesh.max_vertex_per_face,
        mesh.max_face_per_vertex,
        &index,
    )
    .unwrap();
    assert_eq!(grid.num_faces(), (nx - 1) * (ny - 1));

    // Linear interpolation over quad faces reproduces the ramp.
    for (px, py) in [(0.5, 0.5), (2.3, 1.7), (1.0, 0.25)] {
        let v = grid.value(&[px, py]);
        assert!((v - px as f32).abs() < 1e-5, "at ({px},{py})");
    }

    // Nearest order returns the stored vertex value at every node.
    grid.set_interpolation_order(InterpolationOrder::Nearest);
    for v in 0..nx * ny {
        let coords = grid.user_coordinates(&[v]).unwrap();
        assert_eq!(grid.value(&coords[..2]), grid.value_at_index(&[v]));
    }

    // Outside the mesh hull the sample is missing.
    assert!(!grid.inside(&[-0.5, 1.0]));
    assert_eq!(grid.value(&[-0.5, 1.0]), f32::INFINITY);
}

// =============================================================================
// Curvilinear grid driven through shared generators
// =============================================================================

#[test]
fn test_curvilinear_node_exact_sampling() {
    use grid_sampler::CurvilinearGrid;

    let (nx, ny, nz) = (4usize, 3usize, 2usize);
    let (x, y) = create_sheared_plane(nx, ny, 0.5);
    let z = [0.0, 50.0];
    let index = LinearScan::new(&x, &y).unwrap();

    let field = create_index_field(&[nx, ny, nz]);
    let mut blocks = partition_blocks(&field, &[nx, ny, nz], &[nx, ny, nz], 0.0);
    let refs = block_refs(&mut blocks);
    let mut grid = CurvilinearGrid::new(
        GridShape::new(vec![nx, ny, nz], vec![nx, ny, nz]),
        refs,
        &x,
        &y,
        &z,
        &index,
    )
    .unwrap();
    grid.set_interpolation_order(InterpolationOrder::Nearest);

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let coords = grid.user_coordinates(&[i, j, k]).unwrap();
                assert_eq!(grid.value(&coords), grid.value_at_index(&[i, j, k]));
            }
        }
    }
}
