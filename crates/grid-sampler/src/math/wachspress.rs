//! Wachspress generalized barycentric coordinates.
//!
//! Wachspress coordinates give well-defined interpolation weights for
//! convex polygons with any number of vertices, degrading to standard
//! barycentric weights for triangles and bilinear-equivalent weights for
//! quadrilaterals. Containment and weight computation share one routine:
//! a point is inside exactly when every edge triangle has non-negative
//! area, and the weights fall out of the same triangle areas.

/// Relative tolerance for the edge-area containment test.
const AREA_EPS: f64 = 1e-12;

/// Twice the signed area of the triangle `(a, b, c)`.
fn cross2(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Compute Wachspress coordinates of `point` with respect to a convex
/// polygon given as an ordered vertex ring.
///
/// Returns `Some(weights)` when the point lies inside (or on the boundary
/// of) the polygon; the weights are non-negative, sum to one, and
/// interpolate linearly along edges. Returns `None` when the point is
/// outside, or when the polygon has fewer than three vertices or zero
/// area. Either vertex winding is accepted.
pub fn wachspress_weights(polygon: &[[f64; 2]], point: [f64; 2]) -> Option<Vec<f64>> {
    let n = polygon.len();
    if n < 3 {
        return None;
    }

    // Shoelace area fixes the winding and sets the normalization scale.
    let mut area2 = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        area2 += a[0] * b[1] - a[1] * b[0];
    }
    if area2 == 0.0 {
        return None;
    }
    let orient = area2.signum();
    let scale = area2.abs();

    // Edge triangle areas (point, v_i, v_{i+1}), orientation-normalized.
    // Any negative area puts the point outside.
    let mut edge = vec![0.0; n];
    for i in 0..n {
        let a = orient * cross2(point, polygon[i], polygon[(i + 1) % n]) / scale;
        if a < -AREA_EPS {
            return None;
        }
        edge[i] = a.max(0.0);
    }

    // w_i = corner_i * prod of all edge areas not incident to vertex i.
    let mut weights = vec![0.0; n];
    let mut sum = 0.0;
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        let corner = orient * cross2(polygon[prev], polygon[i], polygon[next]) / scale;
        let mut w = corner;
        for (j, &a) in edge.iter().enumerate() {
            if j != prev && j != i {
                w *= a;
            }
        }
        weights[i] = w;
        sum += w;
    }

    if sum <= 0.0 {
        return None;
    }
    for w in &mut weights {
        *w /= sum;
    }
    Some(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_QUAD: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    #[test]
    fn test_interior_point_weights_partition_unity() {
        let w = wachspress_weights(&UNIT_QUAD, [0.3, 0.7]).unwrap();
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(w.iter().all(|&wi| (0.0..=1.0).contains(&wi)));
    }

    #[test]
    fn test_quad_center_is_equal_weights() {
        let w = wachspress_weights(&UNIT_QUAD, [0.5, 0.5]).unwrap();
        for wi in w {
            assert!((wi - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_quad_matches_bilinear() {
        let w = wachspress_weights(&UNIT_QUAD, [0.25, 0.75]).unwrap();
        // For an axis-aligned unit square the Wachspress weights reduce to
        // the bilinear corner weights.
        assert!((w[0] - 0.75 * 0.25).abs() < 1e-12);
        assert!((w[1] - 0.25 * 0.25).abs() < 1e-12);
        assert!((w[2] - 0.25 * 0.75).abs() < 1e-12);
        assert!((w[3] - 0.75 * 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_outside_point_rejected() {
        assert!(wachspress_weights(&UNIT_QUAD, [1.5, 0.5]).is_none());
        assert!(wachspress_weights(&UNIT_QUAD, [0.5, -0.1]).is_none());
    }

    #[test]
    fn test_vertex_point_collapses_to_vertex() {
        let w = wachspress_weights(&UNIT_QUAD, [1.0, 0.0]).unwrap();
        assert!((w[1] - 1.0).abs() < 1e-12);
        assert!(w[0].abs() < 1e-12 && w[2].abs() < 1e-12 && w[3].abs() < 1e-12);
    }

    #[test]
    fn test_edge_point_interpolates_endpoints() {
        let w = wachspress_weights(&UNIT_QUAD, [0.25, 0.0]).unwrap();
        assert!((w[0] - 0.75).abs() < 1e-12);
        assert!((w[1] - 0.25).abs() < 1e-12);
        assert!(w[2].abs() < 1e-12 && w[3].abs() < 1e-12);
    }

    #[test]
    fn test_clockwise_winding_accepted() {
        let cw: Vec<[f64; 2]> = UNIT_QUAD.iter().rev().copied().collect();
        let w = wachspress_weights(&cw, [0.5, 0.5]).unwrap();
        for wi in w {
            assert!((wi - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_irregular_pentagon() {
        let pentagon = [
            [0.0, 0.0],
            [2.0, 0.0],
            [3.0, 1.5],
            [1.0, 3.0],
            [-0.5, 1.0],
        ];
        let w = wachspress_weights(&pentagon, [1.0, 1.0]).unwrap();
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(w.iter().all(|&wi| wi > 0.0));
        assert!(wachspress_weights(&pentagon, [3.0, 3.0]).is_none());
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        assert!(wachspress_weights(&[[0.0, 0.0], [1.0, 0.0]], [0.5, 0.0]).is_none());
        let flat = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        assert!(wachspress_weights(&flat, [1.0, 0.0]).is_none());
    }
}
