//! Bracketing binary search on a monotone coordinate axis.

/// Locate the bracketing interval of `x` in a monotone non-decreasing
/// coordinate array.
///
/// Returns `Some((i, w))` with `coords[i] <= x <= coords[i + 1]` and `w`
/// the linear fraction of `x` between the bracketing pair, or `None` when
/// `x` falls outside the array's range. A single-entry axis brackets only
/// its exact coordinate. Equal-neighbor plateaus collapse deterministically
/// to the lower bracket index with weight zero.
pub fn bracket(coords: &[f64], x: f64) -> Option<(usize, f64)> {
    let n = coords.len();
    if n == 0 || x < coords[0] || x > coords[n - 1] {
        return None;
    }
    if n == 1 {
        return Some((0, 0.0));
    }

    let i = coords
        .partition_point(|&c| c <= x)
        .saturating_sub(1)
        .min(n - 2);

    let span = coords[i + 1] - coords[i];
    let w = if span > 0.0 { (x - coords[i]) / span } else { 0.0 };
    Some((i, w))
}
