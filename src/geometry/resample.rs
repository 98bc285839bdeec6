//! Index-parametrized linear resampling of point sequences.
//!
//! The input is parametrized by index position normalized to [0, 1] and
//! resampled at evenly spaced parameter values. This preserves index-order
//! density, not arc length, which is good enough to smooth local noise in a
//! glyph skeleton without changing its overall shape.

use super::Point2;

/// Resample an ordered point sequence to exactly `n` points.
///
/// Inputs with fewer than 2 points (or a target below 2) are returned
/// unchanged. The first and last input points are always preserved exactly.
pub fn resample(points: &[Point2], n: usize) -> Vec<Point2> {
    if points.len() < 2 || n < 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    (0..n)
        .map(|i| {
            if i == 0 {
                return points[0];
            }
            if i == n - 1 {
                return points[last];
            }
            let pos = i as f64 / (n - 1) as f64 * last as f64;
            let idx = (pos.floor() as usize).min(last - 1);
            let frac = pos - idx as f64;
            let a = points[idx];
            let b = points[idx + 1];
            Point2::new(a.x + (b.x - a.x) * frac, a.y + (b.y - a.y) * frac)
        })
        .collect()
}
