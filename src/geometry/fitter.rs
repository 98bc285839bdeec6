//! Geo projection and length fitting.
//!
//! Maps an ordered set of abstract glyph key points into geographic
//! coordinates anchored at a start point, then iteratively adjusts the
//! projection scale until the path's cumulative great-circle length falls
//! within the requested range. The correction multipliers and clamps are
//! empirically tuned; keep them in sync with the tests below when changing
//! anything here.

use tracing::{debug, warn};

use super::resample::resample;
use super::{GeoPoint, Point2, path_length_m};
use crate::error::TrackError;

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Fallback anchor when the caller supplies no start point (Beijing city center).
pub const DEFAULT_START: GeoPoint = GeoPoint {
    latitude: 39.90923,
    longitude: 116.397428,
};

/// Tolerance for classifying a key-point set as a vertical/horizontal stroke,
/// in abstract units.
const AXIS_TOLERANCE: f64 = 0.1;

/// Stop iterating once the achieved length is this close to the target.
const LENGTH_TOLERANCE_M: f64 = 100.0;

const MAX_ITERATIONS: usize = 10;

/// Clamp bounds for the initial degree-per-unit scale factor.
const MIN_SCALE: f64 = 0.0001;
const MAX_SCALE: f64 = 0.001;

/// Inclusive target band for the fitted path length, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthRange {
    pub min_m: f64,
    pub max_m: f64,
}

impl LengthRange {
    pub fn new(min_m: f64, max_m: f64) -> Result<Self, TrackError> {
        if !(min_m.is_finite() && max_m.is_finite()) || min_m <= 0.0 || max_m <= 0.0 {
            return Err(TrackError::Validation(
                "length_range values must be positive numbers".to_string(),
            ));
        }
        if min_m > max_m {
            return Err(TrackError::Validation(
                "length_range minimum must not exceed maximum".to_string(),
            ));
        }
        Ok(Self { min_m, max_m })
    }

    /// Midpoint of the range, used as the fitting target.
    pub fn target_m(&self) -> f64 {
        (self.min_m + self.max_m) / 2.0
    }

    pub fn contains(&self, length_m: f64) -> bool {
        length_m >= self.min_m && length_m <= self.max_m
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self {
            min_m: 5_000.0,
            max_m: 10_000.0,
        }
    }
}

/// Result of projecting key points into geographic space.
#[derive(Debug, Clone)]
pub struct FittedPath {
    /// Fitted geographic points; the head is always exactly the start point.
    pub points: Vec<GeoPoint>,
    /// Achieved great-circle length in meters.
    pub length_m: f64,
    /// Final degree-per-unit scale factor.
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokeAxis {
    Vertical,
    Horizontal,
}

/// Classify a key-point set as a pure vertical or horizontal stroke, if all
/// points share (within tolerance) the x or y coordinate of the first point.
fn classify_axis(points: &[Point2]) -> Option<StrokeAxis> {
    let first = points.first()?;
    if points.iter().all(|p| (p.x - first.x).abs() <= AXIS_TOLERANCE) {
        return Some(StrokeAxis::Vertical);
    }
    if points.iter().all(|p| (p.y - first.y).abs() <= AXIS_TOLERANCE) {
        return Some(StrokeAxis::Horizontal);
    }
    None
}

/// Synthesize a straight two-point path of `length_m` meters from `start`
/// along the given axis, using the local meters-per-degree approximation.
fn straight_path(start: GeoPoint, length_m: f64, axis: StrokeAxis) -> Vec<GeoPoint> {
    let end = match axis {
        StrokeAxis::Vertical => GeoPoint::new(
            start.latitude + length_m / METERS_PER_DEGREE,
            start.longitude,
        ),
        StrokeAxis::Horizontal => GeoPoint::new(
            start.latitude,
            start.longitude
                + length_m / (METERS_PER_DEGREE * start.latitude.to_radians().cos()),
        ),
    };
    vec![start, end]
}

/// Project abstract points into geographic space by scaling their offsets
/// from the first point. The y offset maps to a latitude delta directly; the
/// x offset maps to a longitude delta with the cosine-of-latitude correction.
fn project(points: &[Point2], start: GeoPoint, scale: f64) -> Vec<GeoPoint> {
    let origin = points[0];
    let cos_lat = start.latitude.to_radians().cos();
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i == 0 {
                start
            } else {
                GeoPoint::new(
                    start.latitude + (p.y - origin.y) * scale,
                    start.longitude + (p.x - origin.x) * scale / cos_lat,
                )
            }
        })
        .collect()
}

/// Fit a key-point set into geographic space anchored at `start` so the
/// path's great-circle length lands inside `range`.
///
/// Degenerate inputs (fewer than 2 points, all points coincident) are
/// recovered by a straight two-point path of the target length along the
/// latitude axis rather than failing the request.
pub fn fit_path(key_points: &[Point2], start: GeoPoint, range: LengthRange) -> FittedPath {
    let target = range.target_m();

    if key_points.len() < 2 {
        warn!(
            points = key_points.len(),
            "degenerate key-point set, falling back to a straight path"
        );
        return measure(straight_path(start, target, StrokeAxis::Vertical), 0.0);
    }

    if let Some(axis) = classify_axis(key_points) {
        debug!(?axis, target_m = target, "synthesizing straight stroke path");
        return measure(straight_path(start, target, axis), 0.0);
    }

    let working_count = (key_points.len() * 2).clamp(10, 15);
    let working = resample(key_points, working_count);

    let virtual_length: f64 = working
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum();
    if virtual_length <= f64::EPSILON {
        warn!("zero virtual length, falling back to a straight path");
        return measure(straight_path(start, target, StrokeAxis::Vertical), 0.0);
    }

    let mut scale = (target / (virtual_length * METERS_PER_DEGREE)).clamp(MIN_SCALE, MAX_SCALE);
    let mut path = project(&working, start, scale);
    let mut actual = path_length_m(&path);

    for iteration in 0..MAX_ITERATIONS {
        if (actual - target).abs() <= LENGTH_TOLERANCE_M || range.contains(actual) {
            break;
        }
        let factor = if actual < range.min_m {
            (1.05 + (range.min_m - actual) / (2.0 * target)).min(1.5)
        } else {
            (0.95 - (actual - range.max_m) / (2.0 * target)).max(0.5)
        };
        scale *= factor;
        path = project(&working, start, scale);
        actual = path_length_m(&path);
        debug!(
            iteration,
            factor,
            scale,
            actual_m = actual,
            "adjusted projection scale"
        );
    }

    // Deterministic final correction: never hand back a path over the cap.
    if actual > range.max_m {
        scale *= range.max_m / actual;
        path = project(&working, start, scale);
        actual = path_length_m(&path);
    }

    FittedPath {
        points: path,
        length_m: actual,
        scale,
    }
}

fn measure(points: Vec<GeoPoint>, scale: f64) -> FittedPath {
    let length_m = path_length_m(&points);
    FittedPath {
        points,
        length_m,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: GeoPoint = GeoPoint {
        latitude: 39.90923,
        longitude: 116.397428,
    };

    fn default_range() -> LengthRange {
        LengthRange::new(5_000.0, 10_000.0).unwrap()
    }

    /// A bent stroke that exercises the general fitting loop.
    fn bent_stroke() -> Vec<Point2> {
        vec![
            Point2::new(100.0, 100.0),
            Point2::new(400.0, 700.0),
            Point2::new(900.0, 650.0),
            Point2::new(950.0, 120.0),
        ]
    }

    #[test]
    fn horizontal_stroke_hits_target_midpoint() {
        let points = vec![Point2::new(100.0, 400.0), Point2::new(900.0, 400.0)];
        let fitted = fit_path(&points, START, default_range());
        assert_eq!(fitted.points.len(), 2);
        assert_eq!(fitted.points[0], START);
        // 7500m target, tolerance for the flat-earth approximation
        assert!(
            (fitted.length_m - 7_500.0).abs() < 100.0,
            "length {} not near midpoint",
            fitted.length_m
        );
        // Horizontal stroke moves along longitude only
        assert_eq!(fitted.points[1].latitude, START.latitude);
    }

    #[test]
    fn vertical_stroke_hits_target_midpoint() {
        let points = vec![Point2::new(400.0, 100.0), Point2::new(400.05, 900.0)];
        let fitted = fit_path(&points, START, default_range());
        assert_eq!(fitted.points.len(), 2);
        assert!((fitted.length_m - 7_500.0).abs() < 100.0);
        assert_eq!(fitted.points[1].longitude, START.longitude);
    }

    #[test]
    fn general_shape_lands_inside_range() {
        let fitted = fit_path(&bent_stroke(), START, default_range());
        let range = default_range();
        assert!(
            range.contains(fitted.length_m)
                || (fitted.length_m - range.target_m()).abs() <= 100.0,
            "length {} outside [5000, 10000]",
            fitted.length_m
        );
        assert_eq!(fitted.points.len(), 10);
    }

    #[test]
    fn head_is_exactly_the_start_point() {
        let fitted = fit_path(&bent_stroke(), START, default_range());
        assert_eq!(fitted.points[0], START);
    }

    #[test]
    fn fitting_is_deterministic() {
        let a = fit_path(&bent_stroke(), START, default_range());
        let b = fit_path(&bent_stroke(), START, default_range());
        assert_eq!(a.scale, b.scale);
        assert_eq!(a.points, b.points);
        assert_eq!(a.length_m, b.length_m);
    }

    #[test]
    fn collapsed_range_exits_cleanly_near_target() {
        // With min == max the feedback loop oscillates around the target and
        // may exhaust its iterations; it must still exit with a usable path.
        let range = LengthRange::new(5_000.0, 5_000.0).unwrap();
        let fitted = fit_path(&bent_stroke(), START, range);
        assert!(
            fitted.length_m > 4_000.0 && fitted.length_m < 6_000.0,
            "length {} drifted too far from the collapsed range",
            fitted.length_m
        );
        assert_eq!(fitted.points[0], START);
    }

    #[test]
    fn unreachable_target_exhausts_iterations_without_panicking() {
        // The 1.5x growth cap over 10 iterations cannot reach a 1e9m target
        // from the clamped initial scale.
        let range = LengthRange::new(1.0e9, 1.0e9).unwrap();
        let fitted = fit_path(&bent_stroke(), START, range);
        assert!(fitted.length_m < range.min_m);
        assert_eq!(fitted.points[0], START);
    }

    #[test]
    fn single_point_input_falls_back_to_straight_path() {
        let fitted = fit_path(&[Point2::new(5.0, 5.0)], START, default_range());
        assert_eq!(fitted.points.len(), 2);
        assert!((fitted.length_m - 7_500.0).abs() < 100.0);
    }

    #[test]
    fn coincident_points_fall_back_to_straight_path() {
        let p = Point2::new(3.0, 3.0);
        let fitted = fit_path(&[p, p, p], START, default_range());
        assert_eq!(fitted.points.len(), 2);
        assert!((fitted.length_m - 7_500.0).abs() < 100.0);
    }

    #[test]
    fn length_range_rejects_bad_values() {
        assert!(LengthRange::new(0.0, 100.0).is_err());
        assert!(LengthRange::new(-1.0, 100.0).is_err());
        assert!(LengthRange::new(200.0, 100.0).is_err());
        assert!(LengthRange::new(f64::NAN, 100.0).is_err());
    }
}
