//! End-to-end pipeline tests with stubbed routing collaborators: fit a
//! glyph skeleton, convert, route each leg, and assemble the track.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use glyphroute::TrackError;
use glyphroute::geometry::fitter::{DEFAULT_START, LengthRange, fit_path};
use glyphroute::geometry::{GeoPoint, Point2, path_length_m};
use glyphroute::routing::RoutePlanner;
use glyphroute::track::route_track;

/// Routes every segment as origin -> midpoint -> destination.
struct StraightPlanner;

#[async_trait]
impl RoutePlanner for StraightPlanner {
    async fn plan_segment(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>> {
        let mid = GeoPoint::new(
            (origin.latitude + destination.latitude) / 2.0,
            (origin.longitude + destination.longitude) / 2.0,
        );
        Ok(vec![origin, mid, destination])
    }
}

/// Returns an empty polyline for one segment (by request order), routing the
/// rest normally.
struct GapPlanner {
    skip_index: usize,
    calls: AtomicUsize,
    inner: StraightPlanner,
}

impl GapPlanner {
    fn new(skip_index: usize) -> Self {
        Self {
            skip_index,
            calls: AtomicUsize::new(0),
            inner: StraightPlanner,
        }
    }
}

#[async_trait]
impl RoutePlanner for GapPlanner {
    async fn plan_segment(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if index == self.skip_index {
            return Ok(Vec::new());
        }
        self.inner.plan_segment(origin, destination).await
    }
}

/// Always fails.
struct DeadPlanner;

#[async_trait]
impl RoutePlanner for DeadPlanner {
    async fn plan_segment(&self, _: GeoPoint, _: GeoPoint) -> Result<Vec<GeoPoint>> {
        anyhow::bail!("routing backend unreachable")
    }
}

/// Key points of a single horizontal stroke, as the outline reducer emits
/// them for a character like "一".
fn horizontal_stroke() -> Vec<Point2> {
    vec![Point2::new(100.0, 400.0), Point2::new(900.0, 400.0)]
}

/// A bent multi-segment shape that takes the general fitting path.
fn hook_stroke() -> Vec<Point2> {
    vec![
        Point2::new(100.0, 800.0),
        Point2::new(500.0, 820.0),
        Point2::new(520.0, 300.0),
        Point2::new(150.0, 100.0),
    ]
}

#[tokio::test]
async fn horizontal_stroke_becomes_a_two_point_track_in_range() {
    let start = GeoPoint::new(39.90923, 116.397428);
    let range = LengthRange::new(5000.0, 10000.0).unwrap();

    let fitted = fit_path(&horizontal_stroke(), start, range);
    assert_eq!(fitted.points.len(), 2, "straight stroke stays two points");
    assert_eq!(fitted.points[0], start);

    let distance = fitted.points[0].distance_to(&fitted.points[1]);
    assert!(
        (5000.0..=10000.0).contains(&distance),
        "great-circle distance {distance} outside requested range"
    );

    let track = route_track(&StraightPlanner, &fitted.points).await.unwrap();
    assert_eq!(track.first(), Some(&start));
    assert_eq!(track.last(), Some(&fitted.points[1]));
}

#[tokio::test]
async fn general_shape_routes_every_consecutive_pair() {
    let range = LengthRange::new(5000.0, 10000.0).unwrap();
    let fitted = fit_path(&hook_stroke(), DEFAULT_START, range);
    assert!(fitted.points.len() >= 10);

    let track = route_track(&StraightPlanner, &fitted.points).await.unwrap();
    // Each of the n-1 segments contributes 2 vertices after boundary
    // deduplication, plus the final destination.
    assert_eq!(track.len(), (fitted.points.len() - 1) * 2 + 1);
    assert_eq!(track.last(), Some(&fitted.points[fitted.points.len() - 1]));
    assert!(path_length_m(&track) > 0.0);
}

#[tokio::test]
async fn one_failed_segment_leaves_a_gap_not_an_error() {
    let range = LengthRange::new(5000.0, 10000.0).unwrap();
    let fitted = fit_path(&hook_stroke(), DEFAULT_START, range);
    let segment_count = fitted.points.len() - 1;

    let planner = GapPlanner::new(1);
    let track = route_track(&planner, &fitted.points).await.unwrap();

    let full = route_track(&StraightPlanner, &fitted.points).await.unwrap();
    assert!(track.len() < full.len(), "gap should shorten the track");
    assert_eq!(track.last(), Some(&fitted.points[fitted.points.len() - 1]));
    assert_eq!(planner.calls.load(Ordering::SeqCst), segment_count);
}

#[tokio::test]
async fn all_segments_failing_is_an_empty_track_error() {
    let waypoints = [
        GeoPoint::new(39.90, 116.40),
        GeoPoint::new(39.91, 116.41),
        GeoPoint::new(39.92, 116.42),
    ];
    let result = route_track(&DeadPlanner, &waypoints).await;
    assert!(matches!(result, Err(TrackError::EmptyTrack)));
}

#[tokio::test]
async fn degenerate_waypoint_list_is_an_empty_track_error() {
    let result = route_track(&StraightPlanner, &[GeoPoint::new(39.9, 116.4)]).await;
    assert!(matches!(result, Err(TrackError::EmptyTrack)));
}

#[tokio::test]
async fn failed_final_segment_still_terminates_at_destination() {
    let waypoints = [
        GeoPoint::new(39.90, 116.40),
        GeoPoint::new(39.91, 116.41),
        GeoPoint::new(39.92, 116.42),
    ];
    let planner = GapPlanner::new(1); // drop the last of the two segments
    let track = route_track(&planner, &waypoints).await.unwrap();
    assert_eq!(track.last(), Some(&waypoints[2]));
}
