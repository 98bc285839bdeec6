//! Track generation pipeline: glyph outline -> key points -> length fitting
//! -> coordinate conversion -> per-segment routing -> assembly.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::TrackError;
use crate::font::FontStore;
use crate::geometry::GeoPoint;
use crate::geometry::fitter::{self, LengthRange};
use crate::outline::{self, CapTable};
use crate::routing::{CoordinateConverter, RoutePlanner};

/// Everything the HTTP layer needs to answer a request.
#[derive(Debug)]
pub struct GeneratedTrack {
    /// The assembled navigable route.
    pub track: Vec<GeoPoint>,
    /// The fitted (and converted) key points the route was planned through.
    pub key_points: Vec<GeoPoint>,
    /// Great-circle length of the fitted key-point path, in meters.
    pub length_m: f64,
}

/// Owns the font and the external collaborators; shared immutably across
/// requests. Each request is one sequential computation.
pub struct TrackGenerator {
    font: FontStore,
    caps: CapTable,
    converter: Arc<dyn CoordinateConverter>,
    planner: Arc<dyn RoutePlanner>,
}

impl TrackGenerator {
    pub fn new(
        font: FontStore,
        converter: Arc<dyn CoordinateConverter>,
        planner: Arc<dyn RoutePlanner>,
    ) -> Self {
        Self {
            font,
            caps: CapTable::default(),
            converter,
            planner,
        }
    }

    /// Run the full pipeline for the first character of `text`.
    pub async fn generate(
        &self,
        text: &str,
        start: Option<GeoPoint>,
        range: LengthRange,
    ) -> Result<GeneratedTrack, TrackError> {
        let character = text
            .chars()
            .next()
            .ok_or_else(|| TrackError::Validation("text cannot be empty".to_string()))?;

        let key_points = outline::extract_key_points(&self.font, character, &self.caps)?;
        debug!(
            character = %character,
            key_points = key_points.len(),
            "reduced glyph outline"
        );

        let start = start.unwrap_or(fitter::DEFAULT_START);
        let fitted = fitter::fit_path(&key_points, start, range);
        info!(
            character = %character,
            length_m = fitted.length_m,
            scale = fitted.scale,
            "fitted glyph path"
        );

        let waypoints = self.converter.convert(&fitted.points).await?;
        let track = route_track(self.planner.as_ref(), &waypoints).await?;

        Ok(GeneratedTrack {
            track,
            key_points: waypoints,
            length_m: fitted.length_m,
        })
    }
}

/// Route each consecutive waypoint pair and stitch the polylines into one
/// track.
///
/// Segments are requested strictly in order; a failed or empty segment is
/// logged as a gap and skipped. Only when every segment fails does the
/// request fail.
pub async fn route_track(
    planner: &dyn RoutePlanner,
    waypoints: &[GeoPoint],
) -> Result<Vec<GeoPoint>, TrackError> {
    if waypoints.len() < 2 {
        return Err(TrackError::EmptyTrack);
    }

    let total = waypoints.len() - 1;
    let mut segments: Vec<Vec<GeoPoint>> = Vec::with_capacity(total);
    for (i, pair) in waypoints.windows(2).enumerate() {
        match planner.plan_segment(pair[0], pair[1]).await {
            Ok(polyline) if !polyline.is_empty() => {
                debug!(
                    segment = i + 1,
                    total,
                    vertices = polyline.len(),
                    "routed segment"
                );
                segments.push(polyline);
            }
            Ok(_) => {
                warn!(segment = i + 1, total, "empty polyline, skipping segment");
            }
            Err(e) => {
                warn!(segment = i + 1, total, error = %e, "route planning failed, skipping segment");
            }
        }
    }
    if segments.is_empty() {
        return Err(TrackError::EmptyTrack);
    }

    let mut track = assemble_track(&segments);
    // The planner snaps endpoints to the road network; make sure the track
    // still terminates at the true destination.
    let destination = waypoints[waypoints.len() - 1];
    if track.last() != Some(&destination) {
        track.push(destination);
    }
    info!(vertices = track.len(), "assembled track");
    Ok(track)
}

/// Stitch per-segment polylines into one continuous path, dropping the last
/// vertex of every segment except the final one so shared endpoints are not
/// duplicated.
pub fn assemble_track(segments: &[Vec<GeoPoint>]) -> Vec<GeoPoint> {
    let mut track = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if i + 1 == segments.len() {
            track.extend_from_slice(segment);
        } else {
            track.extend_from_slice(&segment[..segment.len() - 1]);
        }
    }
    track
}
