//! External routing and coordinate-system collaborators.
//!
//! Both seams are trait objects so the pipeline can be exercised with
//! stubbed implementations in tests.

pub mod amap;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::TrackError;
use crate::geometry::GeoPoint;

pub use amap::AmapClient;

/// Plans a navigable route between two geographic points.
///
/// An error or an empty polyline marks the segment as failed; the caller
/// skips it and keeps going rather than aborting the request.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    async fn plan_segment(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>>;
}

/// Converts an ordered batch of WGS84 points into the map provider's native
/// coordinate system. A failed or short response is fatal for the request.
#[async_trait]
pub trait CoordinateConverter: Send + Sync {
    async fn convert(&self, points: &[GeoPoint]) -> Result<Vec<GeoPoint>, TrackError>;
}
