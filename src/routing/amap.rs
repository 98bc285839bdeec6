//! AMap REST API client: bicycling directions and WGS84 -> GCJ-02 batch
//! coordinate conversion.

use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{CoordinateConverter, RoutePlanner};
use crate::error::TrackError;
use crate::geometry::GeoPoint;

const DEFAULT_BASE_URL: &str = "https://restapi.amap.com";

/// Per-call timeout; a timed-out segment is a skipped segment, not a fatal
/// error, so this stays short.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Bicycling direction API (v4) response structure
#[derive(Debug, Deserialize)]
struct BicyclingResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: Option<String>,
    #[serde(default)]
    data: Option<BicyclingData>,
}

#[derive(Debug, Deserialize)]
struct BicyclingData {
    #[serde(default)]
    paths: Vec<BicyclingPath>,
}

#[derive(Debug, Deserialize)]
struct BicyclingPath {
    #[serde(default)]
    steps: Vec<BicyclingStep>,
}

#[derive(Debug, Deserialize)]
struct BicyclingStep {
    #[serde(default)]
    polyline: String,
}

// Coordinate conversion API (v3) response structure
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    status: String,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    locations: Option<String>,
}

#[derive(Clone)]
pub struct AmapClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AmapClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        })
    }

    /// Point to a different API host (local mock servers in tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

/// AMap expects and returns `lng,lat` ordered pairs.
fn format_lng_lat(point: &GeoPoint) -> String {
    format!("{:.6},{:.6}", point.longitude, point.latitude)
}

/// Parse a `lng,lat;lng,lat;...` polyline string.
fn parse_polyline(raw: &str) -> Result<Vec<GeoPoint>> {
    raw.split(';')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            let (lng, lat) = pair
                .split_once(',')
                .ok_or_else(|| anyhow!("malformed polyline vertex: {pair:?}"))?;
            Ok(GeoPoint::new(lat.trim().parse()?, lng.trim().parse()?))
        })
        .collect()
}

#[async_trait]
impl RoutePlanner for AmapClient {
    async fn plan_segment(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>> {
        let url = format!("{}/v4/direction/bicycling", self.base_url);
        let params = [
            ("origin", format_lng_lat(&origin)),
            ("destination", format_lng_lat(&destination)),
            ("key", self.api_key.clone()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            bail!("bicycling API returned HTTP {}", response.status());
        }

        let body: BicyclingResponse = response.json().await?;
        if body.errcode != 0 {
            bail!(
                "bicycling API error {}: {}",
                body.errcode,
                body.errmsg.unwrap_or_default()
            );
        }
        let path = body
            .data
            .and_then(|data| data.paths.into_iter().next())
            .ok_or_else(|| anyhow!("bicycling API returned no paths"))?;

        let mut polyline: Vec<GeoPoint> = Vec::new();
        for step in &path.steps {
            for point in parse_polyline(&step.polyline)? {
                // Steps share boundary vertices
                if polyline.last() != Some(&point) {
                    polyline.push(point);
                }
            }
        }
        debug!(vertices = polyline.len(), "planned bicycling segment");
        Ok(polyline)
    }
}

#[async_trait]
impl CoordinateConverter for AmapClient {
    async fn convert(&self, points: &[GeoPoint]) -> Result<Vec<GeoPoint>, TrackError> {
        let locations = points
            .iter()
            .map(format_lng_lat)
            .collect::<Vec<_>>()
            .join(";");
        let url = format!("{}/v3/assistant/coordinate/convert", self.base_url);
        let params = [
            ("locations", locations),
            ("coordsys", "gps".to_string()),
            ("key", self.api_key.clone()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| TrackError::Conversion(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TrackError::Conversion(format!(
                "conversion API returned HTTP {}",
                response.status()
            )));
        }

        let body: ConvertResponse = response
            .json()
            .await
            .map_err(|e| TrackError::Conversion(e.to_string()))?;
        if body.status != "1" {
            return Err(TrackError::Conversion(format!(
                "conversion API rejected the request: {}",
                body.info.unwrap_or_default()
            )));
        }
        let raw = body
            .locations
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                TrackError::Conversion("conversion API returned no locations".to_string())
            })?;

        let converted =
            parse_polyline(&raw).map_err(|e| TrackError::Conversion(e.to_string()))?;
        if converted.len() != points.len() {
            return Err(TrackError::Conversion(format!(
                "conversion API returned {} points for {} inputs",
                converted.len(),
                points.len()
            )));
        }
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_parsing_round_trips_pairs() {
        let points = parse_polyline("116.397428,39.90923;116.41,39.91").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], GeoPoint::new(39.90923, 116.397428));
        assert_eq!(points[1], GeoPoint::new(39.91, 116.41));
    }

    #[test]
    fn polyline_parsing_skips_empty_fragments() {
        let points = parse_polyline("116.4,39.9;;116.5,39.8;").unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn polyline_parsing_rejects_malformed_vertices() {
        assert!(parse_polyline("116.4").is_err());
        assert!(parse_polyline("not,numbers").is_err());
    }

    #[test]
    fn lng_lat_formatting_matches_api_order() {
        let p = GeoPoint::new(39.90923, 116.397428);
        assert_eq!(format_lng_lat(&p), "116.397428,39.909230");
    }
}
