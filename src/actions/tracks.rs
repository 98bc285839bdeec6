use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::{error_status, json_error};
use crate::error::TrackError;
use crate::geometry::GeoPoint;
use crate::geometry::fitter::LengthRange;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateTrackRequest {
    /// Missing text is treated as empty so it fails our validation with a
    /// 400 instead of a deserialization rejection.
    #[serde(default)]
    pub text: String,
    /// `[lng, lat]`, WGS84.
    #[serde(default)]
    pub start_point: Option<[f64; 2]>,
    /// `[min_m, max_m]`; wins over `distance` when both are present.
    #[serde(default)]
    pub length_range: Option<[f64; 2]>,
    /// Target distance in kilometers (legacy request variant).
    #[serde(default)]
    pub distance: Option<f64>,
}

struct TrackParams {
    start: Option<GeoPoint>,
    range: LengthRange,
}

fn validate(request: &GenerateTrackRequest) -> Result<TrackParams, TrackError> {
    if request.text.is_empty() {
        return Err(TrackError::Validation("text cannot be empty".to_string()));
    }

    let start = match request.start_point {
        Some([lng, lat]) => {
            if !(-180.0..=180.0).contains(&lng) || !(-90.0..=90.0).contains(&lat) {
                return Err(TrackError::Validation(
                    "start_point must be a [lng, lat] pair within bounds".to_string(),
                ));
            }
            Some(GeoPoint::new(lat, lng))
        }
        None => None,
    };

    let range = match (request.length_range, request.distance) {
        (Some([min_m, max_m]), _) => LengthRange::new(min_m, max_m)?,
        (None, Some(distance_km)) => {
            if !distance_km.is_finite() || distance_km <= 0.0 {
                return Err(TrackError::Validation(
                    "distance must be a positive number of kilometers".to_string(),
                ));
            }
            LengthRange::new(distance_km * 1000.0, distance_km * 1000.0)?
        }
        (None, None) => LengthRange::default(),
    };

    Ok(TrackParams { start, range })
}

fn lng_lat_pairs(points: &[GeoPoint]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.longitude, p.latitude]).collect()
}

/// `POST /generate_track` (alias `/generate_route`).
pub async fn generate_track(
    State(state): State<AppState>,
    Json(request): Json<GenerateTrackRequest>,
) -> impl IntoResponse {
    let params = match validate(&request) {
        Ok(params) => params,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };

    match state
        .generator
        .generate(&request.text, params.start, params.range)
        .await
    {
        Ok(generated) => Json(json!({
            "status": "success",
            "track": lng_lat_pairs(&generated.track),
            "key_points": lng_lat_pairs(&generated.key_points),
            "length_m": generated.length_m,
        }))
        .into_response(),
        Err(e) => {
            let status = error_status(&e);
            if status.is_server_error() {
                error!(error = %e, text = %request.text, "track generation failed");
            }
            json_error(status, &e.to_string()).into_response()
        }
    }
}
