pub mod status;
pub mod tracks;

pub use status::*;
pub use tracks::*;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::error::TrackError;

/// Build a structured JSON error response.
pub fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(json!({ "status": "error", "message": message })),
    )
}

/// Map a request failure to its HTTP status code.
pub fn error_status(error: &TrackError) -> StatusCode {
    match error {
        TrackError::Validation(_) | TrackError::GlyphNotFound(_) => StatusCode::BAD_REQUEST,
        TrackError::Conversion(_) => StatusCode::BAD_GATEWAY,
        TrackError::Resource(_) | TrackError::EmptyTrack => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
