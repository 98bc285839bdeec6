//! Request-level error taxonomy.
//!
//! Per-segment route planner failures are deliberately absent: they are
//! logged and the segment is skipped, degrading the track instead of
//! failing the request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    /// Bad request shape or values; rejected before any computation.
    #[error("{0}")]
    Validation(String),

    /// The font resource cannot be loaded or parsed.
    #[error("font resource unavailable: {0}")]
    Resource(String),

    /// The configured font has no usable glyph for the character.
    #[error("character {0:?} is not supported by the configured font")]
    GlyphNotFound(char),

    /// The coordinate system adapter returned no or invalid data.
    #[error("coordinate conversion failed: {0}")]
    Conversion(String),

    /// Every route segment failed, leaving nothing to assemble.
    #[error("generated track is empty")]
    EmptyTrack,
}
