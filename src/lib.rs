//! glyphroute - turns a piece of text into a real-world cycling route whose
//! shape on the map approximates the glyph outline.
//!
//! The pipeline extracts a simplified key-point skeleton from the glyph
//! outline, projects it into geographic space anchored at a start point,
//! fits the projection scale until the path length lands in the requested
//! range, and finally routes each leg through an external bicycling
//! direction service.

pub mod actions;
pub mod commands;
pub mod error;
pub mod font;
pub mod geometry;
pub mod outline;
pub mod routing;
pub mod track;
pub mod web;

pub use error::TrackError;
pub use track::{GeneratedTrack, TrackGenerator};
