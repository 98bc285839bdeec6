use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde_json::json;

use crate::font::{FontStore, resolve_font_path};
use crate::geometry::GeoPoint;
use crate::geometry::fitter::{self, LengthRange};
use crate::outline::{self, CapTable};

/// Offline preview: extract a character's key points, run the length fitter,
/// and print the fitted WGS84 path as JSON. No network calls are made.
pub fn handle_fit(
    character: char,
    start: Option<String>,
    min_m: f64,
    max_m: f64,
    font: Option<PathBuf>,
) -> Result<()> {
    let font = FontStore::load(&resolve_font_path(font)?)?;
    let range = LengthRange::new(min_m, max_m)?;
    let start = match start {
        Some(raw) => parse_lng_lat(&raw)?,
        None => fitter::DEFAULT_START,
    };

    let key_points = outline::extract_key_points(&font, character, &CapTable::default())?;
    let fitted = fitter::fit_path(&key_points, start, range);

    let report = json!({
        "character": character.to_string(),
        "key_points": key_points.len(),
        "length_m": fitted.length_m,
        "scale": fitted.scale,
        "path": fitted
            .points
            .iter()
            .map(|p| [p.longitude, p.latitude])
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_lng_lat(raw: &str) -> Result<GeoPoint> {
    let Some((lng, lat)) = raw.split_once(',') else {
        bail!("start point must be formatted as lng,lat");
    };
    let lng: f64 = lng.trim().parse().context("invalid longitude")?;
    let lat: f64 = lat.trim().parse().context("invalid latitude")?;
    Ok(GeoPoint::new(lat, lng))
}
