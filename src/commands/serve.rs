use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::font::{FontStore, resolve_font_path};
use crate::routing::AmapClient;
use crate::track::TrackGenerator;
use crate::web;

pub async fn handle_serve(interface: String, port: u16, font: Option<PathBuf>) -> Result<()> {
    let font_path = resolve_font_path(font)?;
    let font = FontStore::load(&font_path)?;
    info!("Loaded font {}", font_path.display());

    let api_key =
        env::var("AMAP_KEY").context("AMAP_KEY must be set in environment variables")?;
    let amap = Arc::new(AmapClient::new(api_key)?);

    let generator = Arc::new(TrackGenerator::new(font, amap.clone(), amap));
    web::start_web_server(interface, port, generator).await
}
