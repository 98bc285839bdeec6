//! Font resource loading.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use ttf_parser::Face;

use crate::error::TrackError;

/// Environment variable naming the TrueType/OpenType font file to use.
pub const FONT_PATH_ENV: &str = "GLYPHROUTE_FONT";

/// Owned font bytes shared across requests.
///
/// `ttf_parser::Face` borrows the underlying data, so each request parses its
/// own short-lived `Face` from the shared bytes. Parsing is a cheap header
/// scan, not a full font decode.
#[derive(Clone)]
pub struct FontStore {
    path: PathBuf,
    data: Arc<Vec<u8>>,
}

impl FontStore {
    /// Read and validate a font file. A font that fails to parse or lacks a
    /// character map is rejected here so bad configuration fails at startup,
    /// not on the first request.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read font file {}", path.display()))?;
        let face = Face::parse(&data, 0)
            .map_err(|e| anyhow::anyhow!("failed to parse font {}: {e}", path.display()))?;
        if face.tables().cmap.is_none() {
            bail!("font {} lacks a character map", path.display());
        }
        Ok(Self {
            path: path.to_path_buf(),
            data: Arc::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a face over the shared bytes for the duration of one request.
    pub fn face(&self) -> Result<Face<'_>, TrackError> {
        Face::parse(&self.data, 0).map_err(|e| {
            TrackError::Resource(format!(
                "failed to parse font {}: {e}",
                self.path.display()
            ))
        })
    }
}

/// Resolve the font path from a CLI flag, falling back to the environment.
pub fn resolve_font_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match env::var(FONT_PATH_ENV) {
        Ok(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => bail!("no font configured: pass --font or set {FONT_PATH_ENV}"),
    }
}
