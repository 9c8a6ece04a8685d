//! Registry construction from static configuration.
//!
//! Two sources are supported:
//! - a JSON object mapping tag -> list of clip paths
//! - a clip folder whose files are named `<tag>_<n>.<ext>` (e.g. `water_0.mp3`)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::asset::AssetId;
use super::lookup::AssetRegistry;
use crate::error::{ErrorCode, Result, SoundscapeError};
use crate::tags::Tag;

/// File extensions treated as clips when scanning a folder.
pub const AUDIO_EXTENSIONS: [&str; 7] = ["mp3", "wav", "flac", "ogg", "oga", "m4a", "aac"];

impl AssetRegistry {
    /// Loads a registry from a JSON file.
    ///
    /// Relative clip paths are resolved against the file's directory.
    ///
    /// ```json
    /// { "water": ["sounds/water_0.mp3", "sounds/water_1.mp3"], "forest": ["sounds/forest_0.mp3"] }
    /// ```
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SoundscapeError::with_source(
                ErrorCode::RegistryLoadFailed,
                format!("Failed to read registry {}", path.display()),
                e,
            )
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let registry = Self::from_json_str(&content, base_dir)?;
        info!(
            path = %path.display(),
            tags = registry.len(),
            assets = registry.asset_count(),
            "Loaded tag registry"
        );
        Ok(registry)
    }

    /// Parses a registry from JSON text, resolving relative paths against `base_dir`.
    pub fn from_json_str(json: &str, base_dir: &Path) -> Result<Self> {
        let raw: BTreeMap<String, Vec<PathBuf>> = serde_json::from_str(json).map_err(|e| {
            SoundscapeError::with_source(
                ErrorCode::RegistryLoadFailed,
                "Registry must be a JSON object of tag -> list of clip paths",
                e,
            )
        })?;

        Self::from_entries(raw.into_iter().map(|(tag, paths)| {
            let assets: Vec<AssetId> = paths
                .into_iter()
                .map(|p| {
                    if p.is_relative() {
                        AssetId::new(base_dir.join(p))
                    } else {
                        AssetId::new(p)
                    }
                })
                .collect();
            (tag, assets)
        }))
    }

    /// Builds a registry by scanning a clip folder.
    ///
    /// `water_0.mp3` and `water_1.mp3` both register under `water`; a file
    /// without a numeric suffix registers under its whole stem. Files with
    /// other extensions and stems that are not valid tags are skipped.
    /// Clips under one tag are ordered by path.
    pub fn scan_directory(dir: &Path) -> Result<Self> {
        let read_dir = std::fs::read_dir(dir).map_err(|e| {
            SoundscapeError::with_source(
                ErrorCode::RegistryLoadFailed,
                format!("Failed to read clip folder {}", dir.display()),
                e,
            )
        })?;

        let mut grouped: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for entry in read_dir.flatten() {
            let path = entry.path();
            if !path.is_file() || !has_audio_extension(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let tag = tag_from_stem(stem);
            if Tag::new(tag).is_none() {
                debug!(file = %path.display(), "Skipping clip with unusable name");
                continue;
            }
            grouped.entry(tag.to_lowercase()).or_default().push(path);
        }

        for paths in grouped.values_mut() {
            paths.sort();
        }

        let registry = Self::from_entries(grouped)?;
        info!(
            dir = %dir.display(),
            tags = registry.len(),
            assets = registry.asset_count(),
            "Scanned clip folder"
        );
        Ok(registry)
    }
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strips a trailing `_<digits>` index from a clip file stem.
fn tag_from_stem(stem: &str) -> &str {
    match stem.rsplit_once('_') {
        Some((tag, index))
            if !tag.is_empty() && !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) =>
        {
            tag
        }
        _ => stem,
    }
}
