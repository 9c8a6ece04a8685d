//! End-to-end soundscape construction.
//!
//! Takes tags (or a caption) through resolution, loading, mixing and
//! export, returning the encoded audio with its metadata.

use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use super::input::TagInput;
use crate::audio::{encode, ExportFormat};
use crate::config::EngineConfig;
use crate::error::{Result, SoundscapeError};
use crate::loader::AssetLoader;
use crate::mixer::{FillPolicy, MixMode, MixRequest, SoundscapeMixer};
use crate::registry::{AssetId, AssetRegistry};
use crate::tags::{extract_tags_with, PunctuationPolicy, TagSet};
use crate::types::{compute_soundscape_id, Soundscape};

/// Encoded soundscape audio plus the metadata describing it.
#[derive(Debug, Clone)]
pub struct SoundscapeOutput {
    /// Encoded audio file contents.
    pub bytes: Vec<u8>,
    /// What went into the mix.
    pub soundscape: Soundscape,
}

/// A caption-to-soundscape pipeline over a shared, read-only registry.
///
/// Cloning is cheap: clones share the registry and the loader's permit pool,
/// so one pipeline can serve many concurrent requests.
#[derive(Debug, Clone)]
pub struct Pipeline {
    registry: Arc<AssetRegistry>,
    loader: AssetLoader,
    mixer: SoundscapeMixer,
    export_format: ExportFormat,
    punctuation: PunctuationPolicy,
}

impl Pipeline {
    /// Creates a pipeline with default fill policy, export format and punctuation handling.
    pub fn new(registry: Arc<AssetRegistry>, loader: AssetLoader) -> Self {
        Self {
            registry,
            loader,
            mixer: SoundscapeMixer::default(),
            export_format: ExportFormat::default(),
            punctuation: PunctuationPolicy::default(),
        }
    }

    /// Creates a pipeline configured from `config`.
    pub fn from_config(config: &EngineConfig, registry: Arc<AssetRegistry>) -> Self {
        Self::new(registry, AssetLoader::new(config.loader_config()))
            .with_fill_policy(config.fill_policy)
            .with_export_format(config.export_format)
            .with_punctuation(config.punctuation)
    }

    /// Sets the policy for output shorter than the target.
    pub fn with_fill_policy(mut self, fill: FillPolicy) -> Self {
        self.mixer = SoundscapeMixer::new(fill);
        self
    }

    /// Sets the export sample encoding.
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    /// Sets how punctuation in captions is treated.
    pub fn with_punctuation(mut self, punctuation: PunctuationPolicy) -> Self {
        self.punctuation = punctuation;
        self
    }

    /// Returns the registry.
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Extracts tags from caption text.
    pub fn extract_tags(&self, caption: &str) -> TagSet {
        extract_tags_with(caption, self.punctuation)
    }

    /// Extracts tags from `caption` and builds a soundscape from them.
    pub async fn build_from_caption(
        &self,
        caption: &str,
        mode: MixMode,
        target_duration_ms: u64,
    ) -> Result<SoundscapeOutput> {
        let tags = self.extract_tags(caption);
        self.build_soundscape(tags, mode, target_duration_ms).await
    }

    /// Builds a soundscape from tags.
    ///
    /// Clips that fail to load are skipped and listed in the metadata; the
    /// build only fails when none load.
    ///
    /// # Errors
    ///
    /// - `EMPTY_TAG_SET` if no tags were supplied
    /// - `INVALID_DURATION` if `target_duration_ms` is zero
    /// - `NO_ASSETS_RESOLVED` if no tag has a registry entry
    /// - `NO_ASSETS_LOADED` if every resolved clip failed to load
    /// - `ENCODING_FAILURE` if the mix could not be encoded
    pub async fn build_soundscape(
        &self,
        input: impl Into<TagInput>,
        mode: MixMode,
        target_duration_ms: u64,
    ) -> Result<SoundscapeOutput> {
        // Step 1: Normalize the tag input
        let tags = input.into().into_tag_set()?;

        // Step 2: Resolve tags to clips
        let unresolved: Vec<String> = self
            .registry
            .missing_tags(&tags)
            .iter()
            .map(|t| t.to_string())
            .collect();
        let assets = self.registry.resolve_all(&tags);
        if !unresolved.is_empty() {
            warn!(unresolved = ?unresolved, "Tags have no registry entry");
        }
        if assets.is_empty() {
            return Err(SoundscapeError::no_assets_resolved(&tags.to_strings()));
        }
        let request = MixRequest::new(assets, mode, target_duration_ms)?;
        debug!(tags = %tags, clips = request.assets.len(), "Resolved tags");

        // Step 3: Load clips, tolerating individual failures
        let outcome = self.loader.load(&request.assets).await.require_any()?;
        let included: Vec<AssetId> = outcome.buffers.keys().cloned().collect();
        let failed = outcome.failures;
        let buffers = outcome.buffers;

        // Step 4: Mix and encode off the async runtime
        let mixer = self.mixer;
        let format = self.export_format;
        let mix_mode = request.mode;
        let target = request.target_duration;
        let (mixed, bytes) = tokio::task::spawn_blocking(move || {
            let mixed = mixer.mix(&buffers, mix_mode, target)?;
            let bytes = encode(&mixed, format)?;
            Ok::<_, SoundscapeError>((mixed, bytes))
        })
        .await
        .map_err(|e| SoundscapeError::encoding_failure(format!("mix task failed: {}", e)))??;

        let soundscape = Soundscape {
            soundscape_id: compute_soundscape_id(
                &included,
                mode,
                self.mixer.fill_policy(),
                request.target_duration_ms(),
            ),
            path: None,
            tags: tags.to_strings(),
            unresolved_tags: unresolved,
            included_assets: included,
            failed_assets: failed,
            mode,
            fill_policy: self.mixer.fill_policy(),
            target_duration_ms: request.target_duration_ms(),
            duration_ms: mixed.duration_ms(),
            sample_rate: mixed.sample_rate,
            channels: mixed.channels,
            export_format: format,
            created_at: SystemTime::now(),
        };

        info!(
            soundscape_id = %soundscape.soundscape_id,
            mode = mode.as_str(),
            included = soundscape.included_assets.len(),
            failed = soundscape.failed_assets.len(),
            duration_ms = soundscape.duration_ms,
            bytes = bytes.len(),
            "Built soundscape"
        );

        Ok(SoundscapeOutput { bytes, soundscape })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::loader::LoaderConfig;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::path::Path;
    use tempfile::tempdir;

    const RATE: u32 = 8000;

    fn write_clip(path: &Path, frames: usize, value: f32) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: RATE,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn pipeline(registry: AssetRegistry) -> Pipeline {
        let loader = AssetLoader::new(LoaderConfig {
            sample_rate: RATE,
            channels: 1,
            max_concurrent: 2,
        });
        Pipeline::new(Arc::new(registry), loader).with_export_format(ExportFormat::Float32)
    }

    #[tokio::test]
    async fn caption_builds_overlay() {
        let dir = tempdir().unwrap();
        let rain = dir.path().join("rain_0.wav");
        let wind = dir.path().join("wind_0.wav");
        write_clip(&rain, RATE as usize, 0.25);
        write_clip(&wind, RATE as usize / 2, 0.25);

        let registry = AssetRegistry::scan_directory(dir.path()).unwrap();
        let out = pipeline(registry)
            .build_from_caption("the rain and the wind", MixMode::Overlay, 5_000)
            .await
            .unwrap();

        let scape = &out.soundscape;
        assert_eq!(scape.tags, vec!["rain", "wind"]);
        assert_eq!(scape.included_assets.len(), 2);
        assert_eq!(scape.duration_ms, 1_000);
        assert!(scape.validate().is_none());
        assert_eq!(&out.bytes[0..4], b"RIFF");
    }

    #[tokio::test]
    async fn unknown_tags_are_no_assets_resolved() {
        let registry = AssetRegistry::from_entries([("water", vec!["water_0.wav"])]).unwrap();
        let err = pipeline(registry)
            .build_soundscape("lava,snow", MixMode::Overlay, 15_000)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoAssetsResolved);
    }

    #[tokio::test]
    async fn all_clips_missing_is_no_assets_loaded() {
        let registry =
            AssetRegistry::from_entries([("water", vec!["/missing/water_0.wav"])]).unwrap();
        let err = pipeline(registry)
            .build_soundscape("water", MixMode::Overlay, 15_000)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoAssetsLoaded);
    }

    #[tokio::test]
    async fn empty_caption_is_empty_tag_set() {
        let registry = AssetRegistry::default();
        let err = pipeline(registry)
            .build_from_caption("the of and", MixMode::Overlay, 15_000)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyTagSet);
    }

    #[tokio::test]
    async fn zero_duration_is_invalid() {
        let registry = AssetRegistry::from_entries([("water", vec!["water_0.wav"])]).unwrap();
        let err = pipeline(registry)
            .build_soundscape("water", MixMode::Overlay, 0)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDuration);
    }

    #[tokio::test]
    async fn strip_policy_matches_punctuated_caption() {
        let dir = tempdir().unwrap();
        write_clip(&dir.path().join("river_0.wav"), 800, 0.1);
        let registry = AssetRegistry::scan_directory(dir.path()).unwrap();

        let strict = pipeline(registry.clone());
        assert_eq!(
            strict.build_from_caption("river.", MixMode::Overlay, 1_000).await.unwrap_err().code,
            ErrorCode::NoAssetsResolved
        );

        let lenient = pipeline(registry).with_punctuation(PunctuationPolicy::Strip);
        let out = lenient
            .build_from_caption("river.", MixMode::Overlay, 1_000)
            .await
            .unwrap();
        assert_eq!(out.soundscape.tags, vec!["river"]);
    }
}
