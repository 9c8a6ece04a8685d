//! Engine configuration module.
//!
//! Contains the runtime configuration for the soundscape engine: where the
//! registry and clips live, where soundscapes are written, and the default
//! mix parameters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use tracing::info;

use crate::audio::{ExportFormat, MP3_SAMPLE_RATES};
use crate::error::Result;
use crate::loader::{LoaderConfig, DEFAULT_MAX_CONCURRENT_LOADS};
use crate::mixer::{FillPolicy, MixMode, MAX_TARGET_DURATION_MS};
use crate::registry::AssetRegistry;
use crate::tags::PunctuationPolicy;

/// Default soundscape length in milliseconds.
pub const DEFAULT_TARGET_DURATION_MS: u64 = 15_000;

/// Runtime configuration for the engine.
///
/// This configuration is typically loaded from environment variables at
/// startup and then overridden by command-line arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to a JSON registry file (tag -> list of clip paths).
    /// If None, the registry is built by scanning the clip directory.
    pub registry_path: Option<PathBuf>,

    /// Directory of clips named `<tag>_<n>.<ext>`.
    /// If None, uses the platform-specific default data location.
    pub asset_dir: Option<PathBuf>,

    /// Directory for exported soundscapes.
    /// If None, uses the platform-specific default data location.
    pub output_dir: Option<PathBuf>,

    /// Default combination mode.
    pub mode: MixMode,

    /// Default target duration in milliseconds.
    pub target_duration_ms: u64,

    /// What to do when the mix is shorter than the target.
    pub fill_policy: FillPolicy,

    /// Output sample rate in Hz. Every clip is conformed to it.
    pub sample_rate: u32,

    /// Output channel count.
    pub channels: u16,

    /// Maximum clips decoded at once.
    pub max_concurrent_loads: usize,

    /// Encoding of exported soundscapes.
    pub export_format: ExportFormat,

    /// Punctuation handling during tag extraction.
    pub punctuation: PunctuationPolicy,
}

impl EngineConfig {
    /// Creates a new EngineConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an EngineConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SOUNDSCAPE_REGISTRY_PATH` - JSON registry file
    /// - `SOUNDSCAPE_ASSET_DIR` - Clip directory
    /// - `SOUNDSCAPE_OUTPUT_DIR` - Output directory
    /// - `SOUNDSCAPE_MODE` - Combination mode (overlay, concatenate)
    /// - `SOUNDSCAPE_DURATION_MS` - Target duration in milliseconds
    /// - `SOUNDSCAPE_FILL_POLICY` - Fill policy (truncate_only, pad_with_silence, loop_to_fill)
    /// - `SOUNDSCAPE_SAMPLE_RATE` - Output sample rate
    /// - `SOUNDSCAPE_CHANNELS` - Output channel count
    /// - `SOUNDSCAPE_MAX_LOADS` - Concurrent clip loads
    /// - `SOUNDSCAPE_EXPORT_FORMAT` - Output encoding (mp3, pcm16, float32)
    /// - `SOUNDSCAPE_STRIP_PUNCTUATION` - Strip punctuation from caption words (true/false)
    ///
    /// Falls back to defaults for unset or invalid variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates an EngineConfig reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("SOUNDSCAPE_REGISTRY_PATH") {
            config.registry_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("SOUNDSCAPE_ASSET_DIR") {
            config.asset_dir = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("SOUNDSCAPE_OUTPUT_DIR") {
            config.output_dir = Some(PathBuf::from(path));
        }

        if let Some(mode) = lookup("SOUNDSCAPE_MODE").and_then(|s| MixMode::parse(&s).ok()) {
            config.mode = mode;
        }

        if let Some(ms) = lookup("SOUNDSCAPE_DURATION_MS").and_then(|s| s.parse::<u64>().ok()) {
            if ms > 0 && ms <= MAX_TARGET_DURATION_MS {
                config.target_duration_ms = ms;
            }
        }

        if let Some(fill) = lookup("SOUNDSCAPE_FILL_POLICY").and_then(|s| FillPolicy::parse(&s)) {
            config.fill_policy = fill;
        }

        if let Some(rate) = lookup("SOUNDSCAPE_SAMPLE_RATE").and_then(|s| s.parse::<u32>().ok()) {
            if (8_000..=192_000).contains(&rate) {
                config.sample_rate = rate;
            }
        }

        if let Some(ch) = lookup("SOUNDSCAPE_CHANNELS").and_then(|s| s.parse::<u16>().ok()) {
            if (1..=8).contains(&ch) {
                config.channels = ch;
            }
        }

        if let Some(max) = lookup("SOUNDSCAPE_MAX_LOADS").and_then(|s| s.parse::<usize>().ok()) {
            if (1..=64).contains(&max) {
                config.max_concurrent_loads = max;
            }
        }

        if let Some(format) =
            lookup("SOUNDSCAPE_EXPORT_FORMAT").and_then(|s| ExportFormat::parse(&s))
        {
            config.export_format = format;
        }

        if let Some(flag) = lookup("SOUNDSCAPE_STRIP_PUNCTUATION") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => config.punctuation = PunctuationPolicy::Strip,
                "0" | "false" | "no" => config.punctuation = PunctuationPolicy::Preserve,
                _ => {}
            }
        }

        config
    }

    /// Returns the effective clip directory, using platform defaults if not specified.
    pub fn effective_asset_dir(&self) -> PathBuf {
        if let Some(ref path) = self.asset_dir {
            path.clone()
        } else {
            default_data_path("sounds")
        }
    }

    /// Returns the effective output directory, using platform defaults if not specified.
    pub fn effective_output_dir(&self) -> PathBuf {
        if let Some(ref path) = self.output_dir {
            path.clone()
        } else {
            default_data_path("soundscapes")
        }
    }

    /// Loads the registry from the JSON file if one is configured, otherwise
    /// by scanning the clip directory.
    pub fn load_registry(&self) -> Result<AssetRegistry> {
        match self.registry_path {
            Some(ref path) => AssetRegistry::from_json_file(path),
            None => {
                let dir = self.effective_asset_dir();
                info!(dir = %dir.display(), "No registry file configured, scanning clip directory");
                AssetRegistry::scan_directory(&dir)
            }
        }
    }

    /// Returns the loader settings derived from this configuration.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
            max_concurrent: self.max_concurrent_loads,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.target_duration_ms == 0 {
            return Some("target_duration_ms must be > 0".to_string());
        }
        if self.target_duration_ms > MAX_TARGET_DURATION_MS {
            return Some(format!(
                "target_duration_ms too high: {} (max {})",
                self.target_duration_ms, MAX_TARGET_DURATION_MS
            ));
        }

        if !(8_000..=192_000).contains(&self.sample_rate) {
            return Some(format!(
                "sample_rate must be between 8000 and 192000, got {}",
                self.sample_rate
            ));
        }

        if !(1..=8).contains(&self.channels) {
            return Some(format!("channels must be between 1 and 8, got {}", self.channels));
        }

        if self.export_format == ExportFormat::Mp3 {
            if self.channels > 2 {
                return Some(format!("mp3 export supports 1 or 2 channels, got {}", self.channels));
            }
            if !MP3_SAMPLE_RATES.contains(&self.sample_rate) {
                return Some(format!("mp3 export does not support {} Hz", self.sample_rate));
            }
        }

        if self.max_concurrent_loads == 0 {
            return Some("max_concurrent_loads must be > 0".to_string());
        }
        if self.max_concurrent_loads > 64 {
            return Some(format!(
                "max_concurrent_loads too high: {} (max 64)",
                self.max_concurrent_loads
            ));
        }

        None
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_path: None,
            asset_dir: None,
            output_dir: None,
            mode: MixMode::default(),
            target_duration_ms: DEFAULT_TARGET_DURATION_MS,
            fill_policy: FillPolicy::default(),
            sample_rate: 44_100,
            channels: 2,
            max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS,
            export_format: ExportFormat::default(),
            punctuation: PunctuationPolicy::default(),
        }
    }
}

/// Returns a platform-specific data path for the engine.
///
/// Uses the `directories` crate to find appropriate locations:
/// - macOS: ~/Library/Application Support/soundscape/<name>
/// - Linux: ~/.local/share/soundscape/<name>
/// - Windows: C:\Users\<user>\AppData\Roaming\soundscape\data\<name>
fn default_data_path(name: &str) -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "soundscape") {
        proj_dirs.data_dir().join(name)
    } else {
        // Fallback to current directory
        PathBuf::from(".").join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = EngineConfig::new();
        assert_eq!(config.mode, MixMode::Overlay);
        assert_eq!(config.target_duration_ms, 15_000);
        assert_eq!(config.fill_policy, FillPolicy::TruncateOnly);
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.channels, 2);
        assert_eq!(config.max_concurrent_loads, 4);
        assert_eq!(config.export_format, ExportFormat::Mp3);
        assert_eq!(config.punctuation, PunctuationPolicy::Preserve);
        assert!(config.validate().is_none());
    }

    #[test]
    fn config_validation() {
        let mut config = EngineConfig::new();

        config.target_duration_ms = 0;
        assert!(config.validate().is_some());

        config.target_duration_ms = 15_000;
        config.channels = 0;
        assert!(config.validate().is_some());

        config.channels = 2;
        config.max_concurrent_loads = 0;
        assert!(config.validate().is_some());

        config.max_concurrent_loads = 8;
        assert!(config.validate().is_none());
    }

    #[test]
    fn mp3_export_limits_format() {
        let mut config = EngineConfig::new();
        config.channels = 6;
        assert!(config.validate().is_some());

        config.channels = 2;
        config.sample_rate = 96_000;
        assert!(config.validate().is_some());

        config.export_format = ExportFormat::Float32;
        assert!(config.validate().is_none());
        config.channels = 6;
        assert!(config.validate().is_none());
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SOUNDSCAPE_REGISTRY_PATH", "/etc/sounds.json"),
            ("SOUNDSCAPE_MODE", "concatenate"),
            ("SOUNDSCAPE_DURATION_MS", "20000"),
            ("SOUNDSCAPE_FILL_POLICY", "loop"),
            ("SOUNDSCAPE_SAMPLE_RATE", "48000"),
            ("SOUNDSCAPE_CHANNELS", "1"),
            ("SOUNDSCAPE_MAX_LOADS", "8"),
            ("SOUNDSCAPE_EXPORT_FORMAT", "float32"),
            ("SOUNDSCAPE_STRIP_PUNCTUATION", "true"),
        ]));

        assert_eq!(config.registry_path, Some(PathBuf::from("/etc/sounds.json")));
        assert_eq!(config.mode, MixMode::Concatenate);
        assert_eq!(config.target_duration_ms, 20_000);
        assert_eq!(config.fill_policy, FillPolicy::LoopToFill);
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 1);
        assert_eq!(config.max_concurrent_loads, 8);
        assert_eq!(config.export_format, ExportFormat::Float32);
        assert_eq!(config.punctuation, PunctuationPolicy::Strip);
    }

    #[test]
    fn invalid_values_are_ignored() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("SOUNDSCAPE_MODE", "shuffle"),
            ("SOUNDSCAPE_DURATION_MS", "0"),
            ("SOUNDSCAPE_SAMPLE_RATE", "lots"),
            ("SOUNDSCAPE_CHANNELS", "32"),
            ("SOUNDSCAPE_MAX_LOADS", "0"),
            ("SOUNDSCAPE_EXPORT_FORMAT", "aiff"),
            ("SOUNDSCAPE_STRIP_PUNCTUATION", "maybe"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn effective_paths() {
        let config = EngineConfig::new();
        assert!(!config.effective_asset_dir().as_os_str().is_empty());
        assert!(!config.effective_output_dir().as_os_str().is_empty());

        let config = EngineConfig {
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..EngineConfig::default()
        };
        assert_eq!(config.effective_output_dir(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn load_registry_prefers_json_file() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("registry.json");
        std::fs::write(&json, r#"{ "water": ["water_0.mp3"] }"#).unwrap();

        let config = EngineConfig {
            registry_path: Some(json),
            asset_dir: Some(dir.path().join("unused")),
            ..EngineConfig::default()
        };
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.resolve("water").len(), 1);
    }

    #[test]
    fn load_registry_scans_asset_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("forest_0.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("forest_1.mp3"), b"").unwrap();

        let config = EngineConfig {
            asset_dir: Some(dir.path().to_path_buf()),
            ..EngineConfig::default()
        };
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.resolve("forest").len(), 2);
    }

    #[test]
    fn missing_registry_file_fails() {
        let config = EngineConfig {
            registry_path: Some(PathBuf::from("/nonexistent/registry.json")),
            ..EngineConfig::default()
        };
        let err = config.load_registry().unwrap_err();
        assert_eq!(err.code, ErrorCode::RegistryLoadFailed);
    }

    #[test]
    fn loader_config_mirrors_fields() {
        let config = EngineConfig {
            sample_rate: 22_050,
            channels: 1,
            max_concurrent_loads: 3,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.loader_config(),
            LoaderConfig {
                sample_rate: 22_050,
                channels: 1,
                max_concurrent: 3
            }
        );
    }
}
