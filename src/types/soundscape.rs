//! Soundscape metadata describing one exported mix.
//!
//! A Soundscape records what went into a mix: the tags, which clips were
//! used, which failed and why. It is written next to the audio as a JSON
//! sidecar. Soundscapes are identified by a deterministic soundscape_id
//! computed from the mix inputs.

use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::audio::ExportFormat;
use crate::loader::AssetLoadFailure;
use crate::mixer::{FillPolicy, MixMode};
use crate::registry::AssetId;

/// Metadata for an exported soundscape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soundscape {
    /// SHA256 of (included clips + mode + fill policy + target duration).
    /// Format: 16 hex characters.
    pub soundscape_id: String,

    /// Path of the exported audio, once written to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Normalized tags the soundscape was built from, sorted.
    pub tags: Vec<String>,

    /// Tags with no registry entry.
    pub unresolved_tags: Vec<String>,

    /// Clips that made it into the mix, sorted by id.
    pub included_assets: Vec<AssetId>,

    /// Clips that were resolved but could not be loaded.
    pub failed_assets: Vec<AssetLoadFailure>,

    /// How the clips were combined.
    pub mode: MixMode,

    /// What was done with audio shorter than the target.
    pub fill_policy: FillPolicy,

    /// Requested maximum duration in milliseconds.
    pub target_duration_ms: u64,

    /// Actual duration of the exported audio in milliseconds.
    pub duration_ms: u64,

    /// Output sample rate in Hz.
    pub sample_rate: u32,

    /// Output channel count.
    pub channels: u16,

    /// Encoding of the exported audio.
    pub export_format: ExportFormat,

    /// When the soundscape was built (Unix seconds).
    #[serde(with = "system_time_serde")]
    pub created_at: SystemTime,
}

impl Soundscape {
    /// Validates internal consistency.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.soundscape_id.len() != 16 {
            return Some(format!(
                "Soundscape ID must be 16 characters, got {}",
                self.soundscape_id.len()
            ));
        }

        if !self.soundscape_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Some("Soundscape ID must contain only hex characters".to_string());
        }

        if self.included_assets.is_empty() {
            return Some("Soundscape must include at least one clip".to_string());
        }

        if self.duration_ms > self.target_duration_ms {
            return Some(format!(
                "Duration {}ms exceeds target {}ms",
                self.duration_ms, self.target_duration_ms
            ));
        }

        None
    }

    /// Serializes the metadata as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Computes a deterministic soundscape ID from the mix inputs.
///
/// The ID is the first 16 hex characters of the SHA256 hash of:
/// `{asset}|{asset}|...:{mode}:{fill_policy}:{target_duration_ms}`
///
/// Clip ids are hashed in sorted order, so the same set of clips always
/// yields the same ID.
pub fn compute_soundscape_id<'a, I>(
    assets: I,
    mode: MixMode,
    fill_policy: FillPolicy,
    target_duration_ms: u64,
) -> String
where
    I: IntoIterator<Item = &'a AssetId>,
{
    let mut sorted: Vec<&AssetId> = assets.into_iter().collect();
    sorted.sort();
    sorted.dedup();

    let joined = sorted
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("|");
    let input = format!("{}:{}:{}:{}", joined, mode, fill_policy, target_duration_ms);

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

/// Serializes SystemTime as Unix seconds.
mod system_time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs))
    }
}
