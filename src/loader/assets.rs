//! Concurrent clip loading with per-clip failure capture.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::audio::{decode_file, resample_buffer, AudioBuffer};
use crate::error::{Result, SoundscapeError};
use crate::registry::AssetId;

/// Default cap on clips decoded at the same time.
pub const DEFAULT_MAX_CONCURRENT_LOADS: usize = 4;

/// Format every loaded clip is conformed to, plus the concurrency cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Maximum clips decoded concurrently (and so open file handles).
    pub max_concurrent: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            max_concurrent: DEFAULT_MAX_CONCURRENT_LOADS,
        }
    }
}

/// A clip that could not be used, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLoadFailure {
    /// The clip that failed.
    pub asset: AssetId,
    /// Why it failed.
    pub reason: String,
}

/// Result of loading a set of clips.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successfully decoded clips, keyed (and so ordered) by id.
    pub buffers: BTreeMap<AssetId, AudioBuffer>,
    /// Clips that failed, ordered by id.
    pub failures: Vec<AssetLoadFailure>,
}

impl LoadOutcome {
    /// Returns the ids of the clips that failed.
    pub fn failed_assets(&self) -> BTreeSet<AssetId> {
        self.failures.iter().map(|f| f.asset.clone()).collect()
    }

    /// Returns `NO_ASSETS_LOADED` if nothing loaded, otherwise the outcome unchanged.
    pub fn require_any(self) -> Result<Self> {
        if self.buffers.is_empty() {
            return Err(SoundscapeError::no_assets_loaded(self.failures.len()));
        }
        Ok(self)
    }
}

/// Loads clips concurrently, bounded by a shared permit pool.
///
/// Clones share the same pool, so one loader handed to many concurrent
/// pipeline runs caps the process-wide number of clips being decoded.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    config: LoaderConfig,
    permits: Arc<Semaphore>,
}

impl AssetLoader {
    /// Creates a loader with the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        let max = config.max_concurrent.max(1);
        Self {
            config: LoaderConfig {
                max_concurrent: max,
                ..config
            },
            permits: Arc::new(Semaphore::new(max)),
        }
    }

    /// Returns the loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads every clip in `assets`.
    ///
    /// Each clip is decoded on the blocking pool and conformed to the output
    /// format. Failures are recorded in the outcome and never abort the other
    /// loads. If this future is dropped, outstanding loads are aborted.
    pub async fn load(&self, assets: &BTreeSet<AssetId>) -> LoadOutcome {
        let mut tasks = JoinSet::new();

        for asset in assets {
            let asset = asset.clone();
            let permits = Arc::clone(&self.permits);
            let config = self.config;

            tasks.spawn(async move {
                let path = asset.path().to_path_buf();
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => tokio::task::spawn_blocking(move || load_one(&path, &config))
                        .await
                        .unwrap_or_else(|e| {
                            Err(SoundscapeError::asset_load_failed(
                                &asset,
                                format!("load task failed: {}", e),
                            ))
                        }),
                    Err(e) => Err(SoundscapeError::asset_load_failed(
                        &asset,
                        e.to_string(),
                    )),
                };
                (asset, result)
            });
        }

        let mut pending: BTreeSet<AssetId> = assets.clone();
        let mut outcome = LoadOutcome::default();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((asset, Ok(buffer))) => {
                    pending.remove(&asset);
                    outcome.buffers.insert(asset, buffer);
                }
                Ok((asset, Err(e))) => {
                    warn!(asset = %asset, "Skipping clip: {}", e.message);
                    pending.remove(&asset);
                    outcome.failures.push(AssetLoadFailure {
                        asset,
                        reason: e.message,
                    });
                }
                Err(e) => warn!("Clip load task aborted: {}", e),
            }
        }

        // Anything still pending lost its task before reporting back
        for asset in pending {
            outcome.failures.push(AssetLoadFailure {
                asset,
                reason: "load task aborted".to_string(),
            });
        }
        outcome.failures.sort_by(|a, b| a.asset.cmp(&b.asset));

        debug!(
            requested = assets.len(),
            loaded = outcome.buffers.len(),
            failed = outcome.failures.len(),
            "Loaded clips"
        );
        outcome
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

/// Decodes one clip and conforms it to the output format.
fn load_one(path: &Path, config: &LoaderConfig) -> Result<AudioBuffer> {
    let decoded = decode_file(path)?;
    let remixed = decoded.remix_channels(config.channels);
    resample_buffer(remixed, config.sample_rate)
}
