//! Per-request mix parameters.

use std::collections::BTreeSet;
use std::time::Duration;

use super::mode::MixMode;
use crate::error::{Result, SoundscapeError};
use crate::registry::AssetId;

/// Longest soundscape the engine will build (10 minutes).
pub const MAX_TARGET_DURATION_MS: u64 = 600_000;

/// The clips to combine, how, and for how long. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixRequest {
    /// Deduplicated clips to load and combine.
    pub assets: BTreeSet<AssetId>,
    /// Combination mode.
    pub mode: MixMode,
    /// Maximum output duration.
    pub target_duration: Duration,
}

impl MixRequest {
    /// Creates a request.
    ///
    /// Returns `INVALID_DURATION` for a zero target or one above
    /// [`MAX_TARGET_DURATION_MS`].
    pub fn new(assets: BTreeSet<AssetId>, mode: MixMode, target_duration_ms: u64) -> Result<Self> {
        if target_duration_ms == 0 || target_duration_ms > MAX_TARGET_DURATION_MS {
            return Err(SoundscapeError::invalid_duration(target_duration_ms));
        }
        Ok(Self {
            assets,
            mode,
            target_duration: Duration::from_millis(target_duration_ms),
        })
    }

    /// Target duration in whole milliseconds.
    pub fn target_duration_ms(&self) -> u64 {
        self.target_duration.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn zero_duration_rejected() {
        let err = MixRequest::new(BTreeSet::new(), MixMode::Overlay, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDuration);
    }

    #[test]
    fn target_above_cap_rejected() {
        let assets = BTreeSet::from([AssetId::from("a.wav")]);
        assert!(MixRequest::new(assets.clone(), MixMode::Overlay, MAX_TARGET_DURATION_MS).is_ok());

        let err = MixRequest::new(assets, MixMode::Overlay, MAX_TARGET_DURATION_MS + 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDuration);

        let err = MixRequest::new(BTreeSet::new(), MixMode::Overlay, u64::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDuration);
    }

    #[test]
    fn keeps_millisecond_target() {
        let assets = BTreeSet::from([AssetId::from("a.wav")]);
        let request = MixRequest::new(assets, MixMode::Concatenate, 15_000).unwrap();
        assert_eq!(request.target_duration, Duration::from_secs(15));
        assert_eq!(request.target_duration_ms(), 15_000);
    }
}
