//! Combination mode and fill policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SoundscapeError};

/// How loaded clips are combined into one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// All clips start at time zero and are summed sample by sample.
    #[default]
    Overlay,
    /// Clips are placed end to end, ordered by clip id.
    Concatenate,
}

impl MixMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            MixMode::Overlay => "overlay",
            MixMode::Concatenate => "concatenate",
        }
    }

    /// Parses a mode, returning `INVALID_MODE` for anything unrecognized.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "overlay" | "mix" => Ok(MixMode::Overlay),
            "concatenate" | "concat" | "sequence" => Ok(MixMode::Concatenate),
            _ => Err(SoundscapeError::invalid_mode(s)),
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MixMode {
    type Err = SoundscapeError;

    fn from_str(s: &str) -> Result<Self> {
        MixMode::parse(s)
    }
}

/// What happens when the combined audio is shorter than the target duration.
///
/// Audio longer than the target is always truncated to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Leave the output shorter than requested.
    #[default]
    TruncateOnly,
    /// Append silence up to the target duration.
    PadWithSilence,
    /// Repeat the combined audio from its start until the target is reached.
    LoopToFill,
}

impl FillPolicy {
    /// Returns the string representation of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            FillPolicy::TruncateOnly => "truncate_only",
            FillPolicy::PadWithSilence => "pad_with_silence",
            FillPolicy::LoopToFill => "loop_to_fill",
        }
    }

    /// Parses a policy from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "truncate_only" | "truncate" => Some(FillPolicy::TruncateOnly),
            "pad_with_silence" | "pad" => Some(FillPolicy::PadWithSilence),
            "loop_to_fill" | "loop" => Some(FillPolicy::LoopToFill),
            _ => None,
        }
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
