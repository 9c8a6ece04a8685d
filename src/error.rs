//! Error types for the soundscape engine.
//!
//! Every failure the pipeline can report is a recoverable value carrying an
//! [`ErrorCode`]; the caller decides how to surface it.

use std::fmt;

/// Error codes reported by the engine.
///
/// These codes are stable strings suitable for translating into a
/// transport-level failure by whatever layer invokes the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No tags were available to build a soundscape from.
    /// Trigger: caption reduced to stopwords only, or an empty tag string.
    EmptyTagSet,

    /// None of the tags matched a registry entry.
    NoAssetsResolved,

    /// Every resolved asset failed to read or decode.
    NoAssetsLoaded,

    /// Combination mode is not one of the recognized values.
    InvalidMode,

    /// The final buffer could not be encoded.
    /// Trigger: empty buffer, zero duration, or writer failure.
    EncodingFailure,

    /// The mixer was handed no buffers.
    EmptyInput,

    /// Target duration is zero.
    InvalidDuration,

    /// A single asset could not be read or decoded.
    /// Recorded per asset; never aborts a pipeline run on its own.
    AssetLoadFailed,

    /// The static tag registry could not be read or parsed.
    RegistryLoadFailed,

    /// Configuration value is out of range.
    InvalidConfig,

    /// Writing output to disk failed.
    IoFailure,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyTagSet => "EMPTY_TAG_SET",
            ErrorCode::NoAssetsResolved => "NO_ASSETS_RESOLVED",
            ErrorCode::NoAssetsLoaded => "NO_ASSETS_LOADED",
            ErrorCode::InvalidMode => "INVALID_MODE",
            ErrorCode::EncodingFailure => "ENCODING_FAILURE",
            ErrorCode::EmptyInput => "EMPTY_INPUT",
            ErrorCode::InvalidDuration => "INVALID_DURATION",
            ErrorCode::AssetLoadFailed => "ASSET_LOAD_FAILED",
            ErrorCode::RegistryLoadFailed => "REGISTRY_LOAD_FAILED",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::IoFailure => "IO_FAILURE",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::EmptyTagSet => "No usable tags were supplied or extracted",
            ErrorCode::NoAssetsResolved => "None of the tags matched a registered sound",
            ErrorCode::NoAssetsLoaded => "None of the matched sounds could be loaded",
            ErrorCode::InvalidMode => "Combination mode must be overlay or concatenate",
            ErrorCode::EncodingFailure => "Failed to encode the soundscape",
            ErrorCode::EmptyInput => "No audio buffers were supplied to the mixer",
            ErrorCode::InvalidDuration => "Target duration must be greater than zero",
            ErrorCode::AssetLoadFailed => "Failed to read or decode a sound clip",
            ErrorCode::RegistryLoadFailed => "Failed to load the tag registry",
            ErrorCode::InvalidConfig => "Configuration value is invalid",
            ErrorCode::IoFailure => "Failed to write output",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::EmptyTagSet => {
                "Provide a caption with descriptive words or a comma-separated tag list \
                 (e.g., 'water,forest')"
            }
            ErrorCode::NoAssetsResolved => {
                "Use tags present in the registry; run `soundscape check` to list \
                 tags without sounds"
            }
            ErrorCode::NoAssetsLoaded => {
                "Verify the registered clip files exist and are readable audio \
                 (mp3, wav, flac, ogg)"
            }
            ErrorCode::InvalidMode => "Use 'overlay' or 'concatenate'",
            ErrorCode::EncodingFailure => {
                "Check that at least one clip contains audio and the target duration is non-zero"
            }
            ErrorCode::EmptyInput => "Load at least one clip before mixing",
            ErrorCode::InvalidDuration => {
                "Specify a positive target duration in milliseconds (e.g., 15000)"
            }
            ErrorCode::AssetLoadFailed => {
                "Replace or re-download the clip; other clips are still used"
            }
            ErrorCode::RegistryLoadFailed => {
                "Check SOUNDSCAPE_REGISTRY_PATH points to a JSON object of \
                 tag -> list of clip paths, or set SOUNDSCAPE_ASSET_DIR to a clip folder"
            }
            ErrorCode::InvalidConfig => "Fix the reported configuration value",
            ErrorCode::IoFailure => "Check the output directory exists and is writable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for engine operations.
#[derive(Debug)]
pub struct SoundscapeError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SoundscapeError {
    /// Creates a new SoundscapeError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new SoundscapeError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an EMPTY_TAG_SET error.
    pub fn empty_tag_set() -> Self {
        Self::new(ErrorCode::EmptyTagSet, "Tag set is empty")
    }

    /// Creates a NO_ASSETS_RESOLVED error listing the tags that were tried.
    pub fn no_assets_resolved(tags: &[String]) -> Self {
        Self::new(
            ErrorCode::NoAssetsResolved,
            format!("No registered sounds for tags: {}", tags.join(", ")),
        )
    }

    /// Creates a NO_ASSETS_LOADED error.
    pub fn no_assets_loaded(attempted: usize) -> Self {
        Self::new(
            ErrorCode::NoAssetsLoaded,
            format!("All {} resolved sounds failed to load", attempted),
        )
    }

    /// Creates an INVALID_MODE error.
    pub fn invalid_mode(mode: &str) -> Self {
        Self::new(
            ErrorCode::InvalidMode,
            format!("Unknown combination mode: '{}'", mode),
        )
    }

    /// Creates an ENCODING_FAILURE error.
    pub fn encoding_failure(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::EncodingFailure,
            format!("Encoding failed: {}", reason.into()),
        )
    }

    /// Creates an EMPTY_INPUT error.
    pub fn empty_input() -> Self {
        Self::new(ErrorCode::EmptyInput, "Mixer received no buffers")
    }

    /// Creates an INVALID_DURATION error.
    pub fn invalid_duration(duration_ms: u64) -> Self {
        Self::new(
            ErrorCode::InvalidDuration,
            format!("Invalid target duration: {} ms", duration_ms),
        )
    }

    /// Creates an ASSET_LOAD_FAILED error.
    pub fn asset_load_failed(asset: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::AssetLoadFailed,
            format!("Failed to load {}: {}", asset, reason.into()),
        )
    }

    /// Creates a REGISTRY_LOAD_FAILED error.
    pub fn registry_load_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RegistryLoadFailed,
            format!("Failed to load registry: {}", reason.into()),
        )
    }

    /// Creates an INVALID_CONFIG error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, reason)
    }

    /// Creates an IO_FAILURE error wrapping the underlying I/O error.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::with_source(ErrorCode::IoFailure, context, source)
    }
}

impl fmt::Display for SoundscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for SoundscapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using SoundscapeError.
pub type Result<T> = std::result::Result<T, SoundscapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CODES: [ErrorCode; 11] = [
        ErrorCode::EmptyTagSet,
        ErrorCode::NoAssetsResolved,
        ErrorCode::NoAssetsLoaded,
        ErrorCode::InvalidMode,
        ErrorCode::EncodingFailure,
        ErrorCode::EmptyInput,
        ErrorCode::InvalidDuration,
        ErrorCode::AssetLoadFailed,
        ErrorCode::RegistryLoadFailed,
        ErrorCode::InvalidConfig,
        ErrorCode::IoFailure,
    ];

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::EmptyTagSet.as_str(), "EMPTY_TAG_SET");
        assert_eq!(ErrorCode::NoAssetsResolved.as_str(), "NO_ASSETS_RESOLVED");
        assert_eq!(ErrorCode::NoAssetsLoaded.as_str(), "NO_ASSETS_LOADED");
        assert_eq!(ErrorCode::InvalidMode.as_str(), "INVALID_MODE");
        assert_eq!(ErrorCode::EncodingFailure.as_str(), "ENCODING_FAILURE");
    }

    #[test]
    fn error_code_hints_not_empty() {
        for code in ALL_CODES {
            assert!(!code.recovery_hint().is_empty(), "{} has no hint", code);
            assert!(!code.description().is_empty(), "{} has no description", code);
        }
    }

    #[test]
    fn error_display_includes_code_and_hint() {
        let err = SoundscapeError::invalid_mode("shuffle");
        let text = err.to_string();
        assert!(text.contains("INVALID_MODE"));
        assert!(text.contains("shuffle"));
        assert!(text.contains("Recovery:"));
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;

        let err = SoundscapeError::io(
            "writing out.wav",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.code, ErrorCode::IoFailure);
        assert!(err.source().is_some());
    }
}
