//! soundscape-engine: turns caption text into ambient audio soundscapes.
//!
//! Caption text is reduced to a set of keyword tags, each tag is looked up
//! in a static registry of short clips, and the matched clips are mixed into
//! a single fixed-length MP3 (or WAV) file.
//!
//! # Modules
//!
//! - [`tags`]: Keyword extraction (Tag, TagSet, extract_tags)
//! - [`registry`]: Tag to clip lookup (AssetRegistry, AssetId)
//! - [`loader`]: Concurrent clip decoding (AssetLoader)
//! - [`mixer`]: Overlay/concatenate mixing and duration normalization
//! - [`audio`]: Buffers, decoding, resampling and MP3/WAV export
//! - [`pipeline`]: The end-to-end build (Pipeline)
//! - [`types`]: Soundscape metadata
//! - [`config`]: Runtime configuration (EngineConfig)
//! - [`error`]: Error types and codes (SoundscapeError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use soundscape_engine::{AssetLoader, AssetRegistry, MixMode, Pipeline};
//!
//! let registry = AssetRegistry::scan_directory("sounds".as_ref())?;
//! let pipeline = Pipeline::new(Arc::new(registry), AssetLoader::default());
//!
//! let out = pipeline
//!     .build_soundscape("water,forest,birds", MixMode::Overlay, 15_000)
//!     .await?;
//! std::fs::write("scape.mp3", &out.bytes)?;
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod mixer;
pub mod pipeline;
pub mod registry;
pub mod tags;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use audio::{AudioBuffer, ExportFormat};
pub use config::EngineConfig;
pub use error::{ErrorCode, Result, SoundscapeError};
pub use loader::{AssetLoadFailure, AssetLoader, LoadOutcome, LoaderConfig};
pub use mixer::{FillPolicy, MixMode, MixRequest, SoundscapeMixer};
pub use pipeline::{Pipeline, SoundscapeOutput, TagInput};
pub use registry::{AssetId, AssetRegistry};
pub use tags::{extract_tags, parse_tag_list, Tag, TagSet};
pub use types::{compute_soundscape_id, Soundscape};
