//! Static tag -> sound clip registry.
//!
//! Loaded once at start-up from a JSON file or a clip folder, then shared
//! read-only (typically behind an `Arc`) by every pipeline run.

mod asset;
mod lookup;
mod source;

pub use asset::AssetId;
pub use lookup::AssetRegistry;
pub use source::AUDIO_EXTENSIONS;
