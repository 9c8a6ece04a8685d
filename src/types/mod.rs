//! Core types for the soundscape engine.
//!
//! - [`Soundscape`]: Metadata for an exported mix, written as a JSON sidecar

mod soundscape;

pub use soundscape::{compute_soundscape_id, Soundscape};
