//! Caption-to-soundscape pipeline.
//!
//! Flow: caption text -> tags -> registry -> clip loading -> mixing -> export.

mod build;
mod input;

pub use build::{Pipeline, SoundscapeOutput};
pub use input::TagInput;
