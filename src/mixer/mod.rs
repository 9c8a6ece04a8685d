//! Soundscape mixing.
//!
//! Combines loaded clips by overlay or concatenation and normalizes the
//! result to a target duration.

mod combine;
mod mode;
mod request;

pub use combine::SoundscapeMixer;
pub use mode::{FillPolicy, MixMode};
pub use request::{MixRequest, MAX_TARGET_DURATION_MS};
