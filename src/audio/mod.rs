//! Audio input and output.
//!
//! Provides the decoded buffer type, clip decoding, sample-rate conversion
//! and MP3 or WAV export for finished soundscapes.

pub mod buffer;
pub mod decode;
pub mod export;
pub mod mp3;
pub mod resample;
pub mod wav;

// Re-export commonly used items
pub use buffer::{frames_for_duration, AudioBuffer};
pub use decode::decode_file;
pub use resample::{resample, resample_buffer};
pub use export::{encode, ExportFormat};
pub use mp3::{encode_mp3, MP3_SAMPLE_RATES};
pub use wav::{encode_wav, WavSample};
