//! Soundscape export.
//!
//! MP3 is the delivery encoding; the WAV variants exist for fixtures and
//! for callers that post-process the mix.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::buffer::AudioBuffer;
use super::mp3::encode_mp3;
use super::wav::{encode_wav, WavSample};
use crate::error::Result;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// 192 kbps constant-bitrate MP3. Mono or stereo only.
    #[default]
    Mp3,
    /// 16-bit integer PCM WAV.
    Pcm16,
    /// 32-bit float PCM WAV.
    Float32,
}

impl ExportFormat {
    /// Returns the string representation of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Mp3 => "mp3",
            ExportFormat::Pcm16 => "pcm16",
            ExportFormat::Float32 => "float32",
        }
    }

    /// Parses a format from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mp3" => Some(ExportFormat::Mp3),
            "pcm16" | "s16" | "int16" => Some(ExportFormat::Pcm16),
            "float32" | "f32" | "float" => Some(ExportFormat::Float32),
            _ => None,
        }
    }

    /// File extension for exported soundscapes.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Mp3 => "mp3",
            ExportFormat::Pcm16 | ExportFormat::Float32 => "wav",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encodes a finished buffer in `format`.
///
/// Returns `ENCODING_FAILURE` if the buffer is empty or has zero duration.
pub fn encode(buffer: &AudioBuffer, format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Mp3 => encode_mp3(buffer)?,
        ExportFormat::Pcm16 => encode_wav(buffer, WavSample::Int16)?,
        ExportFormat::Float32 => encode_wav(buffer, WavSample::Float32)?,
    };
    debug!(
        bytes = bytes.len(),
        frames = buffer.frames(),
        format = format.as_str(),
        "Encoded soundscape"
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn tone() -> AudioBuffer {
        let samples = (0..4410).map(|i| (i as f32 * 0.05).sin() * 0.3).collect();
        AudioBuffer::new(samples, 44_100, 1)
    }

    #[test]
    fn default_is_lossy() {
        assert_eq!(ExportFormat::default(), ExportFormat::Mp3);
        assert_eq!(ExportFormat::default().extension(), "mp3");
    }

    #[test]
    fn export_format_parsing() {
        assert_eq!(ExportFormat::parse("MP3"), Some(ExportFormat::Mp3));
        assert_eq!(ExportFormat::parse("PCM16"), Some(ExportFormat::Pcm16));
        assert_eq!(ExportFormat::parse("f32"), Some(ExportFormat::Float32));
        assert_eq!(ExportFormat::parse("aiff"), None);
    }

    #[test]
    fn encode_dispatches_by_format() {
        let mp3 = encode(&tone(), ExportFormat::Mp3).unwrap();
        assert_ne!(&mp3[0..4], b"RIFF");

        let wav = encode(&tone(), ExportFormat::Pcm16).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(ExportFormat::Float32.extension(), "wav");
    }

    #[test]
    fn empty_buffer_fails_in_every_format() {
        let empty = AudioBuffer::new(Vec::new(), 44_100, 1);
        for format in [ExportFormat::Mp3, ExportFormat::Pcm16, ExportFormat::Float32] {
            let err = encode(&empty, format).unwrap_err();
            assert_eq!(err.code, ErrorCode::EncodingFailure);
        }
    }
}
