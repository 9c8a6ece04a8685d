//! WAV encoder for lossless soundscape export.
//!
//! Writes mixed buffers to WAV using the hound crate.

use std::io::{Cursor, Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};

use super::buffer::AudioBuffer;
use crate::error::{Result, SoundscapeError};

/// WAV sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavSample {
    /// 16-bit signed integer; samples are clamped to [-1.0, 1.0].
    Int16,
    /// 32-bit float; samples are written unmodified.
    Float32,
}

impl WavSample {
    fn spec(&self, buffer: &AudioBuffer) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            WavSample::Int16 => (16, SampleFormat::Int),
            WavSample::Float32 => (32, SampleFormat::Float),
        };
        WavSpec {
            channels: buffer.channels,
            sample_rate: buffer.sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Encodes a buffer to an in-memory WAV file.
///
/// The output is byte-identical for identical input buffers and encoding.
/// Returns `ENCODING_FAILURE` if the buffer is empty or has zero duration.
pub fn encode_wav(buffer: &AudioBuffer, sample: WavSample) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_samples(Cursor::new(&mut bytes), buffer, sample)?;
    Ok(bytes)
}

fn write_samples<W: Write + Seek>(sink: W, buffer: &AudioBuffer, sample: WavSample) -> Result<()> {
    if buffer.is_empty() || buffer.duration().is_zero() {
        return Err(SoundscapeError::encoding_failure("buffer has no audio"));
    }

    let mut writer = WavWriter::new(sink, sample.spec(buffer))
        .map_err(|e| SoundscapeError::encoding_failure(format!("Failed to create WAV writer: {}", e)))?;

    for &value in &buffer.samples {
        let written = match sample {
            WavSample::Int16 => writer.write_sample(to_i16(value)),
            WavSample::Float32 => writer.write_sample(value),
        };
        written.map_err(|e| {
            SoundscapeError::encoding_failure(format!("Failed to write sample: {}", e))
        })?;
    }

    writer.finalize().map_err(|e| {
        SoundscapeError::encoding_failure(format!("Failed to finalize WAV: {}", e))
    })?;
    Ok(())
}

/// Converts an f32 sample to 16-bit PCM, clamping out-of-range values.
pub(crate) fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
