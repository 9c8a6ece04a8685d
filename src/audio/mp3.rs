//! MP3 encoder for soundscape delivery, backed by LAME.

use mp3lame_encoder::{Bitrate, Builder, DualPcm, FlushNoGap, MonoPcm, Quality};

use super::buffer::AudioBuffer;
use super::wav::to_i16;
use crate::error::{Result, SoundscapeError};

/// Sample rates LAME accepts for MPEG-1, 2 and 2.5 layer III.
pub const MP3_SAMPLE_RATES: [u32; 9] = [
    8_000, 11_025, 12_000, 16_000, 22_050, 24_000, 32_000, 44_100, 48_000,
];

/// Constant bitrate used for every export.
const BITRATE: Bitrate = Bitrate::Kbps192;

/// Encodes a mono or stereo buffer to a constant-bitrate MP3 stream.
///
/// Output is byte-identical for identical input within one build of the
/// encoder. Returns `ENCODING_FAILURE` for an empty buffer, more than two
/// channels, or a sample rate outside [`MP3_SAMPLE_RATES`].
pub fn encode_mp3(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    if buffer.is_empty() || buffer.duration().is_zero() {
        return Err(SoundscapeError::encoding_failure("buffer has no audio"));
    }
    if !MP3_SAMPLE_RATES.contains(&buffer.sample_rate) {
        return Err(SoundscapeError::encoding_failure(format!(
            "MP3 does not support {} Hz",
            buffer.sample_rate
        )));
    }

    let mut builder =
        Builder::new().ok_or_else(|| SoundscapeError::encoding_failure("LAME init failed"))?;
    let channels = match buffer.channels {
        1 => 1u8,
        2 => 2u8,
        n => {
            return Err(SoundscapeError::encoding_failure(format!(
                "MP3 supports 1 or 2 channels, got {}",
                n
            )))
        }
    };
    builder.set_num_channels(channels).map_err(config_error)?;
    builder.set_sample_rate(buffer.sample_rate).map_err(config_error)?;
    builder.set_brate(BITRATE).map_err(config_error)?;
    builder.set_quality(Quality::Best).map_err(config_error)?;
    let mut encoder = builder.build().map_err(config_error)?;

    let pcm: Vec<i16> = buffer.samples.iter().map(|&s| to_i16(s)).collect();
    let frames = buffer.frames();
    let mut out: Vec<u8> = Vec::new();
    out.reserve(mp3lame_encoder::max_required_buffer_size(frames));

    let encoded = if channels == 1 {
        encoder.encode(MonoPcm(&pcm), out.spare_capacity_mut())
    } else {
        let (left, right): (Vec<i16>, Vec<i16>) =
            pcm.chunks_exact(2).map(|frame| (frame[0], frame[1])).unzip();
        encoder.encode(
            DualPcm {
                left: &left,
                right: &right,
            },
            out.spare_capacity_mut(),
        )
    };
    let written = encoded
        .map_err(|e| SoundscapeError::encoding_failure(format!("MP3 encode failed: {:?}", e)))?;
    // SAFETY: the encoder initialized `written` bytes of spare capacity.
    unsafe { out.set_len(out.len() + written) };

    // Final frame plus padding fits in 7200 bytes.
    out.reserve(7200);
    let flushed = encoder
        .flush::<FlushNoGap>(out.spare_capacity_mut())
        .map_err(|e| SoundscapeError::encoding_failure(format!("MP3 flush failed: {:?}", e)))?;
    // SAFETY: the encoder initialized `flushed` bytes of spare capacity.
    unsafe { out.set_len(out.len() + flushed) };

    Ok(out)
}

fn config_error<E: std::fmt::Debug>(e: E) -> SoundscapeError {
    SoundscapeError::encoding_failure(format!("MP3 encoder setup failed: {:?}", e))
}
