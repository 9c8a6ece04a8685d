//! Clip decoding using symphonia.
//!
//! Decodes MP3, FLAC, AAC, Vorbis and WAV clips to interleaved f32 samples.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use super::buffer::AudioBuffer;
use crate::error::{Result, SoundscapeError};

/// Decodes an entire clip file.
///
/// The file handle is owned by the format reader and released when this
/// function returns, on success and on every error path.
///
/// Packets that fail to decode are skipped; a clip that yields no frames at
/// all is an `ASSET_LOAD_FAILED` error.
pub fn decode_file(path: &Path) -> Result<AudioBuffer> {
    debug!("Decoding clip: {}", path.display());

    let file = File::open(path)
        .map_err(|e| SoundscapeError::asset_load_failed(path.display(), e.to_string()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| {
            SoundscapeError::asset_load_failed(path.display(), format!("unrecognized format: {}", e))
        })?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SoundscapeError::asset_load_failed(path.display(), "no audio track"))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| {
            SoundscapeError::asset_load_failed(path.display(), format!("unsupported codec: {}", e))
        })?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count() as u16);
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                warn!("Stopped reading {} early: {}", path.display(), e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                channels.get_or_insert(spec.channels.count() as u16);

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping bad packet in {}: {}", path.display(), e);
            }
            Err(e) => {
                return Err(SoundscapeError::asset_load_failed(
                    path.display(),
                    format!("decode failed: {}", e),
                ));
            }
        }
    }

    let (Some(sample_rate), Some(channels)) = (sample_rate, channels) else {
        return Err(SoundscapeError::asset_load_failed(
            path.display(),
            "missing sample rate or channel layout",
        ));
    };

    let buffer = AudioBuffer::new(samples, sample_rate, channels);
    if buffer.is_empty() {
        return Err(SoundscapeError::asset_load_failed(
            path.display(),
            "clip contains no audio",
        ));
    }

    debug!(
        "Decoded {} frames at {}Hz, {} channel(s) from {}",
        buffer.frames(),
        sample_rate,
        channels,
        path.display()
    );
    Ok(buffer)
}
