//! Audio resampling utilities.
//!
//! Converts clips from their native rate to the soundscape output rate so
//! every buffer reaching the mixer shares one format.

use rubato::{FftFixedIn, Resampler};

use super::buffer::AudioBuffer;
use crate::error::{Result, SoundscapeError};

/// Resamples interleaved audio from one sample rate to another.
///
/// Uses FFT-based resampling. Each channel is processed in the same pass.
///
/// # Arguments
///
/// * `samples` - Interleaved input samples
/// * `channels` - Number of interleaved channels
/// * `from_rate` - Source sample rate in Hz
/// * `to_rate` - Target sample rate in Hz
pub fn resample(samples: &[f32], channels: u16, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let channels = channels.max(1) as usize;
    let planar = deinterleave(samples, channels);
    let input_len = planar[0].len();

    let chunk_size = 1024;
    let sub_chunks = 2;

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        chunk_size,
        sub_chunks,
        channels,
    )
    .map_err(|e| SoundscapeError::asset_load_failed("resampler", e.to_string()))?;

    let expected_len = (input_len as f64 * to_rate as f64 / from_rate as f64).round() as usize;
    // The filter shifts output by `delay` frames; keep feeding silence until
    // the tail of the input has been flushed through.
    let delay = resampler.output_delay();
    let needed = expected_len + delay;
    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(needed + chunk_size); channels];

    let input_frames = resampler.input_frames_next();
    let mut position = 0;

    while output[0].len() < needed {
        let start = position.min(input_len);
        let end = (position + input_frames).min(input_len);
        let chunk: Vec<Vec<f32>> = planar
            .iter()
            .map(|channel| {
                let mut part = channel[start..end].to_vec();
                part.resize(input_frames, 0.0);
                part
            })
            .collect();

        let resampled = resampler
            .process(&chunk, None)
            .map_err(|e| SoundscapeError::asset_load_failed("resampler", e.to_string()))?;

        for (out, part) in output.iter_mut().zip(resampled) {
            out.extend_from_slice(&part);
        }
        position += input_frames;
    }

    for channel in &mut output {
        let lead = delay.min(channel.len());
        channel.drain(..lead);
        channel.truncate(expected_len);
    }

    Ok(interleave(&output))
}

/// Resamples a buffer to `to_rate`, returning it unchanged if already there.
pub fn resample_buffer(buffer: AudioBuffer, to_rate: u32) -> Result<AudioBuffer> {
    if buffer.sample_rate == to_rate {
        return Ok(buffer);
    }
    let samples = resample(&buffer.samples, buffer.channels, buffer.sample_rate, to_rate)?;
    Ok(AudioBuffer::new(samples, to_rate, buffer.channels))
}

/// `[L, R, L, R, ...]` -> `[[L, L, ...], [R, R, ...]]`
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let mut planar = vec![Vec::with_capacity(samples.len() / channels); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            planar[ch].push(sample);
        }
    }
    planar
}

fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planar.len());
    for i in 0..frames {
        for channel in planar {
            out.push(channel[i]);
        }
    }
    out
}
