//! Buffer combination and duration normalization.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use super::mode::{FillPolicy, MixMode};
use super::request::MAX_TARGET_DURATION_MS;
use crate::audio::{frames_for_duration, resample_buffer, AudioBuffer};
use crate::error::{Result, SoundscapeError};
use crate::registry::AssetId;

/// Combines loaded clips into one soundscape buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundscapeMixer {
    fill: FillPolicy,
}

impl SoundscapeMixer {
    /// Creates a mixer applying `fill` to short results.
    pub fn new(fill: FillPolicy) -> Self {
        Self { fill }
    }

    /// Returns the fill policy.
    pub fn fill_policy(&self) -> FillPolicy {
        self.fill
    }

    /// Combines `buffers` under `mode` and normalizes to `target`.
    ///
    /// Buffers are visited in clip-id order, so the result depends only on
    /// the set of clips and never on the order they were loaded in. Overlay
    /// sums in that fixed order; float addition is not associative, so
    /// bit-exact repeatability relies on it. The output takes the format of
    /// the first buffer; others are conformed to it.
    ///
    /// Returns `EMPTY_INPUT` for an empty map and `INVALID_DURATION` for a
    /// zero target or one above [`MAX_TARGET_DURATION_MS`].
    pub fn mix(
        &self,
        buffers: &BTreeMap<AssetId, AudioBuffer>,
        mode: MixMode,
        target: Duration,
    ) -> Result<AudioBuffer> {
        if target.is_zero() || target > Duration::from_millis(MAX_TARGET_DURATION_MS) {
            let ms = u64::try_from(target.as_millis()).unwrap_or(u64::MAX);
            return Err(SoundscapeError::invalid_duration(ms));
        }
        let Some(first) = buffers.values().next() else {
            return Err(SoundscapeError::empty_input());
        };
        let (sample_rate, channels) = (first.sample_rate, first.channels);

        let conformed = buffers
            .values()
            .map(|b| conform(b, sample_rate, channels))
            .collect::<Result<Vec<_>>>()?;

        let mut combined = match mode {
            MixMode::Overlay => overlay(&conformed, sample_rate, channels),
            MixMode::Concatenate => concatenate(&conformed, sample_rate, channels),
        };
        let combined_ms = combined.duration_ms();

        self.normalize(&mut combined, target);

        debug!(
            mode = mode.as_str(),
            fill = self.fill.as_str(),
            clips = buffers.len(),
            combined_ms,
            output_ms = combined.duration_ms(),
            "Mixed soundscape"
        );
        Ok(combined)
    }

    /// Truncates to `target`, then applies the fill policy if still short.
    fn normalize(&self, buffer: &mut AudioBuffer, target: Duration) {
        let target_frames = frames_for_duration(target, buffer.sample_rate);
        let frames = buffer.frames();

        if frames >= target_frames {
            buffer.truncate_frames(target_frames);
            return;
        }

        let target_len = target_frames.saturating_mul(buffer.channels as usize);
        match self.fill {
            FillPolicy::TruncateOnly => {}
            FillPolicy::PadWithSilence => buffer.samples.resize(target_len, 0.0),
            FillPolicy::LoopToFill => {
                if buffer.is_empty() {
                    return;
                }
                let looped: Vec<f32> = buffer
                    .samples
                    .iter()
                    .copied()
                    .cycle()
                    .take(target_len)
                    .collect();
                buffer.samples = looped;
            }
        }
    }
}

fn conform(buffer: &AudioBuffer, sample_rate: u32, channels: u16) -> Result<AudioBuffer> {
    if buffer.sample_rate == sample_rate && buffer.channels == channels {
        return Ok(buffer.clone());
    }
    resample_buffer(buffer.remix_channels(channels), sample_rate)
}

/// Sums buffers aligned at time zero; shorter buffers stop contributing at their end.
///
/// Summation follows slice order. Results are only bit-identical across
/// permutations when every partial sum is exact.
fn overlay(buffers: &[AudioBuffer], sample_rate: u32, channels: u16) -> AudioBuffer {
    let len = buffers.iter().map(|b| b.samples.len()).max().unwrap_or(0);
    let mut out = vec![0.0f32; len];
    for buffer in buffers {
        for (acc, &sample) in out.iter_mut().zip(&buffer.samples) {
            *acc += sample;
        }
    }
    AudioBuffer::new(out, sample_rate, channels)
}

/// Places buffers end to end in the given order.
fn concatenate(buffers: &[AudioBuffer], sample_rate: u32, channels: u16) -> AudioBuffer {
    let len = buffers.iter().map(|b| b.samples.len()).sum();
    let mut out = Vec::with_capacity(len);
    for buffer in buffers {
        out.extend_from_slice(&buffer.samples);
    }
    AudioBuffer::new(out, sample_rate, channels)
}
