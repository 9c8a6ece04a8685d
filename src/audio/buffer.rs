//! Decoded PCM audio buffer.

use std::time::Duration;

/// Interleaved f32 PCM samples with their format.
///
/// A buffer is owned by whichever stage produced it last and is handed on by
/// value; nothing shares a buffer mutably.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved samples: `[L0, R0, L1, R1, ...]` for stereo.
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioBuffer {
    /// Creates a buffer from interleaved samples.
    ///
    /// Trailing samples that do not form a complete frame are dropped.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % channels as usize;
        samples.truncate(whole);
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Creates a silent buffer of `frames` frames.
    pub fn silence(frames: usize, sample_rate: u32, channels: u16) -> Self {
        Self::new(vec![0.0; frames * channels.max(1) as usize], sample_rate, channels)
    }

    /// Returns the number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Returns true if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the playback duration.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let nanos = self.frames() as u128 * 1_000_000_000 / self.sample_rate as u128;
        Duration::from_nanos(nanos as u64)
    }

    /// Returns the playback duration in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration().as_millis() as u64
    }

    /// Shortens the buffer to at most `frames` frames.
    pub fn truncate_frames(&mut self, frames: usize) {
        self.samples.truncate(frames * self.channels as usize);
    }

    /// Returns a copy of this buffer with `channels` channels.
    ///
    /// Mono is duplicated to every output channel; anything else is averaged
    /// down to mono first, then duplicated.
    pub fn remix_channels(&self, channels: u16) -> AudioBuffer {
        let channels = channels.max(1);
        if channels == self.channels {
            return self.clone();
        }

        let mono: Vec<f32> = if self.channels == 1 {
            self.samples.clone()
        } else {
            self.samples
                .chunks_exact(self.channels as usize)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect()
        };

        let samples = if channels == 1 {
            mono
        } else {
            mono.iter()
                .flat_map(|&s| std::iter::repeat(s).take(channels as usize))
                .collect()
        };

        AudioBuffer::new(samples, self.sample_rate, channels)
    }
}

/// Returns the number of whole frames that fit in `duration` at `sample_rate`.
///
/// Saturates at `usize::MAX` instead of wrapping.
pub fn frames_for_duration(duration: Duration, sample_rate: u32) -> usize {
    let frames = duration.as_nanos().saturating_mul(sample_rate as u128) / 1_000_000_000;
    usize::try_from(frames).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drops_partial_frame() {
        let buf = AudioBuffer::new(vec![0.1, 0.2, 0.3], 8000, 2);
        assert_eq!(buf.samples, vec![0.1, 0.2]);
        assert_eq!(buf.frames(), 1);
    }

    #[test]
    fn duration_is_exact_for_whole_milliseconds() {
        let buf = AudioBuffer::silence(661_500, 44_100, 2);
        assert_eq!(buf.duration(), Duration::from_millis(15_000));
        assert_eq!(buf.duration_ms(), 15_000);
    }

    #[test]
    fn frames_for_duration_calculation() {
        assert_eq!(frames_for_duration(Duration::from_millis(15_000), 44_100), 661_500);
        assert_eq!(frames_for_duration(Duration::from_millis(500), 8_000), 4_000);
        assert_eq!(frames_for_duration(Duration::ZERO, 8_000), 0);
    }

    #[test]
    fn frames_for_huge_duration_saturates() {
        assert_eq!(frames_for_duration(Duration::MAX, 192_000), usize::MAX);
        assert_eq!(frames_for_duration(Duration::from_secs(u64::MAX), 48_000), usize::MAX);
    }

    #[test]
    fn truncate_frames_keeps_whole_frames() {
        let mut buf = AudioBuffer::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 8000, 2);
        buf.truncate_frames(2);
        assert_eq!(buf.samples, vec![1.0, 2.0, 3.0, 4.0]);
        buf.truncate_frames(10);
        assert_eq!(buf.frames(), 2);
    }

    #[test]
    fn remix_mono_to_stereo_duplicates() {
        let mono = AudioBuffer::new(vec![0.5, -0.5], 8000, 1);
        let stereo = mono.remix_channels(2);
        assert_eq!(stereo.samples, vec![0.5, 0.5, -0.5, -0.5]);
        assert_eq!(stereo.channels, 2);
    }

    #[test]
    fn remix_stereo_to_mono_averages() {
        let stereo = AudioBuffer::new(vec![1.0, 0.0, 0.5, 0.5], 8000, 2);
        let mono = stereo.remix_channels(1);
        assert_eq!(mono.samples, vec![0.5, 0.5]);
    }

    #[test]
    fn empty_buffer_has_zero_duration() {
        let buf = AudioBuffer::new(Vec::new(), 44_100, 2);
        assert!(buf.is_empty());
        assert_eq!(buf.duration(), Duration::ZERO);
    }
}
