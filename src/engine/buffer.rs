//! Sample Buffer
//!
//! The canonical in-memory representation shared by every stage: one
//! `Vec<f32>` per channel plus a sample rate. Values are nominally in
//! [-1.0, 1.0] but are only hard-clamped by the encoder.

use crate::error::{EngineError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Decoded, non-interleaved audio
///
/// Buffers are values: every transform borrows its input and returns a new
/// owned buffer, so no stage ever observes another stage's writes.
///
/// # Invariants
/// - at least one channel
/// - every channel holds exactly `frames()` samples
/// - `sample_rate() > 0`
///
/// # Example
/// ```
/// use audioforge::engine::SampleBuffer;
///
/// let buffer = SampleBuffer::new(2, 44100, 44100);
/// assert_eq!(buffer.channel_count(), 2);
/// assert_eq!(buffer.frames(), 44100);
/// assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a silent buffer
    ///
    /// # Panics
    /// Panics if `channel_count` or `sample_rate` is zero.
    pub fn new(channel_count: usize, frames: usize, sample_rate: u32) -> Self {
        assert!(channel_count > 0, "channel count must be positive");
        assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            channels: vec![vec![0.0_f32; frames]; channel_count],
            sample_rate,
        }
    }

    /// Build a buffer from per-channel sample data
    ///
    /// # Errors
    /// * `MalformedBuffer` - no channels, zero sample rate, or ragged channels
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(EngineError::MalformedBuffer {
                reason: "buffer has no channels".to_string(),
            });
        }
        if sample_rate == 0 {
            return Err(EngineError::MalformedBuffer {
                reason: "sample rate must be positive".to_string(),
            });
        }
        let frames = channels[0].len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frames)
        {
            return Err(EngineError::MalformedBuffer {
                reason: format!(
                    "channel {} has {} frames, expected {}",
                    index,
                    channel.len(),
                    frames
                ),
            });
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Build a buffer from interleaved data (L, R, L, R, ... for stereo)
    ///
    /// # Errors
    /// * `MalformedBuffer` - zero channels/rate, or a trailing partial frame
    pub fn from_interleaved(
        interleaved: &[f32],
        channel_count: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if channel_count == 0 {
            return Err(EngineError::MalformedBuffer {
                reason: "buffer has no channels".to_string(),
            });
        }

        if interleaved.len() % channel_count != 0 {
            return Err(EngineError::MalformedBuffer {
                reason: format!(
                    "interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    channel_count
                ),
            });
        }

        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];

        for frame in interleaved.chunks_exact(channel_count) {
            for (ch, &sample) in frame.iter().enumerate() {
                channels[ch].push(sample);
            }
        }

        Self::from_channels(channels, sample_rate)
    }

    /// Convert the buffer to interleaved order, frame by frame
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.channel_count() * self.frames());

        for frame in 0..self.frames() {
            for channel in &self.channels {
                interleaved.push(channel[frame]);
            }
        }

        interleaved
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel
    #[inline]
    pub fn frames(&self) -> usize {
        self.channels.first().map(|ch| ch.len()).unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    #[inline]
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Convert a time in seconds to a frame offset: `round(seconds * rate)`.
    ///
    /// The result is signed so callers can detect negative positions.
    #[inline]
    pub fn frame_index(&self, seconds: f64) -> i64 {
        (seconds * self.sample_rate as f64).round() as i64
    }

    /// Largest absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|channel| channel.iter())
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Position `(channel, frame)` of the first NaN or infinite sample
    pub fn find_non_finite(&self) -> Option<(usize, usize)> {
        self.channels.iter().enumerate().find_map(|(c, channel)| {
            channel
                .iter()
                .position(|s| !s.is_finite())
                .map(|frame| (c, frame))
        })
    }

    /// Build a new buffer with the same rate and channel count by mapping
    /// every sample.
    pub(crate) fn map_samples<F>(&self, mut f: F) -> SampleBuffer
    where
        F: FnMut(usize, f32) -> f32,
    {
        let channels = self
            .channels
            .iter()
            .map(|channel| {
                channel
                    .iter()
                    .enumerate()
                    .map(|(frame, &s)| f(frame, s))
                    .collect()
            })
            .collect();

        SampleBuffer {
            channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Internal constructor for transforms that already uphold the invariants
    pub(crate) fn from_parts(channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        debug_assert!(!channels.is_empty());
        debug_assert!(channels.iter().all(|ch| ch.len() == channels[0].len()));
        Self {
            channels,
            sample_rate,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-4);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_buffer_new() {
        let buffer = SampleBuffer::new(2, 1000, 48000);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frames(), 1000);
        assert_eq!(buffer.sample_rate(), 48000);
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn test_from_channels_rejects_ragged() {
        let result = SampleBuffer::from_channels(vec![vec![0.0; 10], vec![0.0; 9]], 44100);
        assert!(matches!(result, Err(EngineError::MalformedBuffer { .. })));
    }

    #[test]
    fn test_from_channels_rejects_empty_and_zero_rate() {
        assert!(SampleBuffer::from_channels(vec![], 44100).is_err());
        assert!(SampleBuffer::from_channels(vec![vec![0.0; 4]], 0).is_err());
    }

    #[test]
    fn test_from_interleaved_stereo() {
        let buffer = SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 2, 44100)
            .unwrap();

        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.channel(0), &[0.1, 0.3, 0.5]);
        assert_eq!(buffer.channel(1), &[0.2, 0.4, 0.6]);
        assert_eq!(buffer.to_interleaved(), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_from_interleaved_partial_frame() {
        let result = SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3], 2, 44100);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_index_rounds() {
        let buffer = SampleBuffer::new(1, 10, 44100);
        assert_eq!(buffer.frame_index(1.0), 44100);
        assert_eq!(buffer.frame_index(0.5), 22050);
        // 0.00001 * 44100 = 0.441 -> 0
        assert_eq!(buffer.frame_index(0.00001), 0);
        assert_eq!(buffer.frame_index(-1.0), -44100);
    }

    #[test]
    fn test_peak_uses_absolute_value() {
        let buffer =
            SampleBuffer::from_channels(vec![vec![0.1, -0.7], vec![0.5, 0.2]], 8000).unwrap();
        assert!((buffer.peak() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_find_non_finite() {
        let buffer = SampleBuffer::from_channels(vec![vec![0.5; 8]; 2], 8000).unwrap();
        assert_eq!(buffer.find_non_finite(), None);

        let mut right = vec![0.5; 8];
        right[5] = f32::INFINITY;
        right[6] = f32::NAN;
        let buffer = SampleBuffer::from_channels(vec![vec![0.5; 8], right], 8000).unwrap();
        assert_eq!(buffer.find_non_finite(), Some((1, 5)));
    }
}
