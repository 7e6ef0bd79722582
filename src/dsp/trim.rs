//! Trim
//!
//! Cuts a time range out of a buffer. Times are converted to frames with
//! `round(seconds * sample_rate)`; the selected range must be non-empty and
//! lie within `[0, frames]`.

use tracing::debug;

use crate::engine::SampleBuffer;
use crate::error::{EngineError, Result};

/// Copy the frames in `[start_secs, end_secs)` into a new buffer
///
/// # Errors
/// * `InvalidTimeRange` - the range is empty, reversed, non-finite, or
///   reaches outside the buffer
pub fn trim(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> Result<SampleBuffer> {
    let range = frame_range(buffer, start_secs, end_secs)?;

    let channels = buffer
        .channels()
        .iter()
        .map(|channel| channel[range.clone()].to_vec())
        .collect();

    debug!(
        start = range.start,
        end = range.end,
        frames = range.len(),
        "trimmed"
    );
    Ok(SampleBuffer::from_parts(channels, buffer.sample_rate()))
}

/// Resolve a time range to a frame range, validating bounds
fn frame_range(
    buffer: &SampleBuffer,
    start_secs: f64,
    end_secs: f64,
) -> Result<std::ops::Range<usize>> {
    let invalid = || EngineError::InvalidTimeRange {
        start_secs,
        end_secs,
    };

    if !start_secs.is_finite() || !end_secs.is_finite() {
        return Err(invalid());
    }

    let start = buffer.frame_index(start_secs);
    let end = buffer.frame_index(end_secs);

    if end - start <= 0 || start < 0 || end > buffer.frames() as i64 {
        return Err(invalid());
    }

    Ok(start as usize..end as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_buffer(frames: usize, rate: u32) -> SampleBuffer {
        let left: Vec<f32> = (0..frames).map(|i| i as f32).collect();
        let right: Vec<f32> = (0..frames).map(|i| -(i as f32)).collect();
        SampleBuffer::from_channels(vec![left, right], rate).unwrap()
    }

    #[test]
    fn test_trim_copies_selected_frames() {
        let buffer = counting_buffer(100, 10);
        let trimmed = trim(&buffer, 2.0, 5.0).unwrap();

        assert_eq!(trimmed.frames(), 30);
        assert_eq!(trimmed.channel_count(), 2);
        assert_eq!(trimmed.sample_rate(), 10);
        assert_eq!(trimmed.channel(0)[0], 20.0);
        assert_eq!(trimmed.channel(0)[29], 49.0);
        assert_eq!(trimmed.channel(1)[0], -20.0);
    }

    #[test]
    fn test_trim_frame_count_matches_rounding() {
        let buffer = counting_buffer(44100 * 2, 44100);
        let (start, end) = (0.123_45, 1.678_9);
        let trimmed = trim(&buffer, start, end).unwrap();

        let expected = (end * 44100.0_f64).round() as usize - (start * 44100.0_f64).round() as usize;
        assert_eq!(trimmed.frames(), expected);
    }

    #[test]
    fn test_trim_whole_buffer() {
        let buffer = counting_buffer(100, 10);
        let trimmed = trim(&buffer, 0.0, 10.0).unwrap();
        assert_eq!(trimmed, buffer);
    }

    #[test]
    fn test_trim_rejects_reversed_and_empty() {
        let buffer = counting_buffer(100, 10);
        for (start, end) in [(5.0, 2.0), (3.0, 3.0), (3.0, 3.01)] {
            let err = trim(&buffer, start, end).unwrap_err();
            assert_eq!(err.to_string(), "Invalid time range");
        }
    }

    #[test]
    fn test_trim_rejects_out_of_bounds() {
        let buffer = counting_buffer(100, 10);
        assert!(trim(&buffer, -1.0, 2.0).is_err());
        assert!(trim(&buffer, 2.0, 10.5).is_err());
        assert!(trim(&buffer, 20.0, 30.0).is_err());
    }

    #[test]
    fn test_trim_rejects_non_finite() {
        let buffer = counting_buffer(100, 10);
        assert!(trim(&buffer, f64::NAN, 2.0).is_err());
        assert!(trim(&buffer, 0.0, f64::INFINITY).is_err());
    }
}
