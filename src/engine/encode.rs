//! WAV encoder
//!
//! Serializes a [`SampleBuffer`] into a canonical 44-byte-header RIFF/WAVE
//! container holding interleaved 16-bit little-endian PCM. The layout is the
//! same for every channel count; no extensible format chunk is ever written.

use tracing::debug;

use crate::engine::buffer::SampleBuffer;
use crate::error::{EngineError, Result};

/// Size of the fixed RIFF/WAVE header
pub const WAV_HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;
const FORMAT_PCM: u16 = 1;

/// Container tag used in metadata regardless of the requested file extension
pub const CONTAINER_FORMAT: &str = "wav";

/// Encoded output of the engine
///
/// The bytes are always a PCM WAV container. `format_tag` is whatever the
/// caller asked for and only affects the suggested file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Vec<u8>,
    format_tag: String,
}

impl EncodedAudio {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Container format of the bytes (always "wav")
    pub fn format(&self) -> &'static str {
        CONTAINER_FORMAT
    }

    pub fn format_tag(&self) -> &str {
        &self.format_tag
    }

    /// Replace the tag used for naming the output
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.format_tag = tag.into();
        self
    }

    /// Suggested file name for `stem`, e.g. `"song_trimmed.wav"`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.format_tag)
    }
}

/// Quantize a float sample to signed 16-bit PCM.
///
/// The sample is clamped to [-1, 1] and scaled asymmetrically so that -1.0
/// maps to -32768 and 1.0 maps to 32767. NaN encodes as silence.
#[inline]
pub fn quantize(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0).round() as i16
    } else {
        (s * 32767.0).round() as i16
    }
}

/// Encode a buffer as 16-bit PCM WAV
///
/// # Errors
/// * `Resource` - the payload does not fit the container's 32-bit size fields
pub fn encode(buffer: &SampleBuffer) -> Result<EncodedAudio> {
    let channel_count = buffer.channel_count();
    let frames = buffer.frames();

    let channels_field = u16::try_from(channel_count)
        .ok()
        .filter(|&c| c <= u16::MAX / BYTES_PER_SAMPLE as u16)
        .ok_or_else(|| EngineError::Resource {
            reason: format!("{} channels exceed the WAV channel field", channel_count),
        })?;

    let data_len = frames
        .checked_mul(channel_count)
        .and_then(|n| n.checked_mul(BYTES_PER_SAMPLE))
        .filter(|&n| n + WAV_HEADER_LEN - 8 <= u32::MAX as usize)
        .ok_or_else(|| EngineError::Resource {
            reason: format!(
                "{} frames x {} channels exceed the 4 GiB WAV size limit",
                frames, channel_count
            ),
        })?;

    let sample_rate = buffer.sample_rate();
    let block_align = channels_field * BYTES_PER_SAMPLE as u16;
    let byte_rate = sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(|| EngineError::Resource {
            reason: format!("byte rate overflows at {} Hz", sample_rate),
        })?;
    let total_len = WAV_HEADER_LEN + data_len;

    let mut bytes = Vec::with_capacity(total_len);

    // RIFF header
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&((total_len - 8) as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    // fmt chunk
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    bytes.extend_from_slice(&channels_field.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data_len as u32).to_le_bytes());

    for sample in buffer.to_interleaved() {
        bytes.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    debug_assert_eq!(bytes.len(), total_len);
    debug!(
        frames,
        channels = channel_count,
        sample_rate,
        bytes = total_len,
        "encoded wav"
    );

    Ok(EncodedAudio {
        bytes,
        format_tag: CONTAINER_FORMAT.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
