//! Audio decoding
//!
//! Turns opaque container bytes into a [`SampleBuffer`]. Decoding is behind
//! the [`AudioDecoder`] trait so the editor can be handed any backend.
//!
//! Backends:
//! - [`WavDecoder`]: RIFF/WAVE via hound, inverse of the engine's own encoder
//! - [`SymphoniaDecoder`]: every container/codec symphonia supports
//! - [`AutoDecoder`]: sniffs the header and routes to one of the above
//!
//! Codec state (format readers, decoder instances) is owned by the decode
//! call and dropped on every exit path, including errors.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use symphonia::core::audio::SampleBuffer as PacketSamples;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::engine::buffer::SampleBuffer;
use crate::error::{EngineError, Result};

/// Decoding capability injected into the editor
pub trait AudioDecoder: Send + Sync {
    /// Decode a complete container into samples
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Returns true if `bytes` starts with a RIFF/WAVE header
pub fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

// ============================================================================
// WAV (hound)
// ============================================================================

/// RIFF/WAVE decoder built on hound
///
/// 16-bit integer samples are dequantized with the inverse of
/// [`quantize`](crate::engine::quantize), so re-decoding the engine's own
/// output reproduces the quantized values exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        if bytes.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| EngineError::decode("Failed to parse WAV header", e))?;

        let spec = reader.spec();
        let channels = spec.channels as usize;
        if channels == 0 || spec.sample_rate == 0 {
            return Err(EngineError::Decode {
                reason: format!(
                    "WAV declares {} channels at {} Hz",
                    spec.channels, spec.sample_rate
                ),
                source: None,
            });
        }

        let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

        // A truncated data chunk can leave a partial frame; drop it.
        let whole = interleaved.len() - interleaved.len() % channels;
        let buffer =
            SampleBuffer::from_interleaved(&interleaved[..whole], channels, spec.sample_rate)?;

        debug!(
            frames = buffer.frames(),
            channels,
            sample_rate = spec.sample_rate,
            bits = spec.bits_per_sample,
            "decoded wav"
        );
        Ok(buffer)
    }

    fn name(&self) -> &'static str {
        "wav"
    }
}

/// Read samples from a WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| EngineError::decode("Failed to read float samples", e)),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| EngineError::decode("Failed to read 8-bit samples", e)),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(dequantize_i16))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| EngineError::decode("Failed to read 16-bit samples", e)),
            bits @ (24 | 32) => {
                let scale = (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| EngineError::decode("Failed to read integer samples", e))
            }
            other => Err(EngineError::UnsupportedFormat {
                format: format!("{}-bit integer WAV", other),
            }),
        },
    }
}

/// Inverse of the encoder's asymmetric 16-bit quantization
#[inline]
pub fn dequantize_i16(value: i16) -> f32 {
    if value < 0 {
        value as f32 / 32768.0
    } else {
        value as f32 / 32767.0
    }
}

// ============================================================================
// Symphonia
// ============================================================================

/// General-purpose decoder for any format symphonia can probe
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    hint: Option<String>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give the prober a file extension hint (e.g. "mp3")
    pub fn with_hint(mut self, extension: impl Into<String>) -> Self {
        self.hint = Some(extension.into());
        self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        if bytes.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let source = Box::new(Cursor::new(bytes.to_vec()));
        let mss = MediaSourceStream::new(source, Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = &self.hint {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| EngineError::decode("Unrecognized audio container", e))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| EngineError::Decode {
                reason: "No decodable audio track".to_string(),
                source: None,
            })?;
        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channel_count = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| EngineError::UnsupportedFormat {
                format: format!("codec {:?}: {}", track.codec_params.codec, e),
            })?;

        let mut interleaved: Vec<f32> = Vec::new();
        let mut skipped = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref err))
                    if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(err) => {
                    return Err(EngineError::Resource {
                        reason: format!("packet read failed: {}", err),
                    });
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    if decoded.frames() == 0 {
                        continue;
                    }
                    sample_rate = spec.rate;
                    channel_count = spec.channels.count();

                    let mut samples = PacketSamples::<f32>::new(decoded.capacity() as u64, spec);
                    samples.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(samples.samples());
                }
                Err(SymphoniaError::DecodeError(reason)) => {
                    skipped += 1;
                    debug!(reason, "skipping corrupt packet");
                }
                Err(err) => {
                    return Err(EngineError::Resource {
                        reason: format!("decoder failed: {}", err),
                    });
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "skipped undecodable packets");
        }

        if channel_count == 0 || sample_rate == 0 {
            return Err(EngineError::Decode {
                reason: "Stream has no channel layout or sample rate".to_string(),
                source: None,
            });
        }

        let buffer = SampleBuffer::from_interleaved(&interleaved, channel_count, sample_rate)?;
        debug!(
            frames = buffer.frames(),
            channels = channel_count,
            sample_rate,
            "decoded via symphonia"
        );
        Ok(buffer)
    }

    fn name(&self) -> &'static str {
        "symphonia"
    }
}

// ============================================================================
// Auto
// ============================================================================

/// Routes WAV input to [`WavDecoder`] and everything else to [`SymphoniaDecoder`]
#[derive(Debug, Clone, Default)]
pub struct AutoDecoder {
    wav: WavDecoder,
    fallback: SymphoniaDecoder,
}

impl AutoDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioDecoder for AutoDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        if bytes.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if is_wav(bytes) {
            match self.wav.decode(bytes) {
                Ok(buffer) => return Ok(buffer),
                // hound rejects some valid variants (e.g. ADPCM); let symphonia try
                Err(err @ (EngineError::UnsupportedFormat { .. } | EngineError::Decode { .. })) => {
                    debug!(error = %err, "wav decoder declined, falling back");
                }
                Err(err) => return Err(err),
            }
        }
        self.fallback.decode(bytes)
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::encode::encode;

    fn ramp_buffer(channels: usize, frames: usize, rate: u32) -> SampleBuffer {
        let data = (0..channels)
            .map(|ch| {
                let scale = if ch % 2 == 0 { 1.0 } else { -0.5 };
                (0..frames)
                    .map(|i| ((i as f32 / frames as f32) * 2.0 - 1.0) * scale)
                    .collect()
            })
            .collect();
        SampleBuffer::from_channels(data, rate).unwrap()
    }

    #[test]
    fn test_is_wav() {
        assert!(is_wav(b"RIFF\0\0\0\0WAVEfmt "));
        assert!(!is_wav(b"ID3\x04"));
        assert!(!is_wav(b"RIFF"));
    }

    #[test]
    fn test_dequantize_inverse_of_quantize() {
        use crate::engine::encode::quantize;
        for v in [i16::MIN, -16384, -1, 0, 1, 16384, i16::MAX] {
            assert_eq!(quantize(dequantize_i16(v)), v);
        }
        assert_eq!(dequantize_i16(i16::MAX), 1.0);
        assert_eq!(dequantize_i16(i16::MIN), -1.0);
    }

    #[test]
    fn test_wav_roundtrip_preserves_shape() {
        let original = ramp_buffer(2, 1000, 44100);
        let encoded = encode(&original).unwrap();

        let decoded = WavDecoder.decode(encoded.bytes()).unwrap();
        assert_eq!(decoded.frames(), original.frames());
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.sample_rate(), 44100);

        for ch in 0..2 {
            for (a, b) in original.channel(ch).iter().zip(decoded.channel(ch)) {
                assert!((a - b).abs() < 1.0 / 32767.0, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_wav_roundtrip_is_stable_after_first_pass() {
        let original = ramp_buffer(1, 500, 8000);
        let first = WavDecoder.decode(encode(&original).unwrap().bytes()).unwrap();
        let second = WavDecoder.decode(encode(&first).unwrap().bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(WavDecoder.decode(&[]), Err(EngineError::EmptyInput)));
        assert!(matches!(
            SymphoniaDecoder::new().decode(&[]),
            Err(EngineError::EmptyInput)
        ));
        assert!(matches!(AutoDecoder::new().decode(&[]), Err(EngineError::EmptyInput)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let garbage = vec![0x42u8; 512];
        let err = AutoDecoder::new().decode(&garbage).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }

    #[test]
    fn test_symphonia_reads_engine_output() {
        let original = ramp_buffer(2, 4410, 44100);
        let encoded = encode(&original).unwrap();

        let decoded = SymphoniaDecoder::new()
            .with_hint("wav")
            .decode(encoded.bytes())
            .unwrap();
        assert_eq!(decoded.frames(), 4410);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.sample_rate(), 44100);
    }

    #[test]
    fn test_auto_decoder_routes_wav() {
        let original = ramp_buffer(1, 100, 16000);
        let encoded = encode(&original).unwrap();
        let decoded = AutoDecoder::new().decode(encoded.bytes()).unwrap();
        assert_eq!(decoded.frames(), 100);
        assert_eq!(decoded.sample_rate(), 16000);
    }

    #[test]
    fn test_wav_float_input() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in [0.0f32, 0.25, -0.75, 1.5] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        let decoded = WavDecoder.decode(cursor.get_ref()).unwrap();
        assert_eq!(decoded.channel(0), &[0.0, 0.25, -0.75, 1.5]);
    }
}
