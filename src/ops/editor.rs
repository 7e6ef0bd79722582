//! Audio editor
//!
//! The public entry point. Each operation validates its parameters, runs
//! decode -> transform -> encode, and returns an [`OperationResult`]. No
//! error escapes an operation; failures are logged and folded into the
//! result.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::config::EditorConfig;
use crate::dsp::{self, FadeOptions, GainOptions, NormalizeOptions, SpeedOptions};
use crate::engine::{encode, AudioDecoder, AutoDecoder, EncodedAudio, SampleBuffer};
use crate::error::{EngineError, Result};
use crate::ops::result::{OperationResult, ResultMetadata};

/// Output of a transform plus the metadata fields it wants reported
struct Edit {
    buffer: SampleBuffer,
    extra: Map<String, Value>,
}

impl Edit {
    fn new(buffer: SampleBuffer) -> Self {
        Self {
            buffer,
            extra: Map::new(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// Sample-accurate audio editor
///
/// # Example
/// ```
/// use audioforge::engine::{encode, SampleBuffer};
/// use audioforge::AudioEditor;
///
/// let source = SampleBuffer::new(2, 44100, 44100);
/// let wav = encode(&source).unwrap();
///
/// let editor = AudioEditor::new();
/// let result = editor.trim_audio(wav.bytes(), 0.25, 0.75);
/// assert!(result.is_success());
/// assert_eq!(result.metadata().unwrap().frames, 22050);
/// ```
#[derive(Debug, Clone)]
pub struct AudioEditor<D: AudioDecoder = AutoDecoder> {
    decoder: D,
    config: EditorConfig,
}

impl AudioEditor<AutoDecoder> {
    /// Editor with the default decoder and configuration
    pub fn new() -> Self {
        Self::with_decoder(AutoDecoder::new())
    }
}

impl Default for AudioEditor<AutoDecoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: AudioDecoder> AudioEditor<D> {
    /// Editor backed by a custom decoder
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            config: EditorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Keep only `[start_time, end_time)` seconds of the input
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn trim_audio(
        &self,
        input: &[u8],
        start_time: f64,
        end_time: f64,
    ) -> OperationResult<EncodedAudio> {
        self.run("trim", input.len(), || {
            if !(start_time.is_finite() && end_time.is_finite()) || end_time <= start_time {
                return Err(EngineError::InvalidTimeRange {
                    start_secs: start_time,
                    end_secs: end_time,
                });
            }
            let buffer = self.decode(input)?;
            let trimmed = dsp::trim(&buffer, start_time, end_time)?;
            Ok(Edit::new(trimmed)
                .with("startTime", start_time)
                .with("endTime", end_time)
                .with("originalDuration", buffer.duration_secs()))
        })
    }

    /// Concatenate the inputs in order
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub fn merge_audio(&self, inputs: &[&[u8]]) -> OperationResult<EncodedAudio> {
        let original_size = inputs.iter().map(|b| b.len()).sum();
        self.run("merge", original_size, || {
            dsp::check_merge_inputs(inputs.len())?;
            let buffers = inputs
                .iter()
                .map(|bytes| self.decode(bytes))
                .collect::<Result<Vec<_>>>()?;
            let merged = dsp::merge(&buffers)?;
            Ok(Edit::new(merged).with("inputCount", inputs.len()))
        })
    }

    /// Scale the volume by a linear factor or a dB amount
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn boost_volume(
        &self,
        input: &[u8],
        options: &GainOptions,
    ) -> OperationResult<EncodedAudio> {
        self.run("gain", input.len(), || {
            options.validate()?;
            let buffer = self.decode(input)?;
            let mut edit = Edit::new(dsp::gain(&buffer, options))
                .with("multiplier", options.multiplier());
            if let Some(db) = options.volume_db {
                edit = edit.with("volumeDb", db);
            }
            Ok(edit)
        })
    }

    /// Apply fade-in / fade-out envelopes
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn fade_audio(
        &self,
        input: &[u8],
        options: &FadeOptions,
    ) -> OperationResult<EncodedAudio> {
        self.run("fade", input.len(), || {
            options.validate()?;
            let buffer = self.decode(input)?;
            Ok(Edit::new(dsp::fade(&buffer, options))
                .with("fadeInDuration", options.fade_in_duration)
                .with("fadeOutDuration", options.fade_out_duration))
        })
    }

    /// Change playback speed, optionally keeping pitch
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn change_speed(
        &self,
        input: &[u8],
        options: &SpeedOptions,
    ) -> OperationResult<EncodedAudio> {
        self.run("speed", input.len(), || {
            options.validate()?;
            let buffer = self.decode(input)?;
            self.check_frame_limit(dsp::speed_output_frames(buffer.frames(), options.speed))?;
            let changed = dsp::speed_change(&buffer, options)?;
            Ok(Edit::new(changed)
                .with("speed", options.speed)
                .with("preservePitch", options.preserve_pitch)
                .with("originalDuration", buffer.duration_secs()))
        })
    }

    /// Reverse the audio
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn reverse_audio(&self, input: &[u8]) -> OperationResult<EncodedAudio> {
        self.run("reverse", input.len(), || {
            let buffer = self.decode(input)?;
            Ok(Edit::new(dsp::reverse(&buffer)))
        })
    }

    /// Peak-normalize to `target_peak` (config default when `None`)
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn normalize_audio(
        &self,
        input: &[u8],
        target_peak: Option<f32>,
    ) -> OperationResult<EncodedAudio> {
        self.run("normalize", input.len(), || {
            let options =
                NormalizeOptions::new(target_peak.unwrap_or(self.config.default_target_peak));
            options.validate()?;
            let buffer = self.decode(input)?;
            let (normalized, report) = dsp::normalize_with_report(&buffer, &options);
            Ok(Edit::new(normalized)
                .with("targetPeak", options.target_peak)
                .with("originalPeak", report.original_peak)
                .with("appliedGain", report.applied_gain))
        })
    }

    /// Re-encode any decodable input as 16-bit PCM WAV
    #[instrument(skip(self, input), fields(bytes = input.len()))]
    pub fn convert_audio(&self, input: &[u8]) -> OperationResult<EncodedAudio> {
        self.run("convert", input.len(), || {
            let buffer = self.decode(input)?;
            Ok(Edit::new(buffer))
        })
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    /// Decode with configured limits applied
    fn decode(&self, input: &[u8]) -> Result<SampleBuffer> {
        if let Some(limit) = self.config.max_input_bytes {
            if input.len() > limit {
                return Err(EngineError::InputTooLarge {
                    size: input.len(),
                    limit,
                });
            }
        }

        let buffer = self.decoder.decode(input)?;
        debug!(
            decoder = self.decoder.name(),
            frames = buffer.frames(),
            channels = buffer.channel_count(),
            sample_rate = buffer.sample_rate(),
            "decoded input"
        );

        self.check_frame_limit(buffer.frames())?;
        if let Some((channel, frame)) = buffer.find_non_finite() {
            return Err(EngineError::NonFiniteSample { channel, frame });
        }
        Ok(buffer)
    }

    /// Enforce `max_decoded_frames` on decoded input and on transform output
    fn check_frame_limit(&self, frames: usize) -> Result<()> {
        match self.config.max_decoded_frames {
            Some(limit) if frames > limit => Err(EngineError::Resource {
                reason: format!("{} frames exceed the limit of {}", frames, limit),
            }),
            _ => Ok(()),
        }
    }

    /// Encode an edit and build its metadata
    fn finish(&self, original_size: usize, edit: Edit) -> Result<(EncodedAudio, ResultMetadata)> {
        self.check_frame_limit(edit.buffer.frames())?;
        let encoded = encode(&edit.buffer)?.with_tag(self.config.output_format_tag.clone());
        let sha256 = self
            .config
            .include_checksum
            .then(|| format!("{:x}", Sha256::digest(encoded.bytes())));

        let metadata = ResultMetadata {
            original_size,
            new_size: encoded.len(),
            format: encoded.format().to_string(),
            duration: edit.buffer.duration_secs(),
            sample_rate: edit.buffer.sample_rate(),
            channels: edit.buffer.channel_count(),
            frames: edit.buffer.frames(),
            sha256,
            extra: edit.extra,
        };
        Ok((encoded, metadata))
    }

    /// Run one operation and fold any error into the result
    fn run<F>(
        &self,
        operation: &'static str,
        original_size: usize,
        f: F,
    ) -> OperationResult<EncodedAudio>
    where
        F: FnOnce() -> Result<Edit>,
    {
        match f().and_then(|edit| self.finish(original_size, edit)) {
            Ok((data, metadata)) => {
                info!(
                    operation,
                    original_size,
                    new_size = metadata.new_size,
                    duration = metadata.duration,
                    "operation succeeded"
                );
                OperationResult::Success { data, metadata }
            }
            Err(err) => {
                warn!(
                    operation,
                    code = err.error_code(),
                    error = %err,
                    "operation failed"
                );
                OperationResult::failure(&err)
            }
        }
    }
}
