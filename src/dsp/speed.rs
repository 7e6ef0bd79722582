//! Speed change
//!
//! Both paths produce `floor(frames / speed)` output frames at the original
//! sample rate tag:
//! - pitch-preserving: nearest-neighbour frame selection, `src = floor(i * speed)`
//! - natural: the source is read at `speed`x with linear interpolation
//!   between adjacent frames, so pitch moves with tempo as it would when
//!   changing the playback rate

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::SampleBuffer;
use crate::error::{EngineError, Result};

/// Speed change parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeedOptions {
    /// Playback multiplier (>1 faster/shorter, <1 slower/longer)
    pub speed: f64,
    pub preserve_pitch: bool,
}

impl Default for SpeedOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            preserve_pitch: false,
        }
    }
}

impl SpeedOptions {
    pub fn new(speed: f64, preserve_pitch: bool) -> Self {
        Self {
            speed,
            preserve_pitch,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(EngineError::invalid(
                "speed",
                format!("must be a positive finite multiplier, got {}", self.speed),
            ));
        }
        Ok(())
    }
}

/// Largest output, in samples across all channels, a speed change may
/// produce; a 16-bit WAV data chunk can't address more.
const MAX_OUTPUT_SAMPLES: f64 = (u32::MAX / 2) as f64;

/// Output length for a speed change: `floor(frames / speed)`
pub fn output_frames(frames: usize, speed: f64) -> usize {
    (frames as f64 / speed).floor() as usize
}

/// Change playback speed
///
/// # Errors
/// * `InvalidParameter` - `speed` is zero, negative, or not finite
/// * `Resource` - the slowed-down output would be too long to encode
pub fn speed_change(buffer: &SampleBuffer, options: &SpeedOptions) -> Result<SampleBuffer> {
    options.validate()?;

    let speed = options.speed;
    let stretched_samples = buffer.frames() as f64 / speed * buffer.channel_count() as f64;
    if stretched_samples > MAX_OUTPUT_SAMPLES {
        return Err(EngineError::Resource {
            reason: format!(
                "speed {} would stretch {} frames x {} channels past the encodable length",
                speed,
                buffer.frames(),
                buffer.channel_count()
            ),
        });
    }
    let new_frames = output_frames(buffer.frames(), speed);

    let channels = buffer
        .channels()
        .iter()
        .map(|channel| {
            if options.preserve_pitch {
                select_nearest(channel, new_frames, speed)
            } else {
                read_interpolated(channel, new_frames, speed)
            }
        })
        .collect();

    debug!(
        speed,
        preserve_pitch = options.preserve_pitch,
        frames_in = buffer.frames(),
        frames_out = new_frames,
        "speed changed"
    );
    Ok(SampleBuffer::from_parts(channels, buffer.sample_rate()))
}

/// Nearest-neighbour frame selection
fn select_nearest(samples: &[f32], new_frames: usize, speed: f64) -> Vec<f32> {
    let last = samples.len().saturating_sub(1);
    (0..new_frames)
        .map(|i| {
            let src = ((i as f64 * speed).floor() as usize).min(last);
            samples[src]
        })
        .collect()
}

/// Linear interpolation resampling at `speed`x
fn read_interpolated(samples: &[f32], new_frames: usize, speed: f64) -> Vec<f32> {
    let source_len = samples.len();
    let mut output = Vec::with_capacity(new_frames);

    for i in 0..new_frames {
        let src_pos = i as f64 * speed;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            samples[source_len - 1]
        };

        output.push(sample);
    }

    output
}
