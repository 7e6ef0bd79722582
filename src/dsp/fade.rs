//! Fade in / fade out
//!
//! Multiplies the buffer by a linear envelope. The fade-in ramp rises as
//! `i / fade_in_frames`, the fade-out ramp falls as
//! `(frames - i) / fade_out_frames`; where the two overlap their gains
//! multiply. The same envelope is applied to every channel.

use serde::{Deserialize, Serialize};

use crate::engine::SampleBuffer;
use crate::error::{EngineError, Result};

/// Fade durations in seconds (0 = no fade)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FadeOptions {
    pub fade_in_duration: f64,
    pub fade_out_duration: f64,
}

impl FadeOptions {
    pub fn new(fade_in_duration: f64, fade_out_duration: f64) -> Self {
        Self {
            fade_in_duration,
            fade_out_duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fadeInDuration", self.fade_in_duration),
            ("fadeOutDuration", self.fade_out_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::invalid(
                    name,
                    format!("must be a non-negative number of seconds, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

/// Envelope length in frames: `floor(seconds * rate)`
fn ramp_frames(seconds: f64, sample_rate: u32) -> usize {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * sample_rate as f64).floor() as usize
    } else {
        0
    }
}

/// Gain of the envelope at `frame`
#[inline]
fn envelope(frame: usize, frames: usize, fade_in: usize, fade_out: usize) -> f32 {
    let mut g = 1.0_f32;
    if fade_in > 0 && frame < fade_in {
        g *= frame as f32 / fade_in as f32;
    }
    if fade_out > 0 && frame >= frames.saturating_sub(fade_out) {
        g *= (frames - frame) as f32 / fade_out as f32;
    }
    g
}

/// Apply fade-in and fade-out envelopes
pub fn fade(buffer: &SampleBuffer, options: &FadeOptions) -> SampleBuffer {
    let frames = buffer.frames();
    let fade_in = ramp_frames(options.fade_in_duration, buffer.sample_rate());
    let fade_out = ramp_frames(options.fade_out_duration, buffer.sample_rate());

    if fade_in == 0 && fade_out == 0 {
        return buffer.clone();
    }

    let gains: Vec<f32> = (0..frames)
        .map(|i| envelope(i, frames, fade_in, fade_out))
        .collect();

    buffer.map_samples(|frame, s| s * gains[frame])
}
