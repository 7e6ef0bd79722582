//! Peak normalization
//!
//! Two passes over the data: a scan for the global peak across every
//! channel, then a uniform scale so that peak lands on `target_peak`.
//! Silence (peak 0) is returned unchanged.

use serde::{Deserialize, Serialize};

use crate::engine::SampleBuffer;
use crate::error::{EngineError, Result};

/// Default normalization target
pub const DEFAULT_TARGET_PEAK: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Absolute peak to scale to, within [0, 1]
    pub target_peak: f32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target_peak: DEFAULT_TARGET_PEAK,
        }
    }
}

impl NormalizeOptions {
    pub fn new(target_peak: f32) -> Self {
        Self { target_peak }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.target_peak) {
            return Err(EngineError::invalid(
                "targetPeak",
                format!("must be within [0, 1], got {}", self.target_peak),
            ));
        }
        Ok(())
    }
}

/// What the scan pass found and what gain was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeReport {
    pub original_peak: f32,
    pub applied_gain: f32,
}

/// Scale the buffer so its absolute peak equals `target_peak`
pub fn normalize(buffer: &SampleBuffer, options: &NormalizeOptions) -> SampleBuffer {
    normalize_with_report(buffer, options).0
}

/// [`normalize`], also returning the scanned peak and gain
pub fn normalize_with_report(
    buffer: &SampleBuffer,
    options: &NormalizeOptions,
) -> (SampleBuffer, NormalizeReport) {
    // Scan
    let original_peak = buffer.peak();
    let applied_gain = if original_peak > 0.0 {
        options.target_peak / original_peak
    } else {
        1.0
    };

    // Apply
    let output = buffer.map_samples(|_, s| (s * applied_gain).clamp(-1.0, 1.0));

    (
        output,
        NormalizeReport {
            original_peak,
            applied_gain,
        },
    )
}
