//! Editor configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to
//! its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::DEFAULT_TARGET_PEAK;
use crate::engine::CONTAINER_FORMAT;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Normalization target used when the caller does not give one
    pub default_target_peak: f32,
    /// Reject inputs larger than this many bytes
    pub max_input_bytes: Option<usize>,
    /// Reject decoded audio longer than this many frames per channel
    pub max_decoded_frames: Option<usize>,
    /// Extension used when naming outputs (the container is always WAV)
    pub output_format_tag: String,
    /// Add a SHA-256 of the output to the result metadata
    pub include_checksum: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_target_peak: DEFAULT_TARGET_PEAK,
            max_input_bytes: None,
            max_decoded_frames: None,
            output_format_tag: CONTAINER_FORMAT.to_string(),
            include_checksum: true,
        }
    }
}

impl EditorConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: EditorConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_target_peak) {
            return Err(EngineError::invalid(
                "default_target_peak",
                format!("must be within [0, 1], got {}", self.default_target_peak),
            ));
        }
        if self.output_format_tag.is_empty()
            || !self
                .output_format_tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(EngineError::invalid(
                "output_format_tag",
                format!("must be a plain file extension, got {:?}", self.output_format_tag),
            ));
        }
        if self.max_decoded_frames == Some(0) {
            return Err(EngineError::invalid(
                "max_decoded_frames",
                "must be positive when set",
            ));
        }
        Ok(())
    }
}
