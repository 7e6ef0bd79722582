//! Gain / volume boost
//!
//! Scales every sample by a linear multiplier and clamps to [-1, 1] so the
//! result can't wrap when quantized.

use serde::{Deserialize, Serialize};

use crate::engine::{db_to_linear, SampleBuffer};
use crate::error::{EngineError, Result};

/// Gain parameters
///
/// `volume_db` wins over `volume` when both are set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GainOptions {
    /// Linear multiplier (1.0 = unchanged)
    pub volume: f32,
    /// Gain in decibels
    pub volume_db: Option<f32>,
}

impl Default for GainOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            volume_db: None,
        }
    }
}

impl GainOptions {
    pub fn linear(volume: f32) -> Self {
        Self {
            volume,
            volume_db: None,
        }
    }

    pub fn decibels(volume_db: f32) -> Self {
        Self {
            volume_db: Some(volume_db),
            ..Self::default()
        }
    }

    /// Effective linear multiplier
    pub fn multiplier(&self) -> f32 {
        match self.volume_db {
            Some(db) => db_to_linear(db),
            None => self.volume,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(db) = self.volume_db {
            if !db.is_finite() {
                return Err(EngineError::invalid("volumeDb", "must be a finite number"));
            }
            if !self.multiplier().is_finite() {
                return Err(EngineError::invalid(
                    "volumeDb",
                    format!("{} dB overflows the linear multiplier", db),
                ));
            }
        } else if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(EngineError::invalid(
                "volume",
                format!("must be a non-negative finite number, got {}", self.volume),
            ));
        }
        Ok(())
    }
}

/// Apply gain: `out = clamp(in * multiplier, -1, 1)`
pub fn gain(buffer: &SampleBuffer, options: &GainOptions) -> SampleBuffer {
    let multiplier = options.multiplier();
    buffer.map_samples(|_, s| (s * multiplier).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_buffer() -> SampleBuffer {
        SampleBuffer::from_channels(
            vec![vec![0.0, 0.25, -0.5, 0.9], vec![-0.1, 0.2, 0.3, -0.8]],
            8000,
        )
        .unwrap()
    }

    #[test]
    fn test_unity_gain_is_identity() {
        let buffer = test_buffer();
        assert_eq!(gain(&buffer, &GainOptions::linear(1.0)), buffer);
        assert_eq!(gain(&buffer, &GainOptions::default()), buffer);
        assert_eq!(gain(&buffer, &GainOptions::decibels(0.0)), buffer);
    }

    #[test]
    fn test_linear_gain() {
        let out = gain(&test_buffer(), &GainOptions::linear(0.5));
        assert_relative_eq!(out.channel(0)[1], 0.125);
        assert_relative_eq!(out.channel(0)[2], -0.25);
    }

    #[test]
    fn test_db_gain_overrides_volume() {
        let options = GainOptions {
            volume: 3.0,
            volume_db: Some(-6.0206),
        };
        assert_relative_eq!(options.multiplier(), 0.5, epsilon = 1e-4);

        let out = gain(&test_buffer(), &options);
        assert_relative_eq!(out.channel(0)[1], 0.125, epsilon = 1e-4);
    }

    #[test]
    fn test_gain_clamps() {
        let out = gain(&test_buffer(), &GainOptions::linear(4.0));
        assert_eq!(out.channel(0)[3], 1.0);
        assert_eq!(out.channel(1)[3], -1.0);
        assert_eq!(out.channel(0)[1], 1.0);
        assert!(out.peak() <= 1.0);
    }

    #[test]
    fn test_validate() {
        assert!(GainOptions::linear(2.0).validate().is_ok());
        assert!(GainOptions::linear(-1.0).validate().is_err());
        assert!(GainOptions::linear(f32::NAN).validate().is_err());
        assert!(GainOptions::decibels(f32::INFINITY).validate().is_err());
        assert!(GainOptions::decibels(-12.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overflowing_db() {
        let options = GainOptions::decibels(1000.0);
        assert!(!options.multiplier().is_finite());
        let err = options.validate().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter {
                name: "volumeDb",
                ..
            }
        ));

        // large but representable gains still pass and clamp
        let options = GainOptions::decibels(300.0);
        assert!(options.validate().is_ok());
        let buffer = SampleBuffer::from_channels(vec![vec![0.0, 0.5, -0.5]], 8000).unwrap();
        assert_eq!(gain(&buffer, &options).channel(0), &[0.0, 1.0, -1.0]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: GainOptions = serde_json::from_str(r#"{"volumeDb": 6.0}"#).unwrap();
        assert_eq!(options.volume_db, Some(6.0));
        assert_eq!(options.volume, 1.0);
    }
}
