//! Error handling for Audioforge
//!
//! Every error falls into one of three kinds (decode, validation, resource)
//! and carries a stable error code plus recovery suggestions.

use thiserror::Error;

/// Result type alias for Audioforge operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Broad classification of an [`EngineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input bytes are not a decodable audio container
    Decode,
    /// Caller-supplied parameters are invalid for the operation
    Validation,
    /// A transient decode/encode resource failed or a limit was hit
    Resource,
}

/// Main error type for Audioforge operations
#[derive(Error, Debug)]
pub enum EngineError {
    // Decode Errors
    #[error("Audio input is empty")]
    EmptyInput,

    #[error("Unable to decode audio: {reason}")]
    Decode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Decoded audio contains NaN/Inf at channel {channel}, frame {frame}")]
    NonFiniteSample { channel: usize, frame: usize },

    // Validation Errors
    #[error("Invalid time range")]
    InvalidTimeRange { start_secs: f64, end_secs: f64 },

    #[error("At least 2 audio files required for merging")]
    NotEnoughInputs { given: usize },

    #[error("Sample rate mismatch: input {index} is {found} Hz, expected {expected} Hz")]
    SampleRateMismatch {
        index: usize,
        expected: u32,
        found: u32,
    },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Malformed sample buffer: {reason}")]
    MalformedBuffer { reason: String },

    // Resource Errors
    #[error("Audio processing resource failed: {reason}")]
    Resource { reason: String },

    #[error("Input too large: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Shorthand for a decode failure wrapping an underlying error
    pub(crate) fn decode<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EngineError::Decode {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for an invalid parameter
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::EmptyInput => "EMPTY_INPUT",
            EngineError::Decode { .. } => "DECODE_ERROR",
            EngineError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            EngineError::NonFiniteSample { .. } => "NON_FINITE_SAMPLE",
            EngineError::InvalidTimeRange { .. } => "INVALID_TIME_RANGE",
            EngineError::NotEnoughInputs { .. } => "NOT_ENOUGH_INPUTS",
            EngineError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            EngineError::InvalidParameter { .. } => "INVALID_PARAMETER",
            EngineError::MalformedBuffer { .. } => "MALFORMED_BUFFER",
            EngineError::Resource { .. } => "RESOURCE_ERROR",
            EngineError::InputTooLarge { .. } => "INPUT_TOO_LARGE",
            EngineError::Io(_) => "IO_ERROR",
            EngineError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptyInput
            | EngineError::Decode { .. }
            | EngineError::UnsupportedFormat { .. }
            | EngineError::NonFiniteSample { .. } => ErrorKind::Decode,
            EngineError::InvalidTimeRange { .. }
            | EngineError::NotEnoughInputs { .. }
            | EngineError::SampleRateMismatch { .. }
            | EngineError::InvalidParameter { .. }
            | EngineError::MalformedBuffer { .. } => ErrorKind::Validation,
            EngineError::Resource { .. }
            | EngineError::InputTooLarge { .. }
            | EngineError::Io(_)
            | EngineError::Serialization(_) => ErrorKind::Resource,
        }
    }

    /// Check if the caller can recover by changing its input
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::Decode)
    }

    /// Message safe to show at the operation boundary.
    ///
    /// Resource failures are reported generically; everything else verbatim.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Resource => "Audio processing failed".to_string(),
            _ => self.to_string(),
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            EngineError::EmptyInput => vec!["Select a non-empty audio file"],
            EngineError::Decode { .. } | EngineError::UnsupportedFormat { .. } => vec![
                "Check if the file plays in another application",
                "Convert the file to WAV, FLAC, MP3 or OGG first",
            ],
            EngineError::NonFiniteSample { .. } => vec![
                "Re-export the file from its source application",
                "Check the file for corrupt floating-point samples",
            ],
            EngineError::InvalidTimeRange { .. } => vec![
                "Make sure the end time is after the start time",
                "Keep both times within the audio duration",
            ],
            EngineError::NotEnoughInputs { .. } => vec!["Add at least two audio files"],
            EngineError::SampleRateMismatch { .. } => vec![
                "Convert all inputs to the same sample rate before merging",
            ],
            EngineError::InputTooLarge { .. } => vec![
                "Process a shorter audio segment",
                "Raise max_input_bytes in the editor configuration",
            ],
            _ => vec![],
        }
    }
}
