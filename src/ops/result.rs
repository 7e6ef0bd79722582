//! Uniform operation results
//!
//! Every public editor operation returns an [`OperationResult`]; errors are
//! folded into the `Failure` variant at the boundary instead of propagating.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::EngineError;

/// Metadata attached to a successful operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Total size of the input bytes
    pub original_size: usize,
    /// Size of the encoded output
    pub new_size: usize,
    /// Output container, always "wav"
    pub format: String,
    /// Output duration in seconds
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: usize,
    pub frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Operation-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultMetadata {
    /// Look up an operation-specific field
    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }
}

/// Outcome of an editor operation
#[derive(Debug, Clone)]
pub enum OperationResult<T> {
    Success { data: T, metadata: ResultMetadata },
    Failure { error: String, code: &'static str },
}

impl<T> OperationResult<T> {
    /// Fold an engine error into a failure
    pub fn failure(err: &EngineError) -> Self {
        OperationResult::Failure {
            error: err.public_message(),
            code: err.error_code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            OperationResult::Success { data, .. } => Some(data),
            OperationResult::Failure { .. } => None,
        }
    }

    pub fn metadata(&self) -> Option<&ResultMetadata> {
        match self {
            OperationResult::Success { metadata, .. } => Some(metadata),
            OperationResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure { code, .. } => Some(code),
        }
    }

    /// Convert into a std `Result`, keeping the failure message
    pub fn into_result(self) -> std::result::Result<(T, ResultMetadata), String> {
        match self {
            OperationResult::Success { data, metadata } => Ok((data, metadata)),
            OperationResult::Failure { error, .. } => Err(error),
        }
    }

    /// JSON summary without the payload
    ///
    /// `{"success": true, "metadata": {...}}` or
    /// `{"success": false, "error": "...", "code": "..."}`
    pub fn to_json(&self) -> Value {
        match self {
            OperationResult::Success { metadata, .. } => json!({
                "success": true,
                "metadata": metadata,
            }),
            OperationResult::Failure { error, code } => json!({
                "success": false,
                "error": error,
                "code": code,
            }),
        }
    }
}
