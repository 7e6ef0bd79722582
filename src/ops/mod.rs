//! Operations
//!
//! Orchestration of decode -> transform -> encode behind a uniform result.

pub mod editor;
pub mod result;

pub use editor::AudioEditor;
pub use result::{OperationResult, ResultMetadata};
