//! Audioforge - Sample-Accurate Audio Editing Engine
//!
//! Decodes compressed or PCM audio into raw sample buffers, edits them with
//! pure per-sample transforms, and re-encodes the result as 16-bit PCM WAV.
//!
//! # Architecture
//!
//! Data flows strictly in one direction:
//! - Decode: container bytes -> [`SampleBuffer`](engine::SampleBuffer)
//! - Transform: trim, merge, gain, fade, speed, reverse, normalize ([`dsp`])
//! - Encode: [`SampleBuffer`](engine::SampleBuffer) -> WAV bytes
//!
//! [`AudioEditor`] wires the stages together and returns an
//! [`OperationResult`] for every call.

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod ops;

pub use config::EditorConfig;
pub use error::{EngineError, ErrorKind, Result};
pub use ops::{AudioEditor, OperationResult, ResultMetadata};
