//! Audio Engine Module
//!
//! The container-facing stages of the pipeline:
//! - Sample buffer (canonical in-memory representation)
//! - Decoding (bytes -> samples)
//! - Encoding (samples -> 16-bit PCM WAV)

pub mod buffer;
pub mod decode;
pub mod encode;

pub use buffer::{db_to_linear, SampleBuffer};
pub use decode::{is_wav, AudioDecoder, AutoDecoder, SymphoniaDecoder, WavDecoder};
pub use encode::{encode, quantize, EncodedAudio, CONTAINER_FORMAT, WAV_HEADER_LEN};
