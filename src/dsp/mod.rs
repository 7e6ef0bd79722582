//! Sample-domain transforms
//!
//! Pure functions over [`SampleBuffer`](crate::engine::SampleBuffer). Each
//! borrows its input and returns a freshly allocated buffer; none of them
//! touch decoders, encoders or containers, so they can be exercised with
//! synthetic sample arrays.

mod fade;
mod gain;
mod merge;
mod normalize;
mod reverse;
mod speed;
mod trim;

pub use fade::{fade, FadeOptions};
pub use gain::{gain, GainOptions};
pub use merge::{check_inputs as check_merge_inputs, merge, MIN_MERGE_INPUTS};
pub use normalize::{
    normalize, normalize_with_report, NormalizeOptions, NormalizeReport, DEFAULT_TARGET_PEAK,
};
pub use reverse::reverse;
pub use speed::{output_frames as speed_output_frames, speed_change, SpeedOptions};
pub use trim::trim;
