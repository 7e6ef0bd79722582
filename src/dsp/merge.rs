//! Merge
//!
//! Concatenates buffers end to end in argument order. The output has as many
//! channels as the widest input; narrower inputs repeat their last channel
//! onto the extra outputs (mono is duplicated to every channel).
//!
//! All inputs must share one sample rate. Mixed rates are rejected rather
//! than relabelled, since summing raw lengths at different rates would
//! change the pitch and timing of every input but the last.

use tracing::debug;

use crate::engine::SampleBuffer;
use crate::error::{EngineError, Result};

/// Minimum number of inputs accepted by [`merge`]
pub const MIN_MERGE_INPUTS: usize = 2;

/// Concatenate `buffers` into one buffer
///
/// # Errors
/// * `NotEnoughInputs` - fewer than two buffers
/// * `SampleRateMismatch` - an input's rate differs from the last input's
pub fn merge(buffers: &[SampleBuffer]) -> Result<SampleBuffer> {
    check_inputs(buffers.len())?;

    // Rate of the last input is the output rate.
    let sample_rate = buffers[buffers.len() - 1].sample_rate();
    if let Some((index, mismatched)) = buffers
        .iter()
        .enumerate()
        .find(|(_, b)| b.sample_rate() != sample_rate)
    {
        return Err(EngineError::SampleRateMismatch {
            index,
            expected: sample_rate,
            found: mismatched.sample_rate(),
        });
    }

    let channel_count = buffers
        .iter()
        .map(SampleBuffer::channel_count)
        .max()
        .unwrap_or(1);
    let total_frames: usize = buffers.iter().map(SampleBuffer::frames).sum();

    let mut channels = vec![Vec::with_capacity(total_frames); channel_count];
    for buffer in buffers {
        let last_input_channel = buffer.channel_count() - 1;
        for (c, output) in channels.iter_mut().enumerate() {
            output.extend_from_slice(buffer.channel(c.min(last_input_channel)));
        }
    }

    debug!(
        inputs = buffers.len(),
        channels = channel_count,
        frames = total_frames,
        sample_rate,
        "merged"
    );
    Ok(SampleBuffer::from_parts(channels, sample_rate))
}

/// Validate the input count before any decoding happens
pub fn check_inputs(count: usize) -> Result<()> {
    if count < MIN_MERGE_INPUTS {
        return Err(EngineError::NotEnoughInputs { given: count });
    }
    Ok(())
}
