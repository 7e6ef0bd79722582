//! Reverse

use crate::engine::SampleBuffer;

/// Play the buffer backwards: `out[c][i] = in[c][frames - 1 - i]`
pub fn reverse(buffer: &SampleBuffer) -> SampleBuffer {
    let channels = buffer
        .channels()
        .iter()
        .map(|channel| channel.iter().rev().copied().collect())
        .collect();

    SampleBuffer::from_parts(channels, buffer.sample_rate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_order() {
        let buffer =
            SampleBuffer::from_channels(vec![vec![0.1, 0.2, 0.3], vec![-0.1, -0.2, -0.3]], 8000)
                .unwrap();
        let reversed = reverse(&buffer);

        assert_eq!(reversed.channel(0), &[0.3, 0.2, 0.1]);
        assert_eq!(reversed.channel(1), &[-0.3, -0.2, -0.1]);
        assert_eq!(reversed.sample_rate(), 8000);
    }

    #[test]
    fn test_reverse_is_involution() {
        let data: Vec<f32> = (0..257).map(|i| (i as f32 * 0.37).sin()).collect();
        let buffer = SampleBuffer::from_channels(vec![data.clone(), data], 22050).unwrap();
        assert_eq!(reverse(&reverse(&buffer)), buffer);
    }

    #[test]
    fn test_reverse_empty() {
        let buffer = SampleBuffer::new(2, 0, 8000);
        assert_eq!(reverse(&buffer), buffer);
    }
}
