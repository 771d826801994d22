//! Bring arbitrary PCM captures onto the 48 kHz mono carrier the demodulator expects.
//!
//! Linear interpolation only. Good enough for hard-keyed symbols, where the
//! demodulator averages whole symbol windows anyway.

/// Average interleaved channels into one
pub fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks_exact(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Resample from `from_rate` to `to_rate` Hz
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let new_len = ((samples.len() as u64 * to_rate as u64) / from_rate as u64) as usize;
    let last = samples.len() - 1;

    (0..new_len)
        .map(|i| {
            let position = i as f64 * step;
            let index = (position.floor() as usize).min(last);
            let next = (index + 1).min(last);
            let fraction = position - index as f64;

            let value = samples[index] as f64 * (1.0 - fraction) + samples[next] as f64 * fraction;
            value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        assert_eq!(downmix(&[100, 300, -200, -400], 2), vec![200, -300]);
    }

    #[test]
    fn test_downmix_mono_is_identity() {
        assert_eq!(downmix(&[1, 2, 3], 1), vec![1, 2, 3]);
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        assert_eq!(downmix(&[10, 20, 30], 2), vec![15]);
    }

    #[test]
    fn test_resample_same_rate() {
        let samples = vec![1i16, -2, 3];
        assert_eq!(resample(&samples, 48000, 48000), samples);
    }

    #[test]
    fn test_resample_upsample_length_and_values() {
        let samples = vec![0i16, 300, 600, 900];
        let resampled = resample(&samples, 16000, 48000);
        assert_eq!(resampled.len(), 12);
        assert_eq!(resampled[0], 0);
        assert_eq!(resampled[1], 100);
        assert_eq!(resampled[3], 300);
    }

    #[test]
    fn test_resample_downsample() {
        let samples: Vec<i16> = (0..96).map(|i| i as i16).collect();
        let resampled = resample(&samples, 96000, 48000);
        assert_eq!(resampled.len(), 48);
        assert_eq!(resampled[10], 20);
    }

    #[test]
    fn test_resample_keeps_square_wave_sign() {
        // 44.1 kHz square wave, one level per 36.75 samples, like 1200 baud
        let samples: Vec<i16> = (0..44100)
            .map(|i| if (i * 1200 / 44100) % 2 == 0 { 12287 } else { -12287 })
            .collect();
        let resampled = resample(&samples, 44100, 48000);
        assert_eq!(resampled.len(), 48000);
        // Middle of the second symbol (samples 40..80 at 48 kHz) is negative
        assert!(resampled[60] < 0);
        assert!(resampled[20] > 0);
    }
}
