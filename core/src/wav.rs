//! Minimal RIFF/WAVE container: 44-byte PCM header, 48 kHz, 16-bit mono.

use crate::error::{PocsagError, Result};
use crate::{BITS_PER_SAMPLE, NUM_CHANNELS, SAMPLE_RATE, WAV_HEADER_SIZE};

/// Wrap little-endian 16-bit mono samples in a canonical WAV header
pub fn write_wav(samples: &[i16]) -> Vec<u8> {
    let data_size = u32::try_from(samples.len() * 2).unwrap_or(u32::MAX);
    let riff_size = data_size.saturating_add(36);
    let block_align = NUM_CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = SAMPLE_RATE * block_align as u32;

    let mut wav = Vec::with_capacity(WAV_HEADER_SIZE + samples.len() * 2);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&NUM_CHANNELS.to_le_bytes());
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());

    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

/// Samples after the fixed 44-byte header. The header itself is not
/// interpreted, and an odd trailing byte is ignored.
pub fn pcm_samples(wav: &[u8]) -> Result<Vec<i16>> {
    if wav.len() < WAV_HEADER_SIZE {
        return Err(PocsagError::WavTooShort { len: wav.len() });
    }

    if &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        log::warn!("missing RIFF/WAVE magic, reading samples after byte 44 anyway");
    }

    Ok(wav[WAV_HEADER_SIZE..]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let wav = write_wav(&[1, -1, 300]);

        assert_eq!(wav.len(), WAV_HEADER_SIZE + 6);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 42);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u16::from_le_bytes([wav[20], wav[21]]), 1);
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 48000);
        assert_eq!(u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]), 96000);
        assert_eq!(u16::from_le_bytes([wav[32], wav[33]]), 2);
        assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 6);
    }

    #[test]
    fn test_samples_round_trip() {
        let samples = vec![0i16, 12287, -12287, i16::MIN, i16::MAX];
        assert_eq!(pcm_samples(&write_wav(&samples)).unwrap(), samples);
    }

    #[test]
    fn test_too_short_rejected() {
        for len in [0usize, 1, 43] {
            match pcm_samples(&vec![0u8; len]) {
                Err(PocsagError::WavTooShort { len: reported }) => assert_eq!(reported, len),
                other => panic!("expected WavTooShort, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(pcm_samples(&write_wav(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_odd_trailing_byte_ignored() {
        let mut wav = write_wav(&[5, 6]);
        wav.push(0xFF);
        assert_eq!(pcm_samples(&wav).unwrap(), vec![5, 6]);
    }
}
