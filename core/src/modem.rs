//! Baseband audio modem: one hard PCM level per bit, 48 kHz carrier.
//!
//! There is no pulse shaping and no clock recovery. The demodulator assumes the
//! first sample of the PCM data is the first sample of the first symbol.

use crate::error::{PocsagError, Result};
use crate::{DEFAULT_AMPLITUDE, SAMPLE_RATE};

/// Symbol rates a POCSAG transmitter uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaudRate {
    Baud512,
    #[default]
    Baud1200,
    Baud2400,
}

impl BaudRate {
    pub const ALL: [BaudRate; 3] = [BaudRate::Baud512, BaudRate::Baud1200, BaudRate::Baud2400];

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::Baud512 => 512,
            BaudRate::Baud1200 => 1200,
            BaudRate::Baud2400 => 2400,
        }
    }

    /// Whole samples per bit. 512 baud truncates 93.75 to 93.
    pub fn samples_per_symbol(self) -> usize {
        (SAMPLE_RATE / self.as_u32()) as usize
    }

    /// multimon-ng demodulator name for this rate
    pub fn multimon_mode(self) -> &'static str {
        match self {
            BaudRate::Baud512 => "POCSAG512",
            BaudRate::Baud1200 => "POCSAG1200",
            BaudRate::Baud2400 => "POCSAG2400",
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = PocsagError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            512 => Ok(BaudRate::Baud512),
            1200 => Ok(BaudRate::Baud1200),
            2400 => Ok(BaudRate::Baud2400),
            other => Err(PocsagError::UnsupportedBaudRate(other)),
        }
    }
}

impl std::fmt::Display for BaudRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Modem settings shared by encoder and decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemConfig {
    pub baud_rate: BaudRate,
    /// Magnitude of both symbol levels: bit 0 is `+amplitude`, bit 1 `-amplitude`
    pub amplitude: i16,
}

impl ModemConfig {
    pub fn with_baud_rate(baud_rate: BaudRate) -> Self {
        Self {
            baud_rate,
            ..Self::default()
        }
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            baud_rate: BaudRate::default(),
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

pub struct Modulator {
    samples_per_symbol: usize,
    level: i16,
}

impl Modulator {
    pub fn new(config: &ModemConfig) -> Self {
        Self {
            samples_per_symbol: config.baud_rate.samples_per_symbol(),
            level: config.amplitude.checked_abs().unwrap_or(i16::MAX),
        }
    }

    /// Bytes to PCM, MSB of each byte first, each bit held for a whole symbol
    pub fn modulate(&self, data: &[u8]) -> Vec<i16> {
        let mut samples = Vec::with_capacity(data.len() * 8 * self.samples_per_symbol);

        for &byte in data {
            for i in (0..8).rev() {
                let sample = if (byte >> i) & 1 == 1 { -self.level } else { self.level };
                samples.extend(std::iter::repeat(sample).take(self.samples_per_symbol));
            }
        }

        samples
    }
}

pub struct Demodulator {
    samples_per_symbol: usize,
}

impl Demodulator {
    pub fn new(config: &ModemConfig) -> Self {
        Self {
            samples_per_symbol: config.baud_rate.samples_per_symbol(),
        }
    }

    /// One decision per whole symbol window: a negative mean is a 1.
    /// A trailing partial window is dropped.
    pub fn symbol_decisions(&self, samples: &[i16]) -> Vec<bool> {
        samples
            .chunks_exact(self.samples_per_symbol)
            .map(|window| {
                let sum: i64 = window.iter().map(|&s| s as i64).sum();
                sum / (self.samples_per_symbol as i64) < 0
            })
            .collect()
    }

    /// PCM to bytes, 8 decisions per byte MSB first; leftover bits are dropped
    pub fn demodulate(&self, samples: &[i16]) -> Vec<u8> {
        self.symbol_decisions(samples)
            .chunks_exact(8)
            .map(|bits| {
                bits.iter()
                    .fold(0u8, |byte, &bit| (byte << 1) | bit as u8)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_per_symbol() {
        assert_eq!(BaudRate::Baud512.samples_per_symbol(), 93);
        assert_eq!(BaudRate::Baud1200.samples_per_symbol(), 40);
        assert_eq!(BaudRate::Baud2400.samples_per_symbol(), 20);
    }

    #[test]
    fn test_baud_rate_try_from() {
        assert_eq!(BaudRate::try_from(512).unwrap(), BaudRate::Baud512);
        assert_eq!(BaudRate::try_from(2400).unwrap(), BaudRate::Baud2400);
        assert!(matches!(
            BaudRate::try_from(9600),
            Err(PocsagError::UnsupportedBaudRate(9600))
        ));
    }

    #[test]
    fn test_multimon_mode() {
        assert_eq!(BaudRate::Baud1200.multimon_mode(), "POCSAG1200");
    }

    #[test]
    fn test_modulate_levels_and_length() {
        let modulator = Modulator::new(&ModemConfig::default());
        let samples = modulator.modulate(&[0x80]);

        assert_eq!(samples.len(), 8 * 40);
        assert!(samples[..40].iter().all(|&s| s == -12287));
        assert!(samples[40..].iter().all(|&s| s == 12287));
    }

    #[test]
    fn test_modulate_demodulate_all_rates() {
        let data: Vec<u8> = (0..=255u8).collect();
        for baud_rate in BaudRate::ALL {
            let config = ModemConfig::with_baud_rate(baud_rate);
            let samples = Modulator::new(&config).modulate(&data);
            assert_eq!(Demodulator::new(&config).demodulate(&samples), data, "{} baud", baud_rate);
        }
    }

    #[test]
    fn test_demodulate_drops_partial_symbol_and_byte() {
        let config = ModemConfig::default();
        let mut samples = Modulator::new(&config).modulate(&[0xC3]);
        // 7 extra symbols and a half: not enough for another byte
        samples.extend(vec![-100i16; 7 * 40 + 20]);
        assert_eq!(Demodulator::new(&config).demodulate(&samples), vec![0xC3]);
    }

    #[test]
    fn test_demodulate_uses_window_mean() {
        let config = ModemConfig::default();
        let demodulator = Demodulator::new(&config);

        // Mostly positive with a few deep negative spikes: mean stays positive
        let mut window = vec![1000i16; 40];
        window[0] = -5000;
        window[1] = -5000;
        assert_eq!(demodulator.symbol_decisions(&window), vec![false]);

        // Truncating division: mean of -39/40 rounds to zero, which is a 0 bit
        let mut window = vec![0i16; 40];
        window[0] = -39;
        assert_eq!(demodulator.symbol_decisions(&window), vec![false]);
    }

    #[test]
    fn test_custom_amplitude() {
        let config = ModemConfig {
            baud_rate: BaudRate::Baud2400,
            amplitude: i16::MIN,
        };
        let samples = Modulator::new(&config).modulate(&[0x01]);
        assert_eq!(samples[0], i16::MAX);
        assert_eq!(*samples.last().unwrap(), -i16::MAX);
    }
}
