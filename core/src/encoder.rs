use crate::address::FunctionCode;
use crate::error::Result;
use crate::framing::{BatchEncoder, Message};
use crate::modem::{ModemConfig, Modulator};
use crate::wav::write_wav;

/// Pages in, WAV file out
///
/// Builds the raw protocol stream (preamble, sync words, codewords), keys it as
/// hard PCM levels at the configured baud rate and wraps it in a 44-byte WAV
/// header. Output is deterministic for a given input and configuration.
pub struct Encoder {
    config: ModemConfig,
    modulator: Modulator,
}

impl Encoder {
    pub fn new(config: ModemConfig) -> Self {
        Self {
            config,
            modulator: Modulator::new(&config),
        }
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    /// Encode a burst of pages, in order, into one WAV file
    ///
    /// # Arguments
    /// * `messages` - Pages to transmit; they share batches back to back
    ///
    /// # Returns
    /// A complete 48 kHz, 16-bit mono WAV file (44-byte header plus PCM), or
    /// `ToneOnlyUnsupported` / `ReservedAddress` if a page cannot be sent
    pub fn encode(&self, messages: &[Message]) -> Result<Vec<u8>> {
        let protocol = self.transmission(messages)?;
        let samples = self.modulator.modulate(&protocol);
        log::debug!(
            "{} protocol bytes -> {} samples at {} baud",
            protocol.len(),
            samples.len(),
            self.config.baud_rate
        );
        Ok(write_wav(&samples))
    }

    pub fn encode_single(&self, address: u32, text: &str, function: FunctionCode) -> Result<Vec<u8>> {
        self.encode(&[Message::new(address, text, function)])
    }

    /// The raw protocol byte stream, without audio
    pub fn transmission(&self, messages: &[Message]) -> Result<Vec<u8>> {
        BatchEncoder::encode(messages)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(ModemConfig::default())
    }
}
