//! POCSAG pager protocol codec
//!
//! Turns text pages into the bit-exact POCSAG codeword stream (and a 48 kHz
//! PCM WAV carrying it), and recovers pages from such a capture.
//!
//! Encode: text -> payload encoder -> codeword splitter -> batch assembler -> modem -> WAV
//! Decode: WAV -> modem -> raw protocol bytes -> frame decoder -> payload decoder -> text

pub mod error;
pub mod bch;
pub mod address;
pub mod payload;
pub mod codeword;
pub mod framing;
pub mod modem;
pub mod wav;
pub mod resample;
pub mod encoder;
pub mod decoder;

pub use address::FunctionCode;
pub use decoder::{DecodedMessage, Decoder, FrameDecoder};
pub use encoder::Encoder;
pub use error::{PocsagError, Result};
pub use framing::Message;
pub use modem::{BaudRate, ModemConfig};
pub use payload::MessageEncoding;

// Audio carrier
pub const SAMPLE_RATE: u32 = 48000;
pub const BITS_PER_SAMPLE: u16 = 16;
pub const NUM_CHANNELS: u16 = 1;
pub const WAV_HEADER_SIZE: usize = 44;

// Symbol levels: bit 1 is the negative level, bit 0 the positive one
pub const DEFAULT_AMPLITUDE: i16 = 12287;

// Protocol framing
pub const PREAMBLE_BITS: usize = 576;
pub const PREAMBLE_BYTES: usize = PREAMBLE_BITS / 8; // 72
pub const PREAMBLE_PATTERN: u8 = 0xAA;
pub const SYNC_WORD: u32 = 0x7CD2_15D8;
pub const IDLE_CODEWORD: u32 = 0x7A89_C197;
pub const CODEWORDS_PER_BATCH: usize = 16;
pub const BATCH_BYTES: usize = 4 + CODEWORDS_PER_BATCH * 4; // sync + 16 codewords

/// Encode a burst of pages into a complete WAV file at the given baud rate.
pub fn encode(messages: &[Message], baud_rate: BaudRate) -> Result<Vec<u8>> {
    Encoder::new(ModemConfig::with_baud_rate(baud_rate)).encode(messages)
}

/// Decode every page found in a WAV capture demodulated at the given baud rate.
pub fn decode(wav: &[u8], baud_rate: BaudRate) -> Result<Vec<DecodedMessage>> {
    Decoder::new(ModemConfig::with_baud_rate(baud_rate)).decode(wav)
}
