use std::fmt;
use std::io::Read;

use crate::address::{decode_address, is_message, FunctionCode};
use crate::codeword::payload_bits;
use crate::error::{PocsagError, Result};
use crate::framing::{find_sync, read_codewords};
use crate::modem::{Demodulator, ModemConfig};
use crate::payload::MessageEncoding;
use crate::resample::{downmix, resample};
use crate::wav::pcm_samples;
use crate::{IDLE_CODEWORD, SAMPLE_RATE, SYNC_WORD};

/// A page recovered from the codeword stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Always a multiple of 8
    pub address: u32,
    pub function: FunctionCode,
    pub text: String,
    pub is_numeric: bool,
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_numeric { "NUMERIC" } else { "ALPHA" };
        write!(
            f,
            "Address: {:>7}  Function: {}  {:<7}  Message: {}",
            self.address,
            self.function.as_u8(),
            kind,
            self.text
        )
    }
}

/// The address codeword message codewords are currently attached to
#[derive(Debug, Clone, Copy)]
struct ActiveAddress {
    address: u32,
    function: FunctionCode,
}

/// Codeword-level state machine reassembling pages from a raw protocol stream.
///
/// Sync and idle codewords are skipped without closing the current page, since
/// a page may continue in the next batch. A page ends at the next address
/// codeword or at the end of the stream. BCH and parity bits are not checked:
/// a corrupted codeword is taken at face value.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    active: Option<ActiveAddress>,
    pending: Vec<u32>,
    messages: Vec<DecodedMessage>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate the first sync word at any byte offset, then decode every whole
    /// codeword after it.
    ///
    /// # Arguments
    /// * `data` - Raw protocol bytes (preamble, sync words, codewords)
    ///
    /// # Returns
    /// Every page with at least one message codeword, or `SyncNotFound`
    pub fn decode(data: &[u8]) -> Result<Vec<DecodedMessage>> {
        let sync_pos = find_sync(data).ok_or(PocsagError::SyncNotFound)?;
        log::debug!("sync word at byte {}", sync_pos);

        let mut decoder = Self::new();
        for codeword in read_codewords(&data[sync_pos + 4..]) {
            decoder.push_codeword(codeword);
        }
        Ok(decoder.finish())
    }

    pub fn push_codeword(&mut self, codeword: u32) {
        if codeword == SYNC_WORD || codeword == IDLE_CODEWORD {
            return;
        }

        if is_message(codeword) {
            if self.active.is_some() {
                self.pending.push(codeword);
            } else {
                log::debug!("message codeword {:#010x} without an address, dropped", codeword);
            }
            return;
        }

        self.finalize_pending();
        if let Some((address, function)) = decode_address(codeword) {
            self.active = Some(ActiveAddress { address, function });
        }
    }

    /// Close the last page and hand back everything decoded so far
    pub fn finish(mut self) -> Vec<DecodedMessage> {
        self.finalize_pending();
        self.messages
    }

    fn finalize_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        if let Some(active) = self.active {
            let encoding = MessageEncoding::for_function(active.function);
            let text = encoding.decode(&payload_bits(&self.pending));
            log::debug!(
                "address {} function {}: {} codewords -> {:?}",
                active.address,
                active.function.as_u8(),
                self.pending.len(),
                text
            );

            self.messages.push(DecodedMessage {
                address: active.address,
                function: active.function,
                text,
                is_numeric: encoding.is_numeric(),
            });
        }
        self.pending.clear();
    }
}

/// WAV capture in, pages out
pub struct Decoder {
    demodulator: Demodulator,
}

impl Decoder {
    pub fn new(config: ModemConfig) -> Self {
        Self {
            demodulator: Demodulator::new(&config),
        }
    }

    /// Decode a 48 kHz, 16-bit mono WAV file held in memory
    ///
    /// # Arguments
    /// * `wav` - WAV bytes; the header is skipped at a fixed 44 bytes, not parsed
    ///
    /// # Returns
    /// Pages in transmission order, `WavTooShort` for files under 44 bytes, or
    /// `SyncNotFound` when the demodulated stream has no sync word
    pub fn decode(&self, wav: &[u8]) -> Result<Vec<DecodedMessage>> {
        let samples = pcm_samples(wav)?;
        self.decode_samples(&samples)
    }

    /// Read a whole WAV stream and decode it
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<Vec<DecodedMessage>> {
        let mut wav = Vec::new();
        reader.read_to_end(&mut wav)?;
        self.decode(&wav)
    }

    /// Decode mono PCM already at 48 kHz, symbol-aligned from sample 0
    pub fn decode_samples(&self, samples: &[i16]) -> Result<Vec<DecodedMessage>> {
        let data = self.demodulator.demodulate(samples);
        log::debug!("demodulated {} samples into {} bytes", samples.len(), data.len());
        self.decode_protocol(&data)
    }

    /// Decode interleaved PCM at any rate and channel count
    pub fn decode_pcm(
        &self,
        samples: &[i16],
        sample_rate: u32,
        channels: u16,
    ) -> Result<Vec<DecodedMessage>> {
        let mono = downmix(samples, channels);
        if sample_rate != SAMPLE_RATE {
            log::debug!("resampling {} Hz capture to {} Hz", sample_rate, SAMPLE_RATE);
        }
        let carrier = resample(&mono, sample_rate, SAMPLE_RATE);
        self.decode_samples(&carrier)
    }

    /// Decode a raw protocol byte stream (preamble, sync words, codewords)
    pub fn decode_protocol(&self, data: &[u8]) -> Result<Vec<DecodedMessage>> {
        FrameDecoder::decode(data)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(ModemConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::encode_address;
    use crate::codeword::split_into_codewords;
    use crate::framing::{BatchEncoder, Message};
    use crate::payload::{encode_alphanumeric, encode_numeric};

    fn stream(codewords: &[u32]) -> Vec<u8> {
        let mut data = vec![0xAA; 8];
        data.extend_from_slice(&SYNC_WORD.to_be_bytes());
        for cw in codewords {
            data.extend_from_slice(&cw.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_sync_not_found() {
        assert!(matches!(
            FrameDecoder::decode(&[0xAA; 200]),
            Err(PocsagError::SyncNotFound)
        ));
        assert!(matches!(FrameDecoder::decode(&[]), Err(PocsagError::SyncNotFound)));
    }

    #[test]
    fn test_single_alpha_page() {
        let data = BatchEncoder::encode(&[Message::alphanumeric(123456, "HELLO WORLD")]).unwrap();
        let messages = FrameDecoder::decode(&data).unwrap();

        assert_eq!(
            messages,
            vec![DecodedMessage {
                address: 123456,
                function: FunctionCode::Alphanumeric,
                text: "HELLO WORLD".to_string(),
                is_numeric: false,
            }]
        );
    }

    #[test]
    fn test_numeric_page() {
        let data = BatchEncoder::encode(&[Message::numeric(999_888, "0123456789")]).unwrap();
        let messages = FrameDecoder::decode(&data).unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].address, 999_888);
        assert_eq!(messages[0].function, FunctionCode::Numeric);
        assert_eq!(messages[0].text, "0123456789");
        assert!(messages[0].is_numeric);
    }

    #[test]
    fn test_unaligned_sync() {
        let mut data = vec![0x01, 0x02, 0x03];
        data.extend(BatchEncoder::encode(&[Message::alphanumeric(8, "odd offset")]).unwrap());
        let messages = FrameDecoder::decode(&data).unwrap();
        assert_eq!(messages[0].text, "odd offset");
    }

    #[test]
    fn test_message_codewords_without_address_dropped() {
        let mut codewords = split_into_codewords(&encode_alphanumeric("orphan"));
        codewords.push(encode_address(64, FunctionCode::Alphanumeric));
        codewords.extend(split_into_codewords(&encode_alphanumeric("kept")));

        let messages = FrameDecoder::decode(&stream(&codewords)).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].address, 64);
        assert_eq!(messages[0].text, "kept");
    }

    #[test]
    fn test_address_without_message_codewords_emits_nothing() {
        let codewords = [
            encode_address(800, FunctionCode::Alphanumeric),
            IDLE_CODEWORD,
            encode_address(1600, FunctionCode::Numeric),
        ];
        assert!(FrameDecoder::decode(&stream(&codewords)).unwrap().is_empty());
    }

    #[test]
    fn test_sync_and_idle_do_not_split_a_page() {
        let message_cws = split_into_codewords(&encode_numeric("12345678901234"));
        assert!(message_cws.len() >= 3);

        let mut codewords = vec![encode_address(4000, FunctionCode::Numeric), message_cws[0]];
        codewords.push(IDLE_CODEWORD);
        codewords.push(SYNC_WORD);
        codewords.extend_from_slice(&message_cws[1..]);

        let messages = FrameDecoder::decode(&stream(&codewords)).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "12345678901234");
    }

    #[test]
    fn test_address_zero_is_a_real_address() {
        let data = BatchEncoder::encode(&[Message::alphanumeric(0, "to zero")]).unwrap();
        let messages = FrameDecoder::decode(&data).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].address, 0);
        assert_eq!(messages[0].text, "to zero");
    }

    #[test]
    fn test_tone_function_decoded_as_text() {
        let mut codewords = vec![encode_address(72, FunctionCode::Tone2)];
        codewords.extend(split_into_codewords(&encode_alphanumeric("T2")));

        let messages = FrameDecoder::decode(&stream(&codewords)).unwrap();
        assert_eq!(messages[0].function, FunctionCode::Tone2);
        assert_eq!(messages[0].text, "T2");
        assert!(!messages[0].is_numeric);
    }

    #[test]
    fn test_corrupted_codeword_is_not_detected() {
        let mut codewords = vec![encode_address(8, FunctionCode::Alphanumeric)];
        codewords.extend(split_into_codewords(&encode_alphanumeric("AAAA")));
        // Flip a data bit in the first message codeword, leaving the check bits stale
        codewords[1] ^= 1 << 29;

        let messages = FrameDecoder::decode(&stream(&codewords)).unwrap();
        assert_eq!(messages.len(), 1);
        assert_ne!(messages[0].text, "AAAA");
    }

    #[test]
    fn test_display() {
        let message = DecodedMessage {
            address: 4440,
            function: FunctionCode::Alphanumeric,
            text: "hi".to_string(),
            is_numeric: false,
        };
        assert_eq!(
            message.to_string(),
            "Address:    4440  Function: 3  ALPHA    Message: hi"
        );
    }

    #[test]
    fn test_decoder_rejects_short_wav() {
        let decoder = Decoder::default();
        assert!(matches!(
            decoder.decode(&[0u8; 43]),
            Err(PocsagError::WavTooShort { len: 43 })
        ));
    }

    #[test]
    fn test_decode_reader() {
        let protocol = BatchEncoder::encode(&[Message::alphanumeric(16, "reader")]).unwrap();
        let config = ModemConfig::default();
        let wav = crate::wav::write_wav(&crate::modem::Modulator::new(&config).modulate(&protocol));

        let messages = Decoder::new(config).decode_reader(std::io::Cursor::new(wav)).unwrap();
        assert_eq!(messages[0].text, "reader");
    }
}
