//! Batch and transmission framing.
//!
//! On the wire: 72 bytes of 0xAA preamble, then batches of one sync word and 16
//! codewords, all big-endian. Pages are laid out back to back (address codeword,
//! then its message codewords) and may run across batch boundaries; the last
//! batch is filled up with idle codewords.

use crate::address::{encode_address, is_reserved_codeword, FunctionCode};
use crate::codeword::split_into_codewords;
use crate::error::{PocsagError, Result};
use crate::payload::MessageEncoding;
use crate::{BATCH_BYTES, CODEWORDS_PER_BATCH, IDLE_CODEWORD, PREAMBLE_BYTES, PREAMBLE_PATTERN, SYNC_WORD};

/// One page to transmit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub address: u32,
    pub text: String,
    pub function: FunctionCode,
}

impl Message {
    pub fn new(address: u32, text: impl Into<String>, function: FunctionCode) -> Self {
        Self {
            address,
            text: text.into(),
            function,
        }
    }

    pub fn alphanumeric(address: u32, text: impl Into<String>) -> Self {
        Self::new(address, text, FunctionCode::Alphanumeric)
    }

    pub fn numeric(address: u32, text: impl Into<String>) -> Self {
        Self::new(address, text, FunctionCode::Numeric)
    }

    pub fn encoding(&self) -> MessageEncoding {
        MessageEncoding::for_function(self.function)
    }

    /// Address codeword followed by the message codewords
    pub fn codewords(&self) -> Result<Vec<u32>> {
        if self.function.is_tone_only() {
            return Err(PocsagError::ToneOnlyUnsupported(self.function.as_u8()));
        }

        let address_codeword = encode_address(self.address, self.function);
        if is_reserved_codeword(address_codeword) {
            return Err(PocsagError::ReservedAddress {
                address: self.address,
                function: self.function.as_u8(),
            });
        }

        let payload = self.encoding().encode(&self.text);
        let mut codewords = vec![address_codeword];
        codewords.extend(split_into_codewords(&payload));
        Ok(codewords)
    }
}

pub struct BatchEncoder;

impl BatchEncoder {
    /// All codewords of a burst, padded with idle codewords to whole batches
    pub fn codewords(messages: &[Message]) -> Result<Vec<u32>> {
        let mut codewords = Vec::with_capacity(CODEWORDS_PER_BATCH * messages.len());
        for message in messages {
            codewords.extend(message.codewords()?);
        }

        let padded_len = codewords.len().div_ceil(CODEWORDS_PER_BATCH) * CODEWORDS_PER_BATCH;
        codewords.resize(padded_len, IDLE_CODEWORD);

        log::debug!(
            "{} messages -> {} codewords in {} batches",
            messages.len(),
            codewords.len(),
            codewords.len() / CODEWORDS_PER_BATCH
        );
        Ok(codewords)
    }

    /// Preamble plus batches: the raw protocol byte stream
    pub fn encode(messages: &[Message]) -> Result<Vec<u8>> {
        let codewords = Self::codewords(messages)?;
        let batches = codewords.len() / CODEWORDS_PER_BATCH;

        let mut encoded = Vec::with_capacity(PREAMBLE_BYTES + batches * BATCH_BYTES);
        encoded.resize(PREAMBLE_BYTES, PREAMBLE_PATTERN);

        for batch in codewords.chunks(CODEWORDS_PER_BATCH) {
            encoded.extend_from_slice(&SYNC_WORD.to_be_bytes());
            for codeword in batch {
                encoded.extend_from_slice(&codeword.to_be_bytes());
            }
        }

        Ok(encoded)
    }
}

/// Byte offset of the first sync word, at any alignment
pub fn find_sync(data: &[u8]) -> Option<usize> {
    data.windows(4)
        .position(|window| u32::from_be_bytes([window[0], window[1], window[2], window[3]]) == SYNC_WORD)
}

/// Big-endian codewords from `data`, ignoring a trailing partial word
pub fn read_codewords(data: &[u8]) -> impl Iterator<Item = u32> + '_ {
    data.chunks_exact(4)
        .map(|word| u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
}
