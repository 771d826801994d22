//! Codeword splitter: payload bytes <-> message codewords.
//!
//! Each message codeword carries 20 payload bits, two and a half bytes. Even
//! codewords take the top 20 bits of a 3-byte window and advance two bytes; odd
//! codewords skip the nibble already sent, take the next 20 bits and advance
//! three bytes. Every pair of codewords therefore lands back on a byte boundary.

use crate::address::{data_field, MESSAGE_FLAG};
use crate::bch;

pub const FIELD_BITS: usize = 20;

const EVEN_WINDOW_MASK: u32 = 0xFFFF_F000;
const ODD_WINDOW_MASK: u32 = 0x0FFF_FF00;

/// Number of message codewords a packed payload needs (at least one)
pub fn codeword_count(payload_len: usize) -> usize {
    (payload_len * 2).div_ceil(5).max(1)
}

/// Up to three bytes, big-endian, in bits 31..8; missing bytes read as zero
fn read_window(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(3)
        .enumerate()
        .fold(0u32, |acc, (i, &byte)| acc | (byte as u32) << (24 - 8 * i))
}

/// Slice a packed payload into BCH/parity protected message codewords
///
/// # Arguments
/// * `payload` - Packed numeric or alphanumeric bytes, MSB first
///
/// # Returns
/// `ceil(2 * len / 5)` message codewords (at least one); the last field is
/// zero-filled past the end of the payload
pub fn split_into_codewords(payload: &[u8]) -> Vec<u32> {
    let count = codeword_count(payload.len());
    let mut codewords = Vec::with_capacity(count);
    let mut cursor = 0usize;

    for index in 0..count {
        let rest = &payload[cursor..];
        let window = read_window(rest);
        let whole_window = rest.len() >= 3;

        let field = if index % 2 == 0 {
            if whole_window {
                cursor += 2;
            }
            (window & EVEN_WINDOW_MASK) >> 1
        } else {
            if whole_window {
                cursor += 3;
            }
            (window & ODD_WINDOW_MASK) << 3
        };

        codewords.push(bch::protect(MESSAGE_FLAG | field));
    }

    codewords
}

/// Concatenate the 20-bit fields of message codewords, MSB first
pub fn payload_bits(codewords: &[u32]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(codewords.len() * FIELD_BITS);
    for &codeword in codewords {
        let field = data_field(codeword);
        bits.extend((0..FIELD_BITS).rev().map(|i| (field >> i) & 1 == 1));
    }
    bits
}
