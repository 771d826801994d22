//! Message payload encodings.
//!
//! Numeric pages carry bit-reversed BCD nibbles, alphanumeric pages carry 7-bit
//! characters sent least significant bit first. Both produce a dense, MSB-first
//! byte stream for the codeword splitter, and both decode from the flat bit
//! sequence the splitter recovers.

use crate::address::FunctionCode;

/// BCD code that never represents a character; ends a numeric page
pub const NUMERIC_TERMINATOR: u8 = 0xA;
const NUMERIC_SPACE: u8 = 0xC;

/// End-of-text control character; ends an alphanumeric page when present
pub const ETX: u8 = 0x03;

/// How a page's text is carried, chosen once from its function code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageEncoding {
    Numeric,
    Alphanumeric,
}

impl MessageEncoding {
    /// Function 0 is numeric; every other code is carried as 7-bit text.
    pub fn for_function(function: FunctionCode) -> Self {
        match function {
            FunctionCode::Numeric => MessageEncoding::Numeric,
            _ => MessageEncoding::Alphanumeric,
        }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            MessageEncoding::Numeric => encode_numeric(text),
            MessageEncoding::Alphanumeric => encode_alphanumeric(text),
        }
    }

    pub fn decode(self, bits: &[bool]) -> String {
        match self {
            MessageEncoding::Numeric => decode_numeric(bits),
            MessageEncoding::Alphanumeric => decode_alphanumeric(bits),
        }
    }

    pub fn is_numeric(self) -> bool {
        self == MessageEncoding::Numeric
    }
}

pub fn bit_reverse8(byte: u8) -> u8 {
    byte.reverse_bits()
}

pub fn bit_reverse4(nibble: u8) -> u8 {
    (nibble & 0xF).reverse_bits() >> 4
}

fn numeric_code(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(ch as u8 - b'0'),
        'U' | 'u' => Some(0xB),
        ' ' => Some(NUMERIC_SPACE),
        '-' => Some(0xD),
        ']' => Some(0xE),
        '[' => Some(0xF),
        _ => None,
    }
}

fn numeric_char(code: u8) -> Option<char> {
    match code {
        0..=9 => Some((b'0' + code) as char),
        0xB => Some('U'),
        0xC => Some(' '),
        0xD => Some('-'),
        0xE => Some(']'),
        0xF => Some('['),
        _ => None,
    }
}

/// Pack text as bit-reversed BCD, two nibbles per byte, high nibble first.
///
/// Characters outside the numeric alphabet become spaces. A terminator nibble is
/// always appended; an odd nibble count is padded with a (reversed) space.
pub fn encode_numeric(text: &str) -> Vec<u8> {
    let mut nibbles: Vec<u8> = Vec::with_capacity(text.len() + 1);

    for ch in text.chars() {
        let code = numeric_code(ch).unwrap_or_else(|| {
            log::warn!("character {:?} has no numeric code, sending space", ch);
            NUMERIC_SPACE
        });
        nibbles.push(bit_reverse4(code));
    }
    nibbles.push(bit_reverse4(NUMERIC_TERMINATOR));

    nibbles
        .chunks(2)
        .map(|pair| {
            let low = pair.get(1).copied().unwrap_or(bit_reverse4(NUMERIC_SPACE));
            (pair[0] << 4) | low
        })
        .collect()
}

/// Pack text as a continuous stream of 7-bit characters, LSB of each character
/// first, with no gaps at byte boundaries.
///
/// The top bit of every byte is dropped. No terminator is added; append [`ETX`]
/// to the text when an explicit end marker is wanted.
pub fn encode_alphanumeric(text: &str) -> Vec<u8> {
    if !text.is_ascii() {
        log::warn!("non-ASCII text loses the top bit of every byte");
    }

    let mut packed = Vec::with_capacity((text.len() * 7).div_ceil(8));
    let mut carry: u32 = 0;
    let mut carry_bits = 0u32;

    for byte in text.bytes() {
        let septet = (bit_reverse8(byte) >> 1) as u32;
        carry = (carry << 7) | septet;
        carry_bits += 7;

        while carry_bits >= 8 {
            carry_bits -= 8;
            packed.push((carry >> carry_bits) as u8);
        }
        carry &= (1 << carry_bits) - 1;
    }

    if carry_bits > 0 {
        packed.push((carry << (8 - carry_bits)) as u8);
    }

    packed
}

fn bits_to_value(bits: &[bool]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8)
}

/// Read 4-bit groups until the terminator nibble, trimming trailing spaces.
pub fn decode_numeric(bits: &[bool]) -> String {
    let mut text = String::new();

    for group in bits.chunks_exact(4) {
        let code = bit_reverse4(bits_to_value(group));
        if code == NUMERIC_TERMINATOR {
            break;
        }
        if let Some(ch) = numeric_char(code) {
            text.push(ch);
        }
    }

    text.truncate(text.trim_end_matches(' ').len());
    text
}

/// Read 7-bit groups until ETX. NULs are skipped, and so is anything outside
/// printable ASCII.
pub fn decode_alphanumeric(bits: &[bool]) -> String {
    let mut text = String::new();

    for group in bits.chunks_exact(7) {
        let byte = bit_reverse8(bits_to_value(group) << 1);
        match byte {
            ETX => break,
            0x20..=0x7E => text.push(byte as char),
            _ => {}
        }
    }

    text
}
