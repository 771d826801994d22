//! Address codewords: pager address (RIC) and function code.
//!
//! Only bits 21..3 of the address travel over the air; the low three bits are
//! implied by the frame position on a real pager and are dropped here, so every
//! decoded address is a multiple of 8.

use crate::bch;
use crate::error::{PocsagError, Result};
use crate::{IDLE_CODEWORD, SYNC_WORD};

/// Bit 31: 0 for address codewords, 1 for message codewords
pub const MESSAGE_FLAG: u32 = 1 << 31;

const ADDRESS_BITS_MASK: u32 = 0x7_FFFF; // 19 bits
const FIELD_SHIFT: u32 = 11;
const FIELD_MASK: u32 = 0xF_FFFF; // 20 bits

/// Two-bit function code carried by every address codeword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FunctionCode {
    Numeric = 0,
    Tone1 = 1,
    Tone2 = 2,
    #[default]
    Alphanumeric = 3,
}

impl FunctionCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Build from the low two bits of a decoded field. Never fails.
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => FunctionCode::Numeric,
            1 => FunctionCode::Tone1,
            2 => FunctionCode::Tone2,
            _ => FunctionCode::Alphanumeric,
        }
    }

    pub fn is_tone_only(self) -> bool {
        matches!(self, FunctionCode::Tone1 | FunctionCode::Tone2)
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = PocsagError;

    fn try_from(value: u8) -> Result<Self> {
        if value > 3 {
            return Err(PocsagError::InvalidFunctionCode(value));
        }
        Ok(Self::from_bits(value as u32))
    }
}

fn is_aligned(address: u32) -> bool {
    address % 8 == 0 && (address >> 3) <= ADDRESS_BITS_MASK
}

fn address_codeword(address: u32, function: FunctionCode) -> u32 {
    let field = (((address >> 3) & ADDRESS_BITS_MASK) << 2) | function.as_u8() as u32;
    bch::protect(field << FIELD_SHIFT)
}

/// Sync and idle words are valid address codewords too; a receiver skips them
pub fn is_reserved_codeword(codeword: u32) -> bool {
    codeword == IDLE_CODEWORD || codeword == SYNC_WORD
}

/// Whether an (address, function) pair survives the round trip unchanged.
///
/// False for addresses that are not a multiple of 8 and for the two pairs whose
/// codeword collides with the idle word (2007664, numeric) or the sync word
/// (2045056, tone 2).
pub fn is_representable(address: u32, function: FunctionCode) -> bool {
    is_aligned(address) && !is_reserved_codeword(address_codeword(address, function))
}

/// Build the BCH/parity protected address codeword.
///
/// Does not reject reserved pairs; [`crate::framing::Message::codewords`] does.
pub fn encode_address(address: u32, function: FunctionCode) -> u32 {
    if !is_aligned(address) {
        log::warn!(
            "address {} is not a representable multiple of 8, transmitting {}",
            address,
            ((address >> 3) & ADDRESS_BITS_MASK) << 3
        );
    }

    address_codeword(address, function)
}

/// Split an address codeword into (address, function).
///
/// Returns `None` when the type bit marks a message codeword. Check bits are not
/// verified.
pub fn decode_address(codeword: u32) -> Option<(u32, FunctionCode)> {
    if is_message(codeword) {
        return None;
    }

    let field = data_field(codeword);
    let function = FunctionCode::from_bits(field);
    let address = ((field >> 2) & ADDRESS_BITS_MASK) << 3;
    Some((address, function))
}

pub fn is_message(codeword: u32) -> bool {
    codeword & MESSAGE_FLAG != 0
}

/// The 20-bit field in bits 30..11
pub fn data_field(codeword: u32) -> u32 {
    (codeword >> FIELD_SHIFT) & FIELD_MASK
}
