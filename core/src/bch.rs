//! BCH(31,21) parity and the trailing even-parity bit.
//!
//! A codeword keeps its 21 data bits (type bit + 20-bit field) in bits 31..11,
//! the 10 BCH check bits in bits 10..1 and the parity bit in bit 0.

/// Bits 31..11: the part of a codeword the BCH remainder is computed over
pub const DATA_MASK: u32 = 0xFFFF_F800;

/// x^10 + x^9 + x^8 + x^6 + x^5 + x^3 + 1
pub const GENERATOR_POLY: u32 = 0x769;

const NUM_DATA_BITS: u32 = 21;
const NUM_TOTAL_BITS: u32 = 31;

/// Fill bits 10..1 with the BCH(31,21) remainder of the data bits.
///
/// Anything below bit 11 in the input is discarded first.
pub fn compute_bch(word: u32) -> u32 {
    let data = word & DATA_MASK;
    let mut remainder = data;
    let mut generator = GENERATOR_POLY << NUM_DATA_BITS;
    let mut mask = 1u32 << NUM_TOTAL_BITS;

    for _ in 0..NUM_DATA_BITS {
        if remainder & mask != 0 {
            remainder ^= generator;
        }
        generator >>= 1;
        mask >>= 1;
    }

    data | remainder
}

/// Set bit 0 so that bits 1..=30 plus the parity bit hold an even number of ones.
///
/// The type bit (31) is not counted.
pub fn apply_even_parity(word: u32) -> u32 {
    let ones = (word & 0x7FFF_FFFE).count_ones();
    (word & !1) | (ones & 1)
}

/// BCH then parity: the finishing step for every address and message codeword.
pub fn protect(word: u32) -> u32 {
    apply_even_parity(compute_bch(word))
}
