use super::{mask::MaskPattern, metadata::ECLevel};

// Format information
//------------------------------------------------------------------------------

// 5 data bits (ec level, mask) followed by their BCH(15,5) remainder, masked
pub fn format_info_qr(ec_level: ECLevel, mask_pattern: MaskPattern) -> u32 {
    let data = ec_level.format_bits() << 3 | *mask_pattern as u32;
    let ecc = bch_remainder(data << FORMAT_ERROR_BIT_LEN);
    (data << FORMAT_ERROR_BIT_LEN | ecc) ^ FORMAT_MASK
}

// GF(2) polynomial remainder against the format generator
fn bch_remainder(mut rem: u32) -> u32 {
    while bit_len(rem) > FORMAT_ERROR_BIT_LEN {
        rem ^= FORMAT_GENERATOR << (bit_len(rem) - FORMAT_GENERATOR_BIT_LEN);
    }
    rem
}

fn bit_len(n: u32) -> usize {
    (u32::BITS - n.leading_zeros()) as usize
}


// Global constants
//------------------------------------------------------------------------------

pub const FORMAT_INFO_BIT_LEN: usize = 15;

const FORMAT_ERROR_BIT_LEN: usize = 10;

// x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0b10100110111;

const FORMAT_GENERATOR_BIT_LEN: usize = 11;

pub const FORMAT_MASK: u32 = 0b101010000010010;
