use log::debug;

use super::{
    bitstream::BitStream,
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl Mode {
    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Alphanumeric => {
                matches!(
                    byte,
                    b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':'
                )
            }
            Self::Byte => true,
        }
    }

    // Narrowest mode which holds every byte. Non-ASCII bytes of a multi-byte
    // UTF-8 char are never alphanumeric, so this agrees with a per-char check.
    pub fn select(data: &[u8]) -> Self {
        if data.iter().all(|&b| Self::Alphanumeric.contains(b)) {
            Self::Alphanumeric
        } else {
            Self::Byte
        }
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }
}


// Encoder
//------------------------------------------------------------------------------

pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version, Mode)> {
    let mode = Mode::select(data);
    let ver = find_min_version(data.len(), mode, ecl)?;
    debug!("Selected mode {mode:?} & version {}", *ver);
    let bs = encode_with_version(data, ver, ecl)?;
    Ok((bs, ver, mode))
}

pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
    let mode = Mode::select(data);
    if data.len() > ver.capacity(mode, ecl) {
        return Err(QRError::DataTooLong);
    }

    let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
    push_header(&mut bs, mode, data.len(), ver);
    match mode {
        Mode::Alphanumeric => push_alphanumeric(&mut bs, data),
        Mode::Byte => push_byte(&mut bs, data),
    }
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);

    debug_assert!(bs.len() & 7 == 0, "Encoded bit length is not byte aligned: {}", bs.len());
    Ok(bs)
}

fn find_min_version(len: usize, mode: Mode, ecl: ECLevel) -> QRResult<Version> {
    Version::all().find(|v| len <= v.capacity(mode, ecl)).ok_or(QRError::DataTooLong)
}

fn push_header(bs: &mut BitStream, mode: Mode, char_cnt: usize, ver: Version) {
    bs.push_bits(mode as u8, ver.mode_bits());
    bs.push_bits(char_cnt as u16, ver.char_cnt_bits(mode));
}

fn push_alphanumeric(bs: &mut BitStream, data: &[u8]) {
    for chunk in data.chunks(2) {
        match *chunk {
            [a, b] => {
                let pair = Mode::alphanumeric_digit(a) * 45 + Mode::alphanumeric_digit(b);
                bs.push_bits(pair, 11);
            }
            [a] => bs.push_bits(Mode::alphanumeric_digit(a), 6),
            _ => unreachable!("Chunk of size {}", chunk.len()),
        }
    }
}

fn push_byte(bs: &mut BitStream, data: &[u8]) {
    for &b in data {
        bs.push_bits(b, 8);
    }
}

fn push_terminator(bs: &mut BitStream) {
    let term_len = std::cmp::min(4, bs.capacity() - bs.len());
    bs.push_bits(0u8, term_len);
}

fn pad_remaining_capacity(bs: &mut BitStream) {
    let offset = bs.len() & 7;
    if offset > 0 {
        bs.push_bits(0u8, 8 - offset);
    }

    // Byte aligned from here, so the 16 bit pad pattern is whole codewords
    let pad_len = (bs.capacity() - bs.len()) >> 3;
    let pads = PADDING_CODEWORDS.iter().copied().cycle().take(pad_len).collect::<Vec<_>>();
    bs.extend(&pads);
}


// Global constants
//------------------------------------------------------------------------------

// 1110110000010001
static PADDING_CODEWORDS: [u8; 2] = [0b11101100, 0b00010001];
