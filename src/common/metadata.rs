use std::{ops::Deref, ops::Not, str::FromStr};

use super::{
    codec::Mode,
    error::{QRError, QRResult},
};

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(bit: bool) -> Self {
        if bit {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Color {
    pub fn select<T>(&self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }

    pub fn bit(self) -> u8 {
        self.select(0, 1)
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Default)]
pub enum ECLevel {
    #[default]
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    // Two-bit indicator stored in format info. Not in declaration order.
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const MIN: usize = 1;
    pub const MAX: usize = 4;

    pub fn new(version: u8) -> QRResult<Self> {
        match version as usize {
            v @ Self::MIN..=Self::MAX => Ok(Self(v)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (Self::MIN..=Self::MAX).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    fn spec(self) -> &'static VersionSpec {
        debug_assert!((Self::MIN..=Self::MAX).contains(&self.0), "Invalid version");
        &VERSIONS[self.0 - 1]
    }

    // Max characters for the mode & ec level
    pub fn capacity(self, mode: Mode, ecl: ECLevel) -> usize {
        let mode_idx = match mode {
            Mode::Alphanumeric => 0,
            Mode::Byte => 1,
        };
        self.spec().capacity[mode_idx][ecl as usize]
    }

    pub fn ec_spec(self, ecl: ECLevel) -> ErrorCorrectionSpec {
        self.spec().ec[ecl as usize]
    }

    pub fn mode_bits(self) -> usize {
        4
    }

    pub fn char_cnt_bits(self, mode: Mode) -> usize {
        match (mode, self.0) {
            (Mode::Alphanumeric, 1..=9) => 9,
            (Mode::Alphanumeric, 10..=26) => 11,
            (Mode::Alphanumeric, 27..=40) => 13,
            (Mode::Byte, 1..=9) => 8,
            (Mode::Byte, 10..=40) => 16,
            _ => unreachable!("Invalid version {}", self.0),
        }
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.ec_spec(ecl).data_codewords << 3
    }

    pub fn total_codewords(self) -> usize {
        let ec = self.ec_spec(ECLevel::L);
        ec.data_codewords + ec.ec_codewords * ec.blocks
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        self.ec_spec(ecl).ec_codewords
    }

    // (block1_size, block1_count, block2_size, block2_count)
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let ErrorCorrectionSpec { data_codewords, blocks, .. } = self.ec_spec(ecl);
        let block1_size = data_codewords / blocks;
        let block2_count = data_codewords % blocks;
        let block1_count = blocks - block2_count;
        let block2_size = if block2_count > 0 { block1_size + 1 } else { 0 };
        (block1_size, block1_count, block2_size, block2_count)
    }

    pub fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_PATTERN_POSITIONS[self.0 - 1]
    }

    pub fn remainder_bits(self) -> usize {
        match self.0 {
            1 => 0,
            2..=4 => 7,
            _ => unreachable!("Invalid version {}", self.0),
        }
    }
}

#[cfg(test)]
mod version_tests {
    use test_case::test_case;

    use super::{ECLevel, Version};
    use crate::common::{codec::Mode, error::QRError};

    #[test]
    fn test_new() {
        assert_eq!(*Version::new(1).unwrap(), 1);
        assert_eq!(*Version::new(4).unwrap(), 4);
        assert_eq!(Version::new(0), Err(QRError::InvalidVersion));
        assert_eq!(Version::new(5), Err(QRError::InvalidVersion));
    }

    #[test]
    fn test_width() {
        let widths = Version::all().map(|v| v.width()).collect::<Vec<_>>();
        assert_eq!(widths, vec![21, 25, 29, 33]);
    }

    #[test]
    fn test_capacity_increases_with_version() {
        for mode in [Mode::Alphanumeric, Mode::Byte] {
            for ecl in ECLevel::ALL {
                let caps = Version::all().map(|v| v.capacity(mode, ecl)).collect::<Vec<_>>();
                assert!(caps.windows(2).all(|w| w[0] < w[1]), "{mode:?} {ecl:?} {caps:?}");
            }
        }
    }

    #[test_case(1, 26)]
    #[test_case(2, 44)]
    #[test_case(3, 70)]
    #[test_case(4, 100)]
    fn test_total_codewords_same_for_all_levels(v: u8, exp: usize) {
        let ver = Version::new(v).unwrap();
        for ecl in ECLevel::ALL {
            let ec = ver.ec_spec(ecl);
            assert_eq!(ec.data_codewords + ec.ec_codewords * ec.blocks, exp, "{ecl:?}");
        }
    }

    #[test_case(3, ECLevel::Q, (17, 2, 0, 0))]
    #[test_case(4, ECLevel::H, (9, 4, 0, 0))]
    #[test_case(1, ECLevel::M, (16, 1, 0, 0))]
    fn test_data_codewords_per_block(v: u8, ecl: ECLevel, exp: (usize, usize, usize, usize)) {
        assert_eq!(Version::new(v).unwrap().data_codewords_per_block(ecl), exp);
    }

    #[test]
    fn test_char_cnt_bits() {
        let ver = Version::new(2).unwrap();
        assert_eq!(ver.char_cnt_bits(Mode::Alphanumeric), 9);
        assert_eq!(ver.char_cnt_bits(Mode::Byte), 8);
    }

    #[test]
    fn test_ec_level_from_str() {
        assert_eq!("L".parse::<ECLevel>(), Ok(ECLevel::L));
        assert_eq!("q".parse::<ECLevel>(), Ok(ECLevel::Q));
        assert_eq!(" H ".parse::<ECLevel>(), Ok(ECLevel::H));
        assert_eq!("X".parse::<ECLevel>(), Err(QRError::InvalidECLevel));
        assert_eq!(ECLevel::default(), ECLevel::L);
    }
}

// Version & error correction tables
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ErrorCorrectionSpec {
    // Data codewords across all blocks
    pub data_codewords: usize,
    // EC codewords per block
    pub ec_codewords: usize,
    pub blocks: usize,
}

const fn ec(data_codewords: usize, ec_codewords: usize, blocks: usize) -> ErrorCorrectionSpec {
    ErrorCorrectionSpec { data_codewords, ec_codewords, blocks }
}

#[derive(Debug)]
struct VersionSpec {
    // [mode][ec level] max characters, mode order: alphanumeric, byte
    capacity: [[usize; 4]; 2],
    ec: [ErrorCorrectionSpec; 4],
}

static VERSIONS: [VersionSpec; 4] = [
    VersionSpec {
        capacity: [[25, 20, 16, 10], [17, 14, 11, 7]],
        ec: [ec(19, 7, 1), ec(16, 10, 1), ec(13, 13, 1), ec(9, 17, 1)],
    },
    VersionSpec {
        capacity: [[47, 38, 29, 20], [32, 26, 20, 14]],
        ec: [ec(34, 10, 1), ec(28, 16, 1), ec(22, 22, 1), ec(16, 28, 1)],
    },
    VersionSpec {
        capacity: [[77, 61, 47, 35], [53, 42, 32, 24]],
        ec: [ec(55, 15, 1), ec(44, 26, 1), ec(34, 18, 2), ec(26, 22, 2)],
    },
    VersionSpec {
        capacity: [[114, 90, 67, 50], [78, 62, 46, 34]],
        ec: [ec(80, 20, 1), ec(64, 18, 2), ec(48, 26, 2), ec(36, 16, 4)],
    },
];

static ALIGNMENT_PATTERN_POSITIONS: [&[i16]; 4] = [&[], &[6, 18], &[6, 22], &[6, 26]];
