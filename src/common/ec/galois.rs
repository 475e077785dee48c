use std::ops::Add;

// Galois field element
//------------------------------------------------------------------------------

// Element of GF(256) generated by x^8 + x^4 + x^3 + x^2 + 1
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub struct G(pub u8);

impl G {
    pub fn gen_pow(exp: usize) -> Self {
        Self(EXP_TABLE[exp % 255])
    }

    // None for zero, which has no logarithm
    pub fn log(self) -> Option<u8> {
        match self.0 {
            0 => None,
            v => Some(LOG_TABLE[v as usize]),
        }
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

#[cfg(test)]
mod galois_tests {
    use super::{G, EXP_TABLE, LOG_TABLE};

    #[test]
    fn test_tables_are_inverse() {
        for v in 1..=255usize {
            assert_eq!(EXP_TABLE[LOG_TABLE[v] as usize] as usize, v, "value {v}");
        }
        for e in 0..255usize {
            assert_eq!(LOG_TABLE[EXP_TABLE[e] as usize] as usize, e, "exponent {e}");
        }
    }

    #[test]
    fn test_exp_table_reduction() {
        assert_eq!(&EXP_TABLE[..10], &[1, 2, 4, 8, 16, 32, 64, 128, 29, 58]);
        assert_eq!(EXP_TABLE[255], 1);
    }

    #[test]
    fn test_add() {
        assert_eq!(G(0b1010) + G(0b0110), G(0b1100));
        assert_eq!(G(5) + G(5), G(0));
    }

    #[test]
    fn test_log() {
        assert_eq!(G(0).log(), None);
        assert_eq!(G(1).log(), Some(0));
        assert_eq!(G(29).log(), Some(8));
    }
}

// Global constants
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 285;

// EXP_TABLE[i] = 2^i
pub static EXP_TABLE: [u8; 256] = build_exp_table();

// LOG_TABLE[2^i] = i, LOG_TABLE[0] is never read
pub static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x > 255 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}
