use std::ops::Deref;

use log::{debug, trace};
use rayon::prelude::*;

use super::{
    error::{QRError, QRResult},
    metadata::Color,
};
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(QRError::InvalidMaskingPattern),
        }
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

#[cfg(test)]
mod mask_pattern_tests {
    use super::MaskPattern;
    use crate::common::error::QRError;

    #[test]
    fn test_new() {
        assert_eq!(*MaskPattern::new(0).unwrap(), 0);
        assert_eq!(*MaskPattern::new(7).unwrap(), 7);
        assert_eq!(MaskPattern::new(8), Err(QRError::InvalidMaskingPattern));
    }

    #[test]
    fn test_mask_functions() {
        let at = |m: u8, r: i16, c: i16| MaskPattern::new(m).unwrap().mask_function()(r, c);
        assert!(at(0, 0, 0) && !at(0, 0, 1));
        assert!(at(1, 2, 5) && !at(1, 3, 5));
        assert!(at(2, 1, 3) && !at(2, 1, 4));
        assert!(at(3, 1, 2) && !at(3, 1, 3));
        assert!(at(4, 1, 2) && !at(4, 2, 0));
        assert!(at(5, 0, 7) && !at(5, 1, 1));
        assert!(at(6, 1, 1) && !at(6, 1, 3));
        assert!(at(7, 0, 0) && !at(7, 0, 1));
    }
}

// Mask selection
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MaskCandidate {
    pub qr: QR,
    pub mask: MaskPattern,
    pub penalty: u32,
}

impl MaskCandidate {
    // Scored with its own format info drawn, not with the reserved cells
    fn new(qr: &QR, mask: MaskPattern) -> Self {
        let mut qr = qr.clone();
        qr.apply_mask(mask);
        let penalty = compute_total_penalty(&qr);
        trace!("Mask {} penalty {penalty}", *mask);
        Self { qr, mask, penalty }
    }
}

// Trials run in parallel on their own copies, ties go to the lowest index
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let base: &QR = qr;
    let candidates = MaskPattern::all()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|m| MaskCandidate::new(base, m))
        .collect::<Vec<_>>();

    let best = candidates
        .into_iter()
        .min_by_key(|cand| (cand.penalty, cand.mask))
        .unwrap_or_else(|| unreachable!("Eight mask candidates are always evaluated"));

    debug!("Best mask {} with penalty {}", *best.mask, best.penalty);
    *qr = best.qr;
    best.mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// 3 for a run of 5 same colored modules and 1 per module beyond
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width();
    let mut cols = vec![(Color::Dark, 0); w];
    for r in 0..w {
        let mut last = Color::Dark;
        let mut consec_row_len = 0;
        for (c, col) in cols.iter_mut().enumerate() {
            let clr = *qr.get(r as i16, c as i16);
            if c == 0 || last != clr {
                last = clr;
                consec_row_len = 0;
            }
            consec_row_len += 1;
            pen += run_penalty(consec_row_len);

            if r == 0 || col.0 != clr {
                col.0 = clr;
                col.1 = 0;
            }
            col.1 += 1;
            pen += run_penalty(col.1);
        }
    }
    pen
}

fn run_penalty(run_len: u32) -> u32 {
    match run_len {
        5 => 3,
        6.. => 1,
        _ => 0,
    }
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// 40 for every 11 module window matching 1:1:3:1:1 with 4 light modules on one side
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    let patterns = [FINDER_LIKE_PATTERN, reversed(FINDER_LIKE_PATTERN)];
    for i in 0..w {
        let get = |j: i16| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        for j in 0..=w - 11 {
            for pattern in &patterns {
                if (j..j + 11).map(get).eq(pattern.iter().copied()) {
                    pen += 40;
                }
            }
        }
    }
    pen
}

// 10 per step of 5% the dark ratio sits away from 50%, on the nearer multiple
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let percent = (dark_cnt * 100 / (w * w)) as i32;
    let prev_mul = percent - percent % 5;
    let next_mul = prev_mul + 5;
    let deviation = std::cmp::min((prev_mul - 50).abs(), (next_mul - 50).abs());
    deviation as u32 * 10
}

const fn reversed(pattern: [Color; 11]) -> [Color; 11] {
    let mut res = pattern;
    let mut i = 0;
    while i < 11 {
        res[i] = pattern[10 - i];
        i += 1;
    }
    res
}

#[cfg(test)]
mod mask_tests {
    use super::{
        apply_best_mask, compute_adjacent_penalty, compute_balance_penalty,
        compute_block_penalty, compute_finder_pattern_penalty, compute_total_penalty,
        MaskCandidate, MaskPattern,
    };
    use crate::builder::{Module, QR};
    use crate::common::{
        bitstream::BitStream,
        codec::Mode,
        metadata::{Color, ECLevel, Version},
    };

    fn payload(bytes: &[u8]) -> BitStream {
        let mut bs = BitStream::new(bytes.len() << 3);
        bs.extend(bytes);
        bs
    }

    fn blank_qr(clr: Color) -> QR {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L, Mode::Byte);
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                qr.set(r, c, Module::Data(clr));
            }
        }
        qr
    }

    fn checkerboard_qr() -> QR {
        let mut qr = blank_qr(Color::Light);
        let w = qr.width() as i16;
        for r in 0..w {
            for c in 0..w {
                qr.set(r, c, Module::Data(Color::from((r + c) & 1 == 0)));
            }
        }
        qr
    }

    #[test]
    fn test_adjacent_penalty_uniform() {
        // Every row and column is a run of 21: 3 + 16 each
        let qr = blank_qr(Color::Light);
        assert_eq!(compute_adjacent_penalty(&qr), 21 * 2 * 19);
    }

    #[test]
    fn test_adjacent_penalty_single_run() {
        let mut qr = checkerboard_qr();
        for c in 0..6 {
            qr.set(0, c, Module::Data(Color::Dark));
        }
        qr.set(0, 6, Module::Data(Color::Light));
        // Dark run of 6 in row 0 bordered by the checkerboard
        assert_eq!(compute_adjacent_penalty(&qr), 4);
    }

    #[test]
    fn test_block_penalty() {
        assert_eq!(compute_block_penalty(&blank_qr(Color::Dark)), 20 * 20 * 3);
        assert_eq!(compute_block_penalty(&checkerboard_qr()), 0);
    }

    #[test]
    fn test_finder_pattern_penalty() {
        let mut qr = checkerboard_qr();
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 0);
        let pattern = [1, 0, 1, 1, 1, 0, 1, 0, 0, 0, 0];
        for (c, &b) in pattern.iter().enumerate() {
            qr.set(10, c as i16, Module::Data(Color::from(b == 1)));
        }
        assert_eq!(compute_finder_pattern_penalty(&qr, true), 40);
        for (r, &b) in pattern.iter().rev().enumerate() {
            qr.set(r as i16, 20, Module::Data(Color::from(b == 1)));
        }
        assert_eq!(compute_finder_pattern_penalty(&qr, false), 40);
    }

    #[test]
    fn test_balance_penalty() {
        assert_eq!(compute_balance_penalty(&blank_qr(Color::Light)), 450);
        assert_eq!(compute_balance_penalty(&blank_qr(Color::Dark)), 500);
        // 221 of 441 dark is 50%
        assert_eq!(compute_balance_penalty(&checkerboard_qr()), 0);
    }

    #[test]
    fn test_balance_penalty_nearer_multiple() {
        // 190 of 441 dark is 43%, nearer multiple 45 is 5 away
        let mut qr = blank_qr(Color::Light);
        for i in 0..190i16 {
            qr.set(i / 21, i % 21, Module::Data(Color::Dark));
        }
        assert_eq!(compute_balance_penalty(&qr), 50);
    }

    #[test]
    fn test_best_mask_has_lowest_penalty() {
        let mut qr = QR::new(Version::new(2).unwrap(), ECLevel::M, Mode::Byte);
        qr.draw_all_function_patterns();
        let bytes = (0..44u8).map(|i| i.wrapping_mul(37)).collect::<Vec<_>>();
        qr.draw_encoding_region(payload(&bytes)).unwrap();

        let penalties = MaskPattern::all()
            .map(|m| MaskCandidate::new(&qr, m).penalty)
            .collect::<Vec<_>>();
        let min = *penalties.iter().min().unwrap();
        let first_min = penalties.iter().position(|&p| p == min).unwrap();

        let mut masked = qr.clone();
        let mask = apply_best_mask(&mut masked);
        assert_eq!(*mask, first_min as u8);
        assert_eq!(masked.mask(), Some(mask));
        assert_eq!(compute_total_penalty(&masked), min);
    }

    #[test]
    fn test_best_mask_is_deterministic() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::Q, Mode::Byte);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload(&[0xA5; 26])).unwrap();
        let masks = (0..4).map(|_| apply_best_mask(&mut qr.clone())).collect::<Vec<_>>();
        assert!(masks.windows(2).all(|w| w[0] == w[1]));
    }
}

// Global constants
//------------------------------------------------------------------------------

const FINDER_LIKE_PATTERN: [Color; 11] = [
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Dark,
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Light,
    Color::Light,
    Color::Light,
    Color::Light,
];
