use std::ops::Deref;

use log::debug;

use crate::common::{
    bitstream::BitStream,
    codec::Mode,
    error::{QRError, QRResult},
    format::{format_info_qr, FORMAT_INFO_BIT_LEN},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{Color, ECLevel, Version},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    // Dark rings and core of a finder, light for the inner ring
    Finder(Color),
    Separator,
    Timing(Color),
    // Dark outer ring and center, light for the inner ring
    Alignment(Color),
    Dark,
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty | Module::Separator => &Color::Light,
            Module::Dark => &Color::Dark,
            Module::Finder(c) => c,
            Module::Timing(c) => c,
            Module::Alignment(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module; MAX_QR_SIZE]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mode: Mode,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel, mode: Mode) -> Self {
        let w = ver.width();
        debug_assert!(w * w <= MAX_QR_SIZE, "Grid too small for version {}", *ver);
        Self { grid: Box::new([Module::Empty; MAX_QR_SIZE]), w, ver, ecl, mode, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid[..self.w * self.w]
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid().iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Finder(Color::Dark) => 'f',
                    Module::Finder(Color::Light) => 'F',
                    Module::Separator => 's',
                    Module::Timing(Color::Dark) => 't',
                    Module::Timing(Color::Light) => 'T',
                    Module::Alignment(Color::Dark) => 'a',
                    Module::Alignment(Color::Light) => 'A',
                    Module::Dark => 'k',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 finder centered at (r, c) along with its separator
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Separator,
                        (3 | -3, _) | (_, 3 | -3) => Module::Finder(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Finder(Color::Light),
                        _ => Module::Finder(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    // Runs between the separators on row 6 and column 6, leaving cells already
    // claimed by other patterns untouched
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        for i in 8..=last {
            let clr = Color::from(i & 1 == 0);
            if matches!(self.get(6, i), Module::Empty) {
                self.set(6, i, Module::Timing(clr));
            }
            if matches!(self.get(i, 6), Module::Empty) {
                self.set(i, 6, Module::Timing(clr));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    // Skipped when the 5x5 footprint overlaps any placed module
    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let overlaps = (-2..=2)
            .any(|i| (-2..=2).any(|j| !matches!(self.get(r + i, c + j), Module::Empty)));
        if overlaps {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Alignment(Color::Dark),
                        _ => Module::Alignment(Color::Light),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use test_case::test_case;

    use crate::builder::{Module, QR};
    use crate::common::{
        codec::Mode,
        metadata::{Color, ECLevel, Version},
    };

    #[test]
    fn test_alignment_pattern_1() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L, Mode::Byte);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert!(!qr.grid().iter().any(|m| matches!(m, Module::Alignment(_))));
    }

    #[test_case(2, 18)]
    #[test_case(3, 22)]
    #[test_case(4, 26)]
    fn test_alignment_pattern_single(ver: u8, pos: i16) {
        let mut qr = QR::new(Version::new(ver).unwrap(), ECLevel::L, Mode::Byte);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();

        let cnt = qr.grid().iter().filter(|m| matches!(m, Module::Alignment(_))).count();
        assert_eq!(cnt, 25);
        assert_eq!(qr.get(pos, pos), Module::Alignment(Color::Dark));
        assert_eq!(qr.get(pos - 1, pos + 1), Module::Alignment(Color::Light));
        assert_eq!(qr.get(pos + 2, pos - 2), Module::Alignment(Color::Dark));
        assert_eq!(qr.get(pos + 3, pos), Module::Empty);
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_alignment_patterns();
        self.draw_timing_pattern();
        self.draw_dark_module();
    }

    // Sits at row 4v + 9 beside the bottom left separator
    fn draw_dark_module(&mut self) {
        self.set(-8, 8, Module::Dark);
    }
}


// Format info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_MAIN,
        );
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_SIDE,
        );
    }

    // Writes the number MSB first along the coordinates
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod format_info_tests {
    use super::{FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE};
    use crate::builder::{Module, QR};
    use crate::common::{
        codec::Mode,
        format::format_info_qr,
        mask::MaskPattern,
        metadata::{Color, ECLevel, Version},
    };

    fn read_number(qr: &QR, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |acc, &(r, c)| (acc << 1) | qr.get(r, c).bit() as u32)
    }

    #[test]
    fn test_reserve_format_area() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L, Mode::Byte);
        qr.draw_all_function_patterns();
        qr.reserve_format_area();
        let cnt = qr.grid().iter().filter(|m| matches!(m, Module::Format(_))).count();
        assert_eq!(cnt, 30);
        // Timing cells between the format bits stay untouched
        assert_eq!(qr.get(8, 6), Module::Timing(Color::Dark));
        assert_eq!(qr.get(6, 8), Module::Timing(Color::Dark));
        assert_eq!(qr.get(8, 7), Module::Format(Color::Dark));
        assert_eq!(qr.get(7, 8), Module::Format(Color::Dark));
        assert_eq!(qr.get(-8, 8), Module::Dark);
        assert_eq!(qr.get(8, 5), Module::Format(Color::Dark));
        assert_eq!(qr.get(9, 9), Module::Empty);
    }

    #[test]
    fn test_format_info_both_copies() {
        let mut qr = QR::new(Version::new(2).unwrap(), ECLevel::Q, Mode::Byte);
        let mask = MaskPattern::new(5).unwrap();
        let info = format_info_qr(ECLevel::Q, mask);
        qr.draw_format_info(info);
        assert_eq!(read_number(&qr, &FORMAT_INFO_COORDS_QR_MAIN), info);
        assert_eq!(read_number(&qr, &FORMAT_INFO_COORDS_QR_SIDE), info);
    }

    #[test]
    fn test_format_info_msb_placement() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L, Mode::Byte);
        qr.draw_format_info(1 << 14);
        assert_eq!(qr.get(8, 0), Module::Format(Color::Dark));
        assert_eq!(qr.get(-1, 8), Module::Format(Color::Dark));
        assert_eq!(qr.get(0, 8), Module::Format(Color::Light));
        assert_eq!(qr.get(8, -1), Module::Format(Color::Light));
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_encoding_region(&mut self, payload: BitStream) -> QRResult<()> {
        self.reserve_format_area();

        let mut coords = EncRegionIter::new(self.ver);
        let mut placed = 0;
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            let slot = coords.by_ref().find(|&(r, c)| matches!(self.get(r, c), Module::Empty));
            let Some((r, c)) = slot else {
                return Err(QRError::CapacityOverflow);
            };
            self.set(r, c, module);
            placed += 1;
        }
        let remainder = self.fill_remainder_bits(coords);
        debug!("Placed {placed} data bits & {remainder} remainder bits");

        debug_assert!(!self.grid().contains(&Module::Empty), "Empty module found after placement");
        Ok(())
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) -> usize {
        let mut cnt = 0;
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
                cnt += 1;
            }
        }
        cnt
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = format_info_qr(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}


// Output
//------------------------------------------------------------------------------

impl QR {
    // Rows of 0 for light and 1 for dark modules
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.grid().chunks(self.w).map(|row| row.iter().map(|m| m.bit()).collect()).collect()
    }

    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::new();
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}


// Global constants
//------------------------------------------------------------------------------

// Version 4 is 33 modules wide
pub const MAX_QR_SIZE: usize = 33 * 33;

const QUIET_ZONE: usize = 4;

// Around the top left finder, MSB first
static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

// Below the top right and right of the bottom left finder, MSB first
static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];
