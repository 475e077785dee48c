use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks 2-column strips from the bottom right, alternating upward and downward,
// right module before left, and skipping the vertical timing column.
pub struct EncRegionIter {
    w: i16,
    // Right column of the current strip
    right: i16,
    // Rows visited in the current strip
    vert: i16,
    is_left: bool,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { w, right: w - 1, vert: 0, is_left: false }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.right < 1 {
            return None;
        }

        let is_upward = (self.right + 1) & 2 == 0;
        let r = if is_upward { self.w - 1 - self.vert } else { self.vert };
        let c = if self.is_left { self.right - 1 } else { self.right };

        if self.is_left {
            self.vert += 1;
            if self.vert == self.w {
                self.vert = 0;
                self.right -= 2;
                if self.right == VERT_TIMING_COL {
                    self.right -= 1;
                }
            }
        }
        self.is_left = !self.is_left;

        Some((r, c))
    }
}


// Global constants
//------------------------------------------------------------------------------

const VERT_TIMING_COL: i16 = 6;
