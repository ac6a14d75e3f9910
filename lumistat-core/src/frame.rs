//! The 8x32 pixel surface.
//!
//! The panel is four cascaded 8x8 LED modules stacked vertically. Logic
//! draws in a right-handed coordinate system: x runs 0..8 left to
//! right, y runs 0..32 bottom to top (y 0..8 is the bottom module,
//! 24..32 the top one). The modules are mounted mirrored, so logical x
//! maps to physical column `7 - x`; y maps directly to the stacked row.
//!
//! Every drawing primitive in this crate assumes that mapping - it must
//! not change without re-examining all of them.

/// Logical width in pixels (columns)
pub const WIDTH: i32 = 8;

/// Logical height in pixels (rows across the whole stack)
pub const HEIGHT: i32 = 32;

/// Rows per physical 8x8 module
pub const MODULE_ROWS: i32 = 8;

/// Number of cascaded modules
pub const MODULE_COUNT: usize = 4;

/// An off-screen frame buffer for the full 8x32 surface.
///
/// A frame is composed in full by the render loop and then flushed to
/// the display driver in one commit, so a partially drawn frame is
/// never visible on the hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// One byte per row; bit `n` is physical column `n`.
    rows: [u8; HEIGHT as usize],
}

impl Frame {
    /// Create a blank frame
    pub const fn new() -> Self {
        Self {
            rows: [0; HEIGHT as usize],
        }
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.rows = [0; HEIGHT as usize];
    }

    /// Set or clear the pixel at logical (x, y).
    ///
    /// Out-of-range coordinates are silently ignored; callers such as
    /// the rain animation rely on this to clip at the surface edges.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
            return;
        }
        let bit = 1u8 << (WIDTH - 1 - x);
        if on {
            self.rows[y as usize] |= bit;
        } else {
            self.rows[y as usize] &= !bit;
        }
    }

    /// Read back the pixel at logical (x, y); out of range reads as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
            return false;
        }
        self.rows[y as usize] & (1u8 << (WIDTH - 1 - x)) != 0
    }

    /// Physical byte for row `y`: bit `n` is physical column `n`.
    ///
    /// This is the value the display driver shifts out for the row's
    /// digit register.
    pub fn row_bits(&self, y: usize) -> u8 {
        self.rows[y]
    }

    /// Number of lit pixels in the whole frame
    pub fn lit_count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
