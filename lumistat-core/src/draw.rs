//! Rendering primitives: icons, two-digit numbers, proportional bars
//! and the small per-module marker dots.

use crate::frame::{Frame, MODULE_ROWS};
use crate::glyphs::{Icon, FONT_3X5};

/// Columns of the tens digit
const TENS_X: i32 = 1;
/// Columns of the units digit
const UNITS_X: i32 = 5;

/// Draw an 8x8 icon with its bottom row at `y_offset`.
///
/// Icon bitmaps are stored top-to-bottom but the y axis grows upward,
/// so row `r` of the bitmap lands on `y_offset + 7 - r`.
pub fn draw_icon(frame: &mut Frame, icon: Icon, y_offset: i32) {
    for (r, row) in icon.bitmap().iter().enumerate() {
        for c in 0..8 {
            if row >> (7 - c) & 1 != 0 {
                frame.set_pixel(c, y_offset + (MODULE_ROWS - 1) - r as i32, true);
            }
        }
    }
}

/// Draw `value` as two 3x5 digits inside the module starting at
/// `y_offset`.
///
/// Values outside 0..=99 saturate silently; a reading of 104% shows
/// as 99, not an error. Single-digit values keep their leading zero so
/// the clock reads "07" rather than "7".
pub fn draw_number(frame: &mut Frame, value: i32, y_offset: i32) {
    let value = value.clamp(0, 99);
    let tens = (value / 10) as usize;
    let units = (value % 10) as usize;

    draw_digit(frame, tens, TENS_X, y_offset);
    draw_digit(frame, units, UNITS_X, y_offset);
}

fn draw_digit(frame: &mut Frame, digit: usize, x_offset: i32, y_offset: i32) {
    for (i, column) in FONT_3X5[digit].iter().enumerate() {
        for j in 0..5 {
            if column >> (7 - j) & 1 != 0 {
                // Font columns run top to bottom; flip into the upward
                // y axis one row above the module base.
                frame.set_pixel(x_offset + i as i32, y_offset + 1 + j, true);
            }
        }
    }
}

/// Draw a vertical bar over columns `col_start..=col_end`.
///
/// The bar is `round(value * max_height / 100)` rows tall, clamped to
/// `0..=max_height`. Rows above the bar are explicitly cleared so a
/// falling value shortens the bar without a separate erase pass.
pub fn draw_bar(frame: &mut Frame, col_start: i32, col_end: i32, value: f32, max_height: i32) {
    let height = (value * max_height as f32 / 100.0 + 0.5) as i32;
    let height = height.clamp(0, max_height);

    for y in 0..max_height {
        let on = y < height;
        for x in col_start..=col_end {
            frame.set_pixel(x, y, on);
        }
    }
}

/// Draw `count` marker dots along the top row of the module starting at
/// `y_offset`.
///
/// The dots visually tag which quantity a module's number shows (three
/// dots = internal temperature or seconds, two = humidity or minutes,
/// one = room temperature or hours).
pub fn draw_marker_dots(frame: &mut Frame, count: i32, y_offset: i32) {
    for x in 0..count {
        frame.set_pixel(x, y_offset + MODULE_ROWS - 1, true);
    }
}
