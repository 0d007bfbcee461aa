//! Fixed 8×8 bitmap font for the text-art glyph ramp
//!
//! Each glyph is eight rows of eight bits, most significant bit leftmost.
//! Characters outside the ramp render blank.

use crate::io::configuration::GLYPH_CELL_SIZE;

/// Bitmap rows for one glyph
pub type GlyphBitmap = [u8; 8];

const BLANK: GlyphBitmap = [0x00; 8];

/// Bitmap for `ch`
pub const fn bitmap(ch: char) -> GlyphBitmap {
    match ch {
        '#' => [0x24, 0x24, 0x7E, 0x24, 0x7E, 0x24, 0x24, 0x00],
        '@' => [0x3C, 0x42, 0x5A, 0x56, 0x5C, 0x40, 0x3C, 0x00],
        '%' => [0x62, 0x64, 0x08, 0x10, 0x26, 0x46, 0x00, 0x00],
        '=' => [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00],
        '*' => [0x00, 0x5A, 0x3C, 0x7E, 0x3C, 0x5A, 0x00, 0x00],
        ':' => [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00],
        _ => BLANK,
    }
}

/// Whether pixel (`x`, `y`) of the unscaled glyph cell is inked
pub fn is_inked(ch: char, x: u32, y: u32) -> bool {
    if x >= GLYPH_CELL_SIZE {
        return false;
    }
    bitmap(ch)
        .get(y as usize)
        .is_some_and(|row| row & (0x80_u8 >> x) != 0)
}
