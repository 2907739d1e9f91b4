//! Bitmap fonts for labels and the cursor readout.
//!
//! Both fonts store one byte per column. They only differ in bit order:
//! the small 3×5 font keeps the top row in bit 4, the medium 5×7 font keeps it
//! in bit 0.

use crate::framebuffer::Framebuffer;

/// Available fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 3×5 font for bound labels.
    Small,
    /// 5×7 font for the cursor readout.
    Medium,
}

/// Unknown characters in the small font draw as a solid block.
const SMALL_FALLBACK: &[u8] = &[0x1F, 0x1F, 0x1F];
/// Unknown characters in the medium font draw as a blank.
const MEDIUM_FALLBACK: &[u8] = &[0x00; 5];

fn small_glyph(ch: char) -> Option<&'static [u8]> {
    let glyph: &'static [u8] = match ch {
        ' ' => &[0x00, 0x00, 0x00],
        '0' => &[0x1F, 0x11, 0x1F],
        '1' => &[0x09, 0x1F, 0x01],
        '2' => &[0x17, 0x15, 0x1D],
        '3' => &[0x15, 0x15, 0x1F],
        '4' => &[0x1C, 0x04, 0x1F],
        '5' => &[0x1D, 0x15, 0x17],
        '6' => &[0x1F, 0x15, 0x17],
        '7' => &[0x10, 0x10, 0x1F],
        '8' => &[0x1F, 0x15, 0x1F],
        '9' => &[0x1D, 0x15, 0x1F],
        '.' => &[0x00, 0x01, 0x00],
        '-' => &[0x04, 0x04, 0x04],
        '+' => &[0x04, 0x0E, 0x04],
        'x' => &[0x1B, 0x04, 0x1B],
        'y' => &[0x18, 0x07, 0x18],
        _ => return None,
    };
    Some(glyph)
}

fn medium_glyph(ch: char) -> Option<&'static [u8]> {
    let glyph: &'static [u8] = match ch {
        ' ' => &[0x00, 0x00, 0x00, 0x00, 0x00],
        '0' => &[0x3E, 0x51, 0x49, 0x45, 0x3E],
        '1' => &[0x00, 0x42, 0x7F, 0x40, 0x00],
        '2' => &[0x42, 0x61, 0x51, 0x49, 0x46],
        '3' => &[0x21, 0x41, 0x45, 0x4B, 0x31],
        '4' => &[0x18, 0x14, 0x12, 0x7F, 0x10],
        '5' => &[0x27, 0x45, 0x45, 0x45, 0x39],
        '6' => &[0x3C, 0x4A, 0x49, 0x49, 0x30],
        '7' => &[0x01, 0x71, 0x09, 0x05, 0x03],
        '8' => &[0x36, 0x49, 0x49, 0x49, 0x36],
        '9' => &[0x06, 0x49, 0x49, 0x29, 0x1E],
        '.' => &[0x00, 0x60, 0x60, 0x00, 0x00],
        '-' => &[0x08, 0x08, 0x08, 0x08, 0x08],
        '+' => &[0x08, 0x08, 0x3E, 0x08, 0x08],
        'd' => &[0x38, 0x44, 0x44, 0x48, 0x7F],
        'e' => &[0x38, 0x54, 0x54, 0x54, 0x18],
        'f' => &[0x08, 0x7E, 0x09, 0x01, 0x02],
        'n' => &[0x7C, 0x08, 0x04, 0x04, 0x78],
        'p' => &[0x7C, 0x14, 0x14, 0x14, 0x08],
        'u' => &[0x3C, 0x40, 0x40, 0x20, 0x7C],
        'x' => &[0x44, 0x28, 0x10, 0x28, 0x44],
        'y' => &[0x0C, 0x50, 0x50, 0x50, 0x3C],
        _ => return None,
    };
    Some(glyph)
}

impl Font {
    /// Glyph height in pixels.
    pub fn height(self) -> i32 {
        match self {
            Font::Small => 5,
            Font::Medium => 7,
        }
    }

    /// Horizontal distance between glyph origins.
    pub fn advance(self) -> i32 {
        match self {
            Font::Small => 4,
            Font::Medium => 6,
        }
    }

    /// Check whether a character has its own glyph.
    pub fn has_glyph(self, ch: char) -> bool {
        self.lookup(ch).is_some()
    }

    fn lookup(self, ch: char) -> Option<&'static [u8]> {
        match self {
            Font::Small => small_glyph(ch),
            Font::Medium => medium_glyph(ch),
        }
    }

    fn glyph(self, ch: char) -> &'static [u8] {
        self.lookup(ch).unwrap_or(match self {
            Font::Small => SMALL_FALLBACK,
            Font::Medium => MEDIUM_FALLBACK,
        })
    }

    fn row_bit(self, row: i32) -> u8 {
        match self {
            Font::Small => 1 << (4 - row),
            Font::Medium => 1 << row,
        }
    }

    /// Width of `text` in pixels, including the trailing spacing column.
    pub fn text_width(self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance()
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw_text(self, fb: &mut Framebuffer, text: &str, x: i32, y: i32) {
        let mut origin = x;
        for ch in text.chars() {
            for (col, byte) in self.glyph(ch).iter().enumerate() {
                for row in 0..self.height() {
                    if byte & self.row_bit(row) != 0 {
                        fb.set_pixel(origin + col as i32, y + row, true);
                    }
                }
            }
            origin += self.advance();
        }
    }
}
