//! One-bit framebuffer in the vertical-byte layout LCD controllers expect.
//!
//! Bytes are grouped in pages of eight rows. Byte `x + (y / 8) * width` holds
//! column `x` of that page, bit `y % 8` is row `y` (least significant bit on
//! top). This matches the ST7565 page/column addressing, so a page can be sent
//! to the controller as one contiguous slice.

use crate::geom::DisplaySize;

/// Rows per page.
pub const PAGE_HEIGHT: u32 = 8;

/// Monochrome bit-packed framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    size: DisplaySize,
    buffer: Vec<u8>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new(DisplaySize::LCD)
    }
}

impl Framebuffer {
    /// Create a cleared framebuffer. Heights round up to whole pages.
    pub fn new(size: DisplaySize) -> Self {
        let pages = size.height.div_ceil(PAGE_HEIGHT);
        Self {
            size,
            buffer: vec![0; (size.width * pages) as usize],
        }
    }

    /// Dimensions in pixels.
    pub fn size(&self) -> DisplaySize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.size.width as i32
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.size.height as i32
    }

    /// Clear every pixel.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let page = y / PAGE_HEIGHT as usize;
        Some((x + page * self.size.width as usize, 1 << (y % PAGE_HEIGHT as usize)))
    }

    /// Turn a pixel on or off. Pixels off the grid are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((index, mask)) = self.index(x, y) {
            if on {
                self.buffer[index] |= mask;
            } else {
                self.buffer[index] &= !mask;
            }
        }
    }

    /// Read a pixel; off-grid pixels read as off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .is_some_and(|(index, mask)| self.buffer[index] & mask != 0)
    }

    /// Horizontal run of `len` pixels starting at `(x, y)`.
    pub fn hline(&mut self, x: i32, y: i32, len: i32) {
        for cx in x.max(0)..x.saturating_add(len).min(self.width()) {
            self.set_pixel(cx, y, true);
        }
    }

    /// Vertical run of `len` pixels starting at `(x, y)`.
    pub fn vline(&mut self, x: i32, y: i32, len: i32) {
        for cy in y.max(0)..y.saturating_add(len).min(self.height()) {
            self.set_pixel(x, cy, true);
        }
    }

    /// Bresenham line including both endpoints.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut cx, mut cy) = (x0, y0);

        loop {
            self.set_pixel(cx, cy, true);
            if cx == x1 && cy == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                err += dx;
                cy += sy;
            }
        }
    }

    /// Raw buffer, page after page.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// One `width`-byte slice per page, top to bottom.
    pub fn pages(&self) -> impl Iterator<Item = &[u8]> {
        self.buffer.chunks(self.size.width as usize)
    }

    /// Number of pixels turned on.
    pub fn count_on(&self) -> usize {
        self.buffer.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Text preview, `#` for lit pixels and `.` for dark ones.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.size.width + 1) * self.size.height) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(if self.pixel(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    /// Binary PBM (`P4`) image; rows are MSB first with 1 meaning black.
    pub fn to_pbm(&self) -> Vec<u8> {
        let header = format!("P4\n{} {}\n", self.size.width, self.size.height);
        let row_bytes = self.size.width.div_ceil(8) as usize;
        let mut out = Vec::with_capacity(header.len() + row_bytes * self.size.height as usize);
        out.extend_from_slice(header.as_bytes());
        for y in 0..self.height() {
            let mut row = vec![0u8; row_bytes];
            for x in 0..self.width() {
                if self.pixel(x, y) {
                    row[x as usize / 8] |= 0x80 >> (x % 8);
                }
            }
            out.extend_from_slice(&row);
        }
        out
    }
}

/// Receiver of finished frames, the seam to the display transport.
pub trait FrameSink {
    /// Take one complete frame.
    fn present(&mut self, frame: &Framebuffer);
}

/// Records every frame, for tests and offline rendering.
impl FrameSink for Vec<Framebuffer> {
    fn present(&mut self, frame: &Framebuffer) {
        self.push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_byte_layout() {
        let mut fb = Framebuffer::default();
        assert_eq!(fb.as_bytes().len(), 128 * 8);
        fb.set_pixel(3, 0, true);
        fb.set_pixel(3, 9, true);
        assert_eq!(fb.as_bytes()[3], 0b0000_0001);
        assert_eq!(fb.as_bytes()[128 + 3], 0b0000_0010);
        fb.set_pixel(3, 9, false);
        assert_eq!(fb.as_bytes()[128 + 3], 0);
        assert_eq!(fb.pages().count(), 8);
    }

    #[test]
    fn off_grid_pixels_are_ignored() {
        let mut fb = Framebuffer::default();
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(128, 10, true);
        fb.set_pixel(0, 64, true);
        assert_eq!(fb.count_on(), 0);
        assert!(!fb.pixel(-5, -5));
    }

    #[test]
    fn lines_hit_both_ends() {
        let mut fb = Framebuffer::default();
        fb.line(10, 40, 0, 0);
        assert!(fb.pixel(0, 0) && fb.pixel(10, 40));
        assert_eq!(fb.count_on(), 41);
        fb.clear();
        fb.hline(120, 5, 20);
        assert_eq!(fb.count_on(), 8);
        fb.vline(0, -3, 5);
        assert_eq!(fb.count_on(), 10);
    }

    #[test]
    fn exports() {
        let mut fb = Framebuffer::new(DisplaySize::new(10, 2));
        fb.set_pixel(0, 0, true);
        fb.set_pixel(9, 1, true);
        assert_eq!(fb.to_ascii(), "#.........\n.........#\n");
        let pbm = fb.to_pbm();
        assert!(pbm.starts_with(b"P4\n10 2\n"));
        assert_eq!(&pbm[pbm.len() - 4..], &[0x80, 0x00, 0x00, 0x40]);

        let mut sink: Vec<Framebuffer> = Vec::new();
        sink.present(&fb);
        assert_eq!(sink.len(), 1);
    }
}
