//! Geometric primitives used by the plotting pipeline.
//!
//! [`Point`] lives in data space. [`PixelPoint`] addresses a single pixel of
//! the monochrome grid, with row 0 at the top.

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A pixel position on the display grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    /// Column, 0 is the leftmost.
    pub x: i32,
    /// Row, 0 is the topmost.
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of a pixel display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl DisplaySize {
    /// The 128×64 panel the plotter targets.
    pub const LCD: Self = Self::new(128, 64);

    /// Create a display size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for DisplaySize {
    fn default() -> Self {
        Self::LCD
    }
}

/// Pixel extent of the plotting region: the full display width and the rows
/// above the readout margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PlotArea {
    /// Create a plot area.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Plot area of a display with `bottom_margin` rows reserved at the bottom.
    pub fn for_display(size: DisplaySize, bottom_margin: u32) -> Self {
        Self {
            width: size.width,
            height: size.height.saturating_sub(bottom_margin),
        }
    }

    /// Check whether the area can hold a plot (two pixels on each axis).
    pub fn is_valid(&self) -> bool {
        self.width >= 2 && self.height >= 2
    }
}
