//! Coordinate transforms between data space and the pixel grid.

use crate::geom::{PixelPoint, PlotArea, Point};
use crate::view::Viewport;

/// Transform from data coordinates into pixel coordinates.
///
/// Pixel centers sit on the viewport bounds: column 0 is `x_min`, column
/// `width - 1` is `x_max`, row 0 is `y_max` and row `height - 1` is `y_min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    viewport: Viewport,
    area: PlotArea,
    x_scale: f64,
    y_scale: f64,
}

impl Transform {
    /// Create a transform for the given viewport and plot area.
    ///
    /// Returns `None` for a degenerate viewport or an area smaller than two
    /// pixels on either axis.
    pub fn new(viewport: Viewport, area: PlotArea) -> Option<Self> {
        if !viewport.is_valid() || !area.is_valid() {
            return None;
        }
        Some(Self {
            viewport,
            area,
            x_scale: viewport.x.span() / f64::from(area.width - 1),
            y_scale: viewport.y.span() / f64::from(area.height - 1),
        })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the plot area.
    pub fn area(&self) -> PlotArea {
        self.area
    }

    /// Plot width in pixels.
    pub fn width(&self) -> i32 {
        self.area.width as i32
    }

    /// Plot height in pixels.
    pub fn height(&self) -> i32 {
        self.area.height as i32
    }

    /// Map an x value to its column, or `None` when it falls off the plot.
    pub fn map_x(&self, x: f64) -> Option<i32> {
        let px = self.column(x)?;
        (0..self.area.width as i64).contains(&px).then_some(px as i32)
    }

    /// Map a y value to its row, or `None` when it falls off the plot.
    pub fn map_y(&self, y: f64) -> Option<i32> {
        let py = self.row(y)?;
        (0..self.area.height as i64).contains(&py).then_some(py as i32)
    }

    /// Map an x value to a column, clamped to the plot edges.
    pub fn map_x_clamped(&self, x: f64) -> i32 {
        match self.column(x) {
            Some(px) => px.clamp(0, self.area.width as i64 - 1) as i32,
            None => 0,
        }
    }

    /// Map a y value to a row, clamped to the plot edges.
    pub fn map_y_clamped(&self, y: f64) -> i32 {
        match self.row(y) {
            Some(py) => py.clamp(0, self.area.height as i64 - 1) as i32,
            None => 0,
        }
    }

    /// Map a data point to its pixel when both coordinates are on the plot.
    pub fn data_to_pixel(&self, point: Point) -> Option<PixelPoint> {
        Some(PixelPoint::new(self.map_x(point.x)?, self.map_y(point.y)?))
    }

    /// Data-space x at a (possibly fractional) column.
    pub fn column_to_x(&self, column: f64) -> f64 {
        self.viewport.x.min + column * self.x_scale
    }

    /// Data-space y at a (possibly fractional) row.
    pub fn row_to_y(&self, row: f64) -> f64 {
        self.viewport.y.max - row * self.y_scale
    }

    fn column(&self, x: f64) -> Option<i64> {
        to_pixel((x - self.viewport.x.min) / self.x_scale)
    }

    fn row(&self, y: f64) -> Option<i64> {
        to_pixel((self.viewport.y.max - y) / self.y_scale)
    }
}

fn to_pixel(offset: f64) -> Option<i64> {
    let rounded = (offset + 0.5).floor();
    if rounded.is_nan() {
        return None;
    }
    // Saturate far-off values so clamping still lands on the right edge.
    Some(rounded.clamp(-1e9, 1e9) as i64)
}
