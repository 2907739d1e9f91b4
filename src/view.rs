//! Data ranges and the visible viewport.
//!
//! Every viewport operation returns a new value. The interactive session swaps
//! the whole viewport in at once, which keeps animation interpolation between
//! two complete viewports well defined.

use crate::geom::PlotArea;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn center(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Check whether a value lies inside the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Scale the span by `factor` around the midpoint.
    pub fn scaled(&self, factor: f64) -> Self {
        let center = self.center();
        let half = self.span() * factor * 0.5;
        Self::new(center - half, center + half)
    }

    /// Shift both bounds by `delta`.
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Keep the span but move the midpoint to `center`.
    pub fn recentered(&self, center: f64) -> Self {
        let half = self.span() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Linear interpolation of both bounds towards `other`.
    pub fn lerp(&self, other: Self, t: f64) -> Self {
        Self {
            min: self.min + (other.min - self.min) * t,
            max: self.max + (other.max - self.max) * t,
        }
    }
}

/// Direction of a viewport pan.
///
/// The direction names where the window moves: panning left reveals smaller
/// x values, panning up reveals larger y values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    /// Towards larger y.
    Up,
    /// Towards smaller y.
    Down,
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
}

impl PanDirection {
    /// The direction that undoes this one.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Create a viewport from its four bounds.
    pub fn from_bounds(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self::new(Range::new(x_min, x_max), Range::new(y_min, y_max))
    }

    /// Check whether both axes are valid.
    ///
    /// A viewport with a zero-width or zero-height range is degenerate and
    /// produces no plot.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Scale both ranges around their midpoints.
    ///
    /// A factor below one zooms in, above one zooms out.
    pub fn zoom(&self, factor: f64) -> Self {
        Self::new(self.x.scaled(factor), self.y.scaled(factor))
    }

    /// Shift one axis by `fraction` of its span.
    pub fn pan(&self, direction: PanDirection, fraction: f64) -> Self {
        match direction {
            PanDirection::Up => Self::new(self.x, self.y.shifted(self.y.span() * fraction)),
            PanDirection::Down => Self::new(self.x, self.y.shifted(-self.y.span() * fraction)),
            PanDirection::Left => Self::new(self.x.shifted(-self.x.span() * fraction), self.y),
            PanDirection::Right => Self::new(self.x.shifted(self.x.span() * fraction), self.y),
        }
    }

    /// Shift the viewport by a pixel delta within `area`.
    ///
    /// Positive `dx_px` moves the window towards larger x. Positive `dy_px`
    /// moves it towards smaller y, since pixel row 0 is the top of the plot.
    pub fn pan_by_pixels(&self, dx_px: f64, dy_px: f64, area: PlotArea) -> Self {
        let mut next = *self;
        if area.width > 1 && dx_px != 0.0 {
            let per_px = self.x.span() / f64::from(area.width - 1);
            next.x = self.x.shifted(per_px * dx_px);
        }
        if area.height > 1 && dy_px != 0.0 {
            let per_px = self.y.span() / f64::from(area.height - 1);
            next.y = self.y.shifted(-per_px * dy_px);
        }
        next
    }

    /// Keep the x span but center it on `x`.
    pub fn recenter_on(&self, x: f64) -> Self {
        Self::new(self.x.recentered(x), self.y)
    }

    /// Interpolate every bound towards `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(self.x.lerp(other.x, t), self.y.lerp(other.y, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn zoom_scales_around_center() {
        let viewport = Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0);
        let zoomed = viewport.zoom(0.5);
        assert_close(zoomed.x.min, -10.0);
        assert_close(zoomed.x.max, 10.0);
        assert_close(zoomed.y.min, -5.0);
        assert_close(zoomed.y.max, 5.0);
    }

    #[test]
    fn pan_moves_one_axis() {
        let viewport = Viewport::from_bounds(0.0, 10.0, 0.0, 4.0);
        let left = viewport.pan(PanDirection::Left, 0.15);
        assert_close(left.x.min, -1.5);
        assert_eq!(left.y, viewport.y);
        let up = viewport.pan(PanDirection::Up, 0.25);
        assert_close(up.y.min, 1.0);
        assert_eq!(up.x, viewport.x);
    }

    #[test]
    fn pixel_pan_inverts_rows() {
        let viewport = Viewport::from_bounds(0.0, 127.0, 0.0, 55.0);
        let area = PlotArea::new(128, 56);
        let shifted = viewport.pan_by_pixels(1.0, 1.0, area);
        assert_close(shifted.x.min, 1.0);
        assert_close(shifted.y.min, -1.0);
    }

    #[test]
    fn recenter_keeps_span() {
        let viewport = Viewport::from_bounds(-4.0, 6.0, -1.0, 1.0);
        let centered = viewport.recenter_on(100.0);
        assert_close(centered.x.span(), 10.0);
        assert_close(centered.x.center(), 100.0);
        assert_eq!(centered.y, viewport.y);
    }

    #[test]
    fn zero_span_is_degenerate() {
        assert!(!Viewport::from_bounds(1.0, 1.0, 0.0, 1.0).is_valid());
        assert!(!Viewport::from_bounds(0.0, 1.0, f64::NAN, 1.0).is_valid());
        assert!(Viewport::from_bounds(2.0, 1.0, 0.0, 1.0).is_valid());
    }

    #[test]
    fn lerp_reaches_target() {
        let a = Viewport::from_bounds(0.0, 10.0, 0.0, 10.0);
        let b = Viewport::from_bounds(5.0, 15.0, -5.0, 5.0);
        assert_eq!(a.lerp(&b, 1.0), b);
        let half = a.lerp(&b, 0.5);
        assert_close(half.x.min, 2.5);
        assert_close(half.y.max, 7.5);
    }
}
