//! Splitting sorted samples into independent polylines.
//!
//! A segment ends when a point has no pixel on the plot (clipping) or when one
//! of three discontinuity checks fires between consecutive points:
//!
//! * pixel jump: the rows differ by more than [`max_jump`];
//! * x gap: the points are further apart than two coarse spacings;
//! * slope ratio: the slope changes by more than 20× around the previous point.
//!
//! Each check is confirmed by evaluating the midpoint, so steep but smooth
//! curves stay connected.

use tracing::trace;

use crate::config::GraphConfig;
use crate::eval::{Evaluate, FunctionEvaluator, SampleStatus};
use crate::geom::{PixelPoint, Point};
use crate::sampler::SampleSet;
use crate::transform::Transform;

/// Upper bound of the widened jump fraction at high zoom.
pub const MAX_JUMP_FRACTION_CAP: f64 = 0.35;
/// Slopes below this magnitude are treated as flat by the slope-ratio check.
pub const FLAT_SLOPE: f64 = 1e-6;
/// Slope ratios outside `[MIN_SLOPE_RATIO, MAX_SLOPE_RATIO]` are suspicious.
pub const MAX_SLOPE_RATIO: f64 = 20.0;
/// See [`MAX_SLOPE_RATIO`].
pub const MIN_SLOPE_RATIO: f64 = 0.05;

/// Largest row difference between connected points.
///
/// The fraction of the plot height widens with zoom because steep but
/// continuous stretches are common when zoomed in.
pub fn max_jump(plot_height: u32, zoom_level: f64, config: &GraphConfig) -> i32 {
    let fraction = if zoom_level > 2.0 {
        (config.max_jump_fraction * (1.0 + zoom_level / 10.0)).min(MAX_JUMP_FRACTION_CAP)
    } else {
        config.max_jump_fraction
    };
    (f64::from(plot_height) * fraction).floor() as i32
}

/// Connected run of visible points, ordered by x.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    points: Vec<Point>,
    pixels: Vec<PixelPoint>,
}

impl Segment {
    /// Build a segment from parallel point and pixel lists.
    pub(crate) fn from_parts(points: Vec<Point>, pixels: Vec<PixelPoint>) -> Self {
        debug_assert_eq!(points.len(), pixels.len());
        Self { points, pixels }
    }

    /// Data-space points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Pixel of every point, parallel to [`Segment::points`].
    pub fn pixels(&self) -> &[PixelPoint] {
        &self.pixels
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check whether the segment has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Leftmost and rightmost column covered.
    pub fn column_span(&self) -> Option<(i32, i32)> {
        Some((self.pixels.first()?.x, self.pixels.last()?.x))
    }
}

/// Output of the segment builder for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentSet {
    /// Runs of at least `min_segment_length` points.
    pub segments: Vec<Segment>,
    /// Single visible points with no neighbor to connect to.
    pub isolated: Vec<PixelPoint>,
}

impl SegmentSet {
    /// Check whether nothing is drawable.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.isolated.is_empty()
    }

    /// Total points across all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

/// Which check split two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Break {
    /// Row difference above the jump limit.
    PixelJump,
    /// Horizontal gap with an undefined midpoint.
    XGap,
    /// Sharp slope change with an undefined midpoint.
    SlopeRatio,
}

/// Segment builder for one frame.
pub struct SegmentBuilder<'a, 'f, E: ?Sized> {
    evaluator: &'a FunctionEvaluator<'f, E>,
    transform: &'a Transform,
    min_segment_length: usize,
    zoom_level: f64,
    max_jump: i32,
    max_gap: f64,
}

impl<'a, 'f, E> SegmentBuilder<'a, 'f, E>
where
    E: Evaluate + ?Sized,
{
    /// Create a builder for a sample set traced with `transform`.
    pub fn new(
        evaluator: &'a FunctionEvaluator<'f, E>,
        transform: &'a Transform,
        config: &GraphConfig,
        samples: &SampleSet,
    ) -> Self {
        Self {
            evaluator,
            transform,
            min_segment_length: config.min_segment_length,
            zoom_level: samples.zoom_level(),
            max_jump: max_jump(transform.area().height, samples.zoom_level(), config),
            max_gap: samples.coarse_spacing() * 2.0,
        }
    }

    /// Jump limit used by the pixel-jump check.
    pub fn max_jump(&self) -> i32 {
        self.max_jump
    }

    /// Partition sorted samples into segments.
    pub fn build(&self, samples: &SampleSet) -> SegmentSet {
        let mut out = SegmentSet::default();
        let mut current = Segment::from_parts(Vec::new(), Vec::new());

        for sample in samples.samples() {
            let visible = sample
                .y
                .map(|y| Point::new(sample.x, y))
                .and_then(|point| Some((point, self.transform.data_to_pixel(point)?)));
            let Some((point, pixel)) = visible else {
                self.flush(&mut current, &mut out);
                continue;
            };

            if !current.is_empty() {
                if let Some(reason) = self.discontinuity(&current, point, pixel) {
                    trace!(x = point.x, ?reason, "segment break");
                    self.flush(&mut current, &mut out);
                }
            }
            current.points.push(point);
            current.pixels.push(pixel);
        }
        self.flush(&mut current, &mut out);
        out
    }

    /// End the current run: keep it as a segment, a lone dot, or drop it.
    fn flush(&self, current: &mut Segment, out: &mut SegmentSet) {
        if current.len() >= self.min_segment_length.max(2) {
            out.segments.push(Segment::from_parts(
                std::mem::take(&mut current.points),
                std::mem::take(&mut current.pixels),
            ));
            return;
        }
        if let [pixel] = current.pixels[..] {
            out.isolated.push(pixel);
        }
        current.points.clear();
        current.pixels.clear();
    }

    fn discontinuity(&self, current: &Segment, point: Point, pixel: PixelPoint) -> Option<Break> {
        let n = current.len();
        let prev = current.points[n - 1];
        let prev_pixel = current.pixels[n - 1];
        let mid_x = (prev.x + point.x) / 2.0;

        if (pixel.y - prev_pixel.y).abs() > self.max_jump && self.jump_confirmed(mid_x, pixel, prev_pixel) {
            return Some(Break::PixelJump);
        }

        if point.x - prev.x > self.max_gap && self.is_undefined(mid_x) {
            return Some(Break::XGap);
        }

        if self.zoom_level <= 2.0 && n >= 3 {
            let before = current.points[n - 2];
            let slope_in = slope(before, prev)?;
            let slope_out = slope(prev, point)?;
            if slope_in.abs() > FLAT_SLOPE && slope_out.abs() > FLAT_SLOPE {
                let ratio = (slope_out / slope_in).abs();
                if !(MIN_SLOPE_RATIO..=MAX_SLOPE_RATIO).contains(&ratio) && self.is_undefined(mid_x) {
                    return Some(Break::SlopeRatio);
                }
            }
        }
        None
    }

    /// At low zoom every large jump is a break. At high zoom the midpoint has
    /// to be undefined, off the plot, or far from the straight line between
    /// the ends.
    fn jump_confirmed(&self, mid_x: f64, pixel: PixelPoint, prev_pixel: PixelPoint) -> bool {
        if self.zoom_level <= 2.0 {
            return true;
        }
        let mid = self.evaluator.evaluate(mid_x);
        if mid.status == SampleStatus::Undefined {
            return true;
        }
        let Some(mid_row) = mid.y.and_then(|y| self.transform.map_y(y)) else {
            return true;
        };
        let expected = f64::from(pixel.y + prev_pixel.y) / 2.0;
        (f64::from(mid_row) - expected).abs() > f64::from(self.max_jump) / 2.0
    }

    fn is_undefined(&self, x: f64) -> bool {
        self.evaluator.evaluate(x).status == SampleStatus::Undefined
    }
}

fn slope(a: Point, b: Point) -> Option<f64> {
    let dx = b.x - a.x;
    (dx > 0.0).then(|| (b.y - a.y) / dx)
}
