//! Zoom-adaptive sampling of a function across the viewport width.
//!
//! A frame is sampled in three passes over one coarse, evenly spaced grid:
//!
//! 1. the coarse pass itself, at a density that follows the zoom level;
//! 2. boundary bisection on every coarse pair whose status flips between
//!    defined and undefined or between visible and off-range, so curves run
//!    up to asymptotes and screen edges;
//! 3. refinement inside intervals that change state, jump by more than a
//!    pixel or two, or bend sharply.
//!
//! Every loop runs a fixed number of times.

use tracing::debug;

use crate::config::GraphConfig;
use crate::eval::{Evaluate, FunctionEvaluator, SampleStatus};
use crate::transform::Transform;

/// Viewport width that counts as zoom level 1.
pub const REFERENCE_RANGE: f64 = 40.0;
/// Smallest x span used when computing the zoom level.
pub const MIN_ZOOM_RANGE: f64 = 0.1;
/// Bisection steps at a defined/undefined boundary.
pub const UNDEFINED_BISECTION_STEPS: usize = 15;
/// Bisection steps at a visible/off-range boundary.
pub const EDGE_BISECTION_STEPS: usize = 12;
/// Coarse samples per pixel never go below this.
pub const MIN_COARSE_PER_PX: usize = 2;
/// Coarse samples per pixel never exceed this.
pub const MAX_COARSE_PER_PX: usize = 25;

/// How a sample entered the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSource {
    /// The evenly spaced first pass.
    Coarse,
    /// Extra samples inside a flagged interval.
    Refined,
    /// A midpoint visited while bisecting towards a boundary.
    Boundary,
}

/// One evaluated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position on the x axis.
    pub x: f64,
    /// Value, absent when undefined.
    pub y: Option<f64>,
    /// Classification of the value.
    pub status: SampleStatus,
    /// Pass that produced the sample.
    pub source: SampleSource,
}

/// Samples of one frame, sorted by `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
    coarse_count: usize,
    coarse_spacing: f64,
    zoom_level: f64,
}

impl SampleSet {
    /// Sorted samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of coarse evaluations.
    pub fn coarse_count(&self) -> usize {
        self.coarse_count
    }

    /// Distance between coarse samples.
    pub fn coarse_spacing(&self) -> f64 {
        self.coarse_spacing
    }

    /// Zoom level the set was sampled at.
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// Count samples produced by one pass.
    pub fn count(&self, source: SampleSource) -> usize {
        self.samples.iter().filter(|sample| sample.source == source).count()
    }
}

/// How far the view is zoomed relative to a 40-unit-wide window.
pub fn zoom_level(x_span: f64) -> f64 {
    REFERENCE_RANGE / x_span.max(MIN_ZOOM_RANGE)
}

/// Factor applied to the base sampling density at a zoom level.
pub fn sampling_multiplier(zoom_level: f64, config: &GraphConfig) -> f64 {
    if zoom_level > 2.0 {
        let boost = (zoom_level / config.zoom_quality_factor).min(f64::from(config.adaptive_increase));
        1.0 + boost
    } else if zoom_level < 0.5 {
        let divisor = f64::from(config.adaptive_decrease).min((1.0 / zoom_level) / 2.0);
        (1.0 / divisor).max(0.5)
    } else {
        1.0
    }
}

/// Number of coarse samples across `width` pixels at a zoom level.
pub fn coarse_sample_count(width: u32, zoom_level: f64, config: &GraphConfig) -> usize {
    let width = width as usize;
    let wanted = width as f64 * config.base_samples_per_px * sampling_multiplier(zoom_level, config);
    // Float to int casts saturate, so absurd densities still land on the cap.
    (wanted as usize).clamp(width * MIN_COARSE_PER_PX, width * MAX_COARSE_PER_PX)
}

/// Extra samples inserted into each flagged interval at a zoom level.
pub fn refine_sample_count(zoom_level: f64, config: &GraphConfig) -> usize {
    let base = config.refine_samples as f64;
    if zoom_level > 2.0 {
        let factor = (zoom_level / 2.0).min(f64::from(config.adaptive_increase) / 2.0);
        (base * factor) as usize
    } else if zoom_level < 0.5 {
        ((base / (f64::from(config.adaptive_decrease) / 2.0)) as usize).max(4)
    } else {
        config.refine_samples
    }
}

/// Adaptive sampler for one frame.
pub struct AdaptiveSampler<'a, 'f, E: ?Sized> {
    evaluator: &'a FunctionEvaluator<'f, E>,
    transform: &'a Transform,
    config: &'a GraphConfig,
}

impl<'a, 'f, E> AdaptiveSampler<'a, 'f, E>
where
    E: Evaluate + ?Sized,
{
    /// Create a sampler.
    pub fn new(
        evaluator: &'a FunctionEvaluator<'f, E>,
        transform: &'a Transform,
        config: &'a GraphConfig,
    ) -> Self {
        Self {
            evaluator,
            transform,
            config,
        }
    }

    /// Run all passes.
    ///
    /// Returns `None` when fewer than two coarse samples are visible, in which
    /// case nothing should be drawn.
    pub fn sample(&self) -> Option<SampleSet> {
        let x_range = self.transform.viewport().x;
        let zoom_level = zoom_level(x_range.span());
        let coarse_count = coarse_sample_count(self.transform.area().width, zoom_level, self.config);
        let coarse = self.coarse_pass(coarse_count);

        let valid = coarse
            .iter()
            .filter(|sample| sample.status == SampleStatus::Valid)
            .count();
        if valid < 2 {
            debug!(coarse_count, valid, "too few visible samples, skipping frame");
            return None;
        }

        let flagged = self.flag_intervals(&coarse, zoom_level);
        let mut samples = Vec::with_capacity(coarse_count * 2);
        self.bisect_boundaries(&coarse, &mut samples);
        let boundary = samples.len();
        self.refine(&coarse, &flagged, refine_sample_count(zoom_level, self.config), &mut samples);
        let refined = samples.len() - boundary;
        // Off-range coarse samples stay so the segment builder clips at them.
        samples.extend(
            coarse
                .iter()
                .filter(|sample| sample.status != SampleStatus::Undefined)
                .copied(),
        );
        samples.sort_by(|a, b| a.x.total_cmp(&b.x));

        debug!(
            zoom_level,
            coarse_count,
            flagged = flagged.iter().filter(|flag| **flag).count(),
            boundary,
            refined,
            "sampled frame"
        );

        Some(SampleSet {
            samples,
            coarse_count,
            coarse_spacing: x_range.span() / (coarse_count - 1) as f64,
            zoom_level,
        })
    }

    fn coarse_pass(&self, count: usize) -> Vec<Sample> {
        let x_range = self.transform.viewport().x;
        let last = (count - 1) as f64;
        (0..count)
            .map(|i| {
                let x = x_range.min + x_range.span() * i as f64 / last;
                self.sample_at(x, SampleSource::Coarse)
            })
            .collect()
    }

    /// Mark coarse intervals `[i, i + 1]` that need extra samples.
    fn flag_intervals(&self, coarse: &[Sample], zoom_level: f64) -> Vec<bool> {
        let threshold = if zoom_level > 2.0 { 1 } else { 2 };
        let y_span = self.transform.viewport().y.span();
        let curvature_limit = y_span / (f64::from(self.transform.area().width) * 0.5);

        (0..coarse.len().saturating_sub(1))
            .map(|i| {
                let (a, b) = (&coarse[i], &coarse[i + 1]);
                let a_valid = a.status == SampleStatus::Valid;
                let b_valid = b.status == SampleStatus::Valid;
                if a_valid != b_valid {
                    return true;
                }
                let (Some(y1), Some(y2)) = (valid_y(a), valid_y(b)) else {
                    return false;
                };
                if let (Some(p1), Some(p2)) = (self.transform.map_y(y1), self.transform.map_y(y2)) {
                    if (p2 - p1).abs() > threshold {
                        return true;
                    }
                }
                let Some(y0) = i.checked_sub(1).and_then(|prev| valid_y(&coarse[prev])) else {
                    return false;
                };
                let x0 = coarse[i - 1].x;
                let (dx1, dx2) = (a.x - x0, b.x - a.x);
                if dx1 <= 0.0 || dx2 <= 0.0 {
                    return false;
                }
                let curvature = ((y2 - y1) / dx2 - (y1 - y0) / dx1).abs();
                curvature > curvature_limit
            })
            .collect()
    }

    /// Bisect every coarse pair whose status flips across a boundary,
    /// recording each visible midpoint on the way.
    fn bisect_boundaries(&self, coarse: &[Sample], out: &mut Vec<Sample>) {
        use SampleStatus::{OutOfBounds, Undefined, Valid};

        for pair in coarse.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let (boundary, inside_is_left) = match (a.status, b.status) {
                (Undefined, Undefined) => continue,
                (_, Undefined) => (Boundary::Domain, true),
                (Undefined, _) => (Boundary::Domain, false),
                (Valid, OutOfBounds) => (Boundary::Edge, true),
                (OutOfBounds, Valid) => (Boundary::Edge, false),
                _ => continue,
            };

            let (mut lo, mut hi) = (a.x, b.x);
            for _ in 0..boundary.steps() {
                let mid = (lo + hi) / 2.0;
                let sample = self.sample_at(mid, SampleSource::Boundary);
                // Move the end on the same side of the boundary as `mid`.
                if boundary.inside(sample.status) == inside_is_left {
                    lo = mid;
                } else {
                    hi = mid;
                }
                if sample.status == Valid {
                    out.push(sample);
                }
            }
        }
    }

    fn refine(&self, coarse: &[Sample], flagged: &[bool], per_interval: usize, out: &mut Vec<Sample>) {
        for (i, _) in flagged.iter().enumerate().filter(|(_, flag)| **flag) {
            let (x1, x2) = (coarse[i].x, coarse[i + 1].x);
            for j in 1..per_interval {
                let x = x1 + (x2 - x1) * j as f64 / per_interval as f64;
                let sample = self.sample_at(x, SampleSource::Refined);
                if sample.status != SampleStatus::Undefined {
                    out.push(sample);
                }
            }
        }
    }

    fn sample_at(&self, x: f64, source: SampleSource) -> Sample {
        let evaluation = self.evaluator.evaluate(x);
        Sample {
            x,
            y: evaluation.y,
            status: evaluation.status,
            source,
        }
    }
}

#[derive(Clone, Copy)]
enum Boundary {
    /// Defined on one side, undefined on the other.
    Domain,
    /// Visible on one side, off-range on the other.
    Edge,
}

impl Boundary {
    fn steps(self) -> usize {
        match self {
            Boundary::Domain => UNDEFINED_BISECTION_STEPS,
            Boundary::Edge => EDGE_BISECTION_STEPS,
        }
    }

    fn inside(self, status: SampleStatus) -> bool {
        match self {
            Boundary::Domain => status != SampleStatus::Undefined,
            Boundary::Edge => status == SampleStatus::Valid,
        }
    }
}

fn valid_y(sample: &Sample) -> Option<f64> {
    match sample.status {
        SampleStatus::Valid => sample.y,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::PlotArea;
    use crate::view::{Range, Viewport};

    fn run<F: Fn(f64) -> f64>(f: F, viewport: Viewport) -> Option<SampleSet> {
        let config = GraphConfig::default();
        let transform = Transform::new(viewport, PlotArea::new(128, 56)).expect("valid transform");
        let evaluator = FunctionEvaluator::new(&f, viewport.y);
        AdaptiveSampler::new(&evaluator, &transform, &config).sample()
    }

    #[test]
    fn multiplier_regions() {
        let config = GraphConfig::default();
        assert_eq!(sampling_multiplier(1.0, &config), 1.0);
        assert_eq!(sampling_multiplier(12.0, &config), 3.0);
        assert_eq!(sampling_multiplier(400.0, &config), 5.0);
        assert_eq!(sampling_multiplier(0.25, &config), 0.5);
        assert_eq!(sampling_multiplier(0.01, &config), 0.5);
    }

    #[test]
    fn coarse_count_is_clamped() {
        let config = GraphConfig::default();
        assert_eq!(coarse_sample_count(128, 1.0, &config), 384);
        assert_eq!(coarse_sample_count(128, 0.01, &config), 256);
        let dense = GraphConfig {
            base_samples_per_px: 100.0,
            ..GraphConfig::default()
        };
        assert_eq!(coarse_sample_count(128, 1.0, &dense), 128 * 25);
    }

    #[test]
    fn refine_count_follows_zoom() {
        let config = GraphConfig::default();
        assert_eq!(refine_sample_count(1.0, &config), 12);
        assert_eq!(refine_sample_count(100.0, &config), 24);
        assert_eq!(refine_sample_count(0.1, &config), 4);
    }

    #[test]
    fn constant_has_only_coarse_samples() {
        let set = run(|_| 2.0, Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0)).expect("samples");
        assert_eq!(set.samples().len(), set.coarse_count());
        assert_eq!(set.count(SampleSource::Coarse), 384);
        assert!(set.samples().windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn bisection_approaches_screen_edge() {
        let viewport = Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0);
        let set = run(|x| x, viewport).expect("samples");
        let last_visible = set
            .samples()
            .iter()
            .filter(|s| s.status == SampleStatus::Valid)
            .map(|s| s.x)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(set.count(SampleSource::Boundary) > 0);
        assert!((10.0 - last_visible) < 1e-3, "last visible x {last_visible}");
    }

    #[test]
    fn undefined_samples_are_dropped() {
        let viewport = Viewport::from_bounds(-5.0, 5.0, -5.0, 5.0);
        let set = run(f64::sqrt, viewport).expect("samples");
        assert!(set.samples().iter().all(|s| s.status != SampleStatus::Undefined));
        let first = set.samples()[0].x;
        assert!(first >= 0.0 && first < 1e-3, "first defined x {first}");
    }

    #[test]
    fn off_range_coarse_samples_are_kept() {
        let viewport = Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0);
        let set = run(|x| x, viewport).expect("samples");
        let off_range = set
            .samples()
            .iter()
            .filter(|s| s.source == SampleSource::Coarse && s.status == SampleStatus::OutOfBounds)
            .count();
        // Half of the window lies above or below the view.
        assert!(off_range > set.coarse_count() / 3, "{off_range} off-range coarse samples");
        assert_eq!(set.count(SampleSource::Coarse), set.coarse_count());
    }

    #[test]
    fn nothing_visible_aborts() {
        assert!(run(|_| 100.0, Viewport::from_bounds(-1.0, 1.0, -1.0, 1.0)).is_none());
        assert!(run(|_| f64::NAN, Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0))).is_none());
    }
}
