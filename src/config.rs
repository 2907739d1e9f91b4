//! Tunables shared by the sampler, segment builder and renderer.

use tracing::debug;

use crate::error::PlotError;

/// Lowest value either adaptive knob can take.
pub const ADAPTIVE_MIN: u32 = 1;
/// Highest value either adaptive knob can take.
pub const ADAPTIVE_MAX: u32 = 30;
/// Smallest accepted coarse sampling density.
pub const MIN_SAMPLES_PER_PX: f64 = 0.1;
/// Largest coarse sampling density; higher requests are capped.
pub const MAX_SAMPLES_PER_PX: f64 = 100.0;

/// Graph configuration.
///
/// Passed by reference into every stage of a frame. Only the explicit
/// sampling adjustments below change it after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    /// Zoom factor applied by zoom-in.
    pub zoom_in: f64,
    /// Zoom factor applied by zoom-out.
    pub zoom_out: f64,
    /// Fraction of the axis span moved by one pan.
    pub pan_shift: f64,
    /// Coarse samples per pixel before zoom scaling.
    pub base_samples_per_px: f64,
    /// Divisor of the zoom level in the zoomed-in sampling boost.
    pub zoom_quality_factor: f64,
    /// Extra samples inserted into each flagged interval.
    pub refine_samples: usize,
    /// Fraction of the plot height above which a pixel jump breaks a line.
    pub max_jump_fraction: f64,
    /// Shortest run of points kept as a segment.
    pub min_segment_length: usize,
    /// Intermediate frames of a pan or zoom animation.
    pub transition_steps: u32,
    /// Delay between animation frames in milliseconds.
    pub transition_delay_ms: u64,
    /// Pixel rows below the plot reserved for the cursor readout.
    pub bottom_margin: u32,
    /// Draw tick marks on the axes.
    pub smart_ticks: bool,
    /// Draw the viewport bounds as small labels at the plot edges.
    pub boundary_labels: bool,
    /// Cap of the sampling boost when zoomed in.
    pub adaptive_increase: u32,
    /// Cap of the sampling reduction when zoomed out.
    pub adaptive_decrease: u32,
    /// Target tick count on the x axis.
    pub x_tick_target: usize,
    /// Target tick count on the y axis.
    pub y_tick_target: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            zoom_in: 0.8,
            zoom_out: 1.25,
            pan_shift: 0.15,
            base_samples_per_px: 3.0,
            zoom_quality_factor: 6.0,
            refine_samples: 12,
            max_jump_fraction: 0.2,
            min_segment_length: 2,
            transition_steps: 6,
            transition_delay_ms: 15,
            bottom_margin: 8,
            smart_ticks: true,
            boundary_labels: false,
            adaptive_increase: 4,
            adaptive_decrease: 5,
            x_tick_target: 12,
            y_tick_target: 8,
        }
    }
}

impl GraphConfig {
    /// Sample more aggressively at both ends of the zoom scale.
    pub fn increase_sampling(&mut self) {
        self.adaptive_increase = (self.adaptive_increase + 1).min(ADAPTIVE_MAX);
        self.adaptive_decrease = self.adaptive_decrease.saturating_sub(1).max(ADAPTIVE_MIN);
        debug!(
            increase = self.adaptive_increase,
            decrease = self.adaptive_decrease,
            "adaptive sampling increased"
        );
    }

    /// Sample less aggressively at both ends of the zoom scale.
    pub fn decrease_sampling(&mut self) {
        self.adaptive_increase = self.adaptive_increase.saturating_sub(1).max(ADAPTIVE_MIN);
        self.adaptive_decrease = (self.adaptive_decrease + 1).min(ADAPTIVE_MAX);
        debug!(
            increase = self.adaptive_increase,
            decrease = self.adaptive_decrease,
            "adaptive sampling decreased"
        );
    }

    /// Set the coarse sampling density, returning the value applied.
    ///
    /// Values above [`MAX_SAMPLES_PER_PX`] are capped; values below
    /// [`MIN_SAMPLES_PER_PX`] (or NaN) are rejected and leave the config as is.
    pub fn set_base_samples_per_px(&mut self, samples: f64) -> Result<f64, PlotError> {
        if samples.is_nan() || samples < MIN_SAMPLES_PER_PX {
            return Err(PlotError::SamplingDensity(samples));
        }
        self.base_samples_per_px = samples.min(MAX_SAMPLES_PER_PX);
        debug!(samples = self.base_samples_per_px, "base sampling density set");
        Ok(self.base_samples_per_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_knobs_stay_in_bounds() {
        let mut config = GraphConfig::default();
        for _ in 0..40 {
            config.increase_sampling();
        }
        assert_eq!(config.adaptive_increase, ADAPTIVE_MAX);
        assert_eq!(config.adaptive_decrease, ADAPTIVE_MIN);
        for _ in 0..40 {
            config.decrease_sampling();
        }
        assert_eq!(config.adaptive_increase, ADAPTIVE_MIN);
        assert_eq!(config.adaptive_decrease, ADAPTIVE_MAX);
    }

    #[test]
    fn one_step_moves_both_knobs() {
        let mut config = GraphConfig::default();
        config.increase_sampling();
        assert_eq!((config.adaptive_increase, config.adaptive_decrease), (5, 4));
        config.decrease_sampling();
        config.decrease_sampling();
        assert_eq!((config.adaptive_increase, config.adaptive_decrease), (3, 6));
    }

    #[test]
    fn sampling_density_is_validated() {
        let mut config = GraphConfig::default();
        assert_eq!(config.set_base_samples_per_px(250.0), Ok(MAX_SAMPLES_PER_PX));
        assert_eq!(config.set_base_samples_per_px(0.5), Ok(0.5));
        assert!(config.set_base_samples_per_px(0.05).is_err());
        assert!(config.set_base_samples_per_px(f64::NAN).is_err());
        assert_eq!(config.base_samples_per_px, 0.5);
    }
}
