//! Property-based invariants of the viewport, sampler, segment builder and
//! tick generator.
//!
//! 1. Panning left then right restores the bounds.
//! 2. Zooming in never lowers the coarse sample count.
//! 3. A constant inside the visible range is one full-width segment.
//! 4. Ticks are multiples of one step and stay inside the range.

use monoplot::axis::{nice_ticks, smart_ticks};
use monoplot::sampler::{coarse_sample_count, zoom_level};
use monoplot::{GraphConfig, PanDirection, PlotArea, Range, Viewport, trace};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn viewports() -> impl Strategy<Value = Viewport> {
    (-1000.0f64..1000.0, 0.5f64..500.0, -1000.0f64..1000.0, 0.5f64..500.0)
        .prop_map(|(x, w, y, h)| Viewport::from_bounds(x, x + w, y, y + h))
}

fn directions() -> impl Strategy<Value = PanDirection> {
    prop_oneof![
        Just(PanDirection::Up),
        Just(PanDirection::Down),
        Just(PanDirection::Left),
        Just(PanDirection::Right),
    ]
}

fn assert_close(a: f64, b: f64, scale: f64) -> Result<(), TestCaseError> {
    prop_assert!((a - b).abs() <= 1e-9 * scale.max(1.0), "{a} != {b}");
    Ok(())
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn pan_round_trip(viewport in viewports(), direction in directions(), fraction in 0.01f64..0.5) {
        let back = viewport.pan(direction, fraction).pan(direction.opposite(), fraction);
        let scale = viewport.x.min.abs().max(viewport.y.min.abs()) + 500.0;
        assert_close(back.x.min, viewport.x.min, scale)?;
        assert_close(back.x.max, viewport.x.max, scale)?;
        assert_close(back.y.min, viewport.y.min, scale)?;
        assert_close(back.y.max, viewport.y.max, scale)?;
    }

    #[test]
    fn zoom_in_never_lowers_coarse_count(span in 0.01f64..10_000.0, width in 2u32..512) {
        let config = GraphConfig::default();
        let before = coarse_sample_count(width, zoom_level(span), &config);
        let after = coarse_sample_count(width, zoom_level(span * config.zoom_in), &config);
        prop_assert!(after >= before, "{after} < {before} at span {span}");
    }

    #[test]
    fn constant_is_one_full_width_segment(viewport in viewports(), t in 0.05f64..0.95) {
        let c = viewport.y.min + viewport.y.span() * t;
        let f = move |_: f64| c;
        let area = PlotArea::new(128, 56);
        let traced = trace(&f, viewport, area, &GraphConfig::default());
        let set = traced.segments();
        prop_assert_eq!(set.segments.len(), 1);
        prop_assert!(set.isolated.is_empty());
        prop_assert_eq!(set.segments[0].column_span(), Some((0, 127)));
    }

    #[test]
    fn nice_ticks_share_one_step(min in -1e3f64..1e3, span in 1e-2f64..1e4, target in 3usize..16) {
        let range = Range::new(min, min + span);
        let ticks = nice_ticks(range, target);
        prop_assert!(!ticks.values.is_empty());
        prop_assert!(ticks.values.len() <= target);
        let slack = ticks.step * 1e-9;
        for value in &ticks.values {
            prop_assert!(*value >= range.min - slack && *value <= range.max + slack);
            let multiple = value / ticks.step;
            prop_assert!((multiple - multiple.round()).abs() < 1e-6, "{value} / {}", ticks.step);
        }
        for pair in ticks.values.windows(2) {
            prop_assert!((pair[1] - pair[0] - ticks.step).abs() <= ticks.step * 1e-6);
        }
    }

    #[test]
    fn smart_ticks_stay_in_range(min in -100f64..100.0, span in 0.1f64..200.0) {
        let range = Range::new(min, min + span);
        let ticks = smart_ticks(range, 8);
        prop_assert!(ticks.values.len() <= 8);
        for value in &ticks.values {
            prop_assert!(*value <= range.max && *value >= range.min - ticks.step * 1e-9);
        }
    }
}

#[test]
fn unit_interval_ticks() {
    let ticks = nice_ticks(Range::new(0.0, 10.0), 8);
    assert_eq!(ticks.step, 2.0);
    assert_eq!(ticks.values, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}
