//! Tick placement for the axes.

use std::f64::consts::PI;

use crate::view::Range;

/// π ticks closer than this to zero are dropped, the origin already has an axis.
pub const PI_TICK_ZERO: f64 = 0.01;

/// How a tick sequence was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Multiples of 1, 2 or 5 times a power of ten.
    Nice,
    /// Multiples of a fraction of π.
    Pi,
}

/// Tick values along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    /// Tick positions in data space, ascending.
    pub values: Vec<f64>,
    /// Distance between consecutive ticks.
    pub step: f64,
    /// Generator used.
    pub kind: TickKind,
}

impl Ticks {
    fn empty(kind: TickKind) -> Self {
        Self {
            values: Vec::new(),
            step: 0.0,
            kind,
        }
    }
}

/// Step from the 1-2-5 ladder giving at most `target` ticks over `span`.
pub fn nice_step(span: f64, target: usize) -> Option<f64> {
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return None;
    }
    let target = target as f64;
    let magnitude = 10_f64.powf((span / target).log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| span / step <= target)
        .unwrap_or(magnitude);
    Some(step)
}

/// Evenly spaced "nice" ticks, at most `target` of them.
pub fn nice_ticks(range: Range, target: usize) -> Ticks {
    if !range.is_valid() {
        return Ticks::empty(TickKind::Nice);
    }
    let Some(step) = nice_step(range.span(), target) else {
        return Ticks::empty(TickKind::Nice);
    };
    let first = (range.min / step).ceil();
    let values = (0..target)
        .map(|i| (first + i as f64) * step)
        .take_while(|value| *value <= range.max)
        .collect();
    Ticks {
        values,
        step,
        kind: TickKind::Nice,
    }
}

/// Step between π ticks for a span.
pub fn pi_step(span: f64) -> f64 {
    if span > 3.0 * PI {
        PI
    } else if span < PI {
        PI / 4.0
    } else {
        PI / 2.0
    }
}

/// Multiples of [`pi_step`] inside the range, skipping zero.
///
/// Generation stops one tick past `limit`, callers only care whether the
/// count fits.
pub fn pi_ticks(range: Range, limit: usize) -> Ticks {
    if !range.is_valid() {
        return Ticks::empty(TickKind::Pi);
    }
    let step = pi_step(range.span());
    let first = (range.min / step).ceil();
    let values = (0..)
        .map(|i| (first + f64::from(i)) * step)
        .take_while(|value| *value <= range.max)
        .filter(|value| value.abs() > PI_TICK_ZERO)
        .take(limit.saturating_add(1))
        .collect();
    Ticks {
        values,
        step,
        kind: TickKind::Pi,
    }
}

/// π ticks when between 3 and `target` of them fit, otherwise nice ticks.
pub fn smart_ticks(range: Range, target: usize) -> Ticks {
    let pi = pi_ticks(range, target);
    if (3..=target).contains(&pi.values.len()) {
        return pi;
    }
    nice_ticks(range, target)
}
