//! Function evaluation with a three-way result.
//!
//! The plotter only needs a capability: "give me `f(x)` or tell me it failed".
//! [`Evaluate`] is that seam, [`FunctionEvaluator`] wraps it and classifies
//! every result against the visible y range.

pub mod expr;

use std::cell::Cell;

pub use expr::{ExprError, Expression};

use crate::view::Range;

/// Results with a magnitude above this are treated as undefined.
pub const FINITE_GUARD: f64 = 1e10;

/// Something that can be evaluated at an `x` value.
pub trait Evaluate {
    /// Evaluate at `x`. Failures are reported, never panicked.
    fn evaluate(&self, x: f64) -> Result<f64, ExprError>;
}

impl Evaluate for Expression {
    fn evaluate(&self, x: f64) -> Result<f64, ExprError> {
        self.eval(x)
    }
}

impl<F> Evaluate for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> Result<f64, ExprError> {
        Ok(self(x))
    }
}

/// Classification of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    /// Finite and inside the visible y range.
    Valid,
    /// Evaluation failed, or produced NaN, ±∞ or a huge value.
    Undefined,
    /// Finite but outside the visible y range.
    OutOfBounds,
}

/// Outcome of evaluating the function at one `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// The value, kept for out-of-bounds results.
    pub y: Option<f64>,
    /// Classification of the value.
    pub status: SampleStatus,
}

/// Check whether a value is finite and below [`FINITE_GUARD`] in magnitude.
pub fn is_plottable(value: f64) -> bool {
    !value.is_nan() && value.abs() <= FINITE_GUARD
}

/// Adapter around a function that classifies results for one viewport.
pub struct FunctionEvaluator<'a, E: ?Sized> {
    function: &'a E,
    y_range: Range,
    evaluations: Cell<usize>,
}

impl<'a, E> FunctionEvaluator<'a, E>
where
    E: Evaluate + ?Sized,
{
    /// Create an evaluator that classifies against `y_range`.
    pub fn new(function: &'a E, y_range: Range) -> Self {
        Self {
            function,
            y_range,
            evaluations: Cell::new(0),
        }
    }

    /// Evaluate and classify.
    pub fn evaluate(&self, x: f64) -> Evaluation {
        match self.evaluate_finite(x) {
            None => Evaluation {
                y: None,
                status: SampleStatus::Undefined,
            },
            Some(y) if !self.y_range.contains(y) => Evaluation {
                y: Some(y),
                status: SampleStatus::OutOfBounds,
            },
            Some(y) => Evaluation {
                y: Some(y),
                status: SampleStatus::Valid,
            },
        }
    }

    /// Evaluate without range classification; `None` when undefined.
    pub fn evaluate_finite(&self, x: f64) -> Option<f64> {
        self.evaluations.set(self.evaluations.get() + 1);
        self.function
            .evaluate(x)
            .ok()
            .filter(|y| is_plottable(*y))
    }

    /// Number of evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.get()
    }
}
