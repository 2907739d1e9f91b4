//! Frame pipeline and the interactive plot session.
//!
//! [`trace`] runs sampler and segment builder for one viewport. [`Plot`] owns
//! the session state (expression, viewport, cursor, config), applies user
//! [`Action`]s and presents frames to a [`FrameSink`].

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::config::GraphConfig;
use crate::cursor::CursorState;
use crate::error::{InputField, PlotError};
use crate::eval::{Evaluate, Expression, FunctionEvaluator};
use crate::format::format_bound;
use crate::framebuffer::{FrameSink, Framebuffer};
use crate::geom::{DisplaySize, PlotArea};
use crate::interaction::{Action, Transition, navigation_action};
use crate::render::Renderer;
use crate::sampler::{AdaptiveSampler, SampleSource};
use crate::segment::{SegmentBuilder, SegmentSet};
use crate::transform::Transform;
use crate::view::Viewport;

/// Counters collected while tracing a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TraceStats {
    /// Zoom level of the viewport.
    pub zoom_level: f64,
    /// Coarse samples evaluated.
    pub coarse: usize,
    /// Boundary samples kept.
    pub boundary: usize,
    /// Refined samples kept.
    pub refined: usize,
    /// Function evaluations, including midpoint checks.
    pub evaluations: usize,
}

/// Segments of one frame with the transform they were mapped with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    transform: Option<Transform>,
    segments: SegmentSet,
    max_jump: i32,
    stats: TraceStats,
}

impl Trace {
    /// Transform of the frame; `None` for a degenerate viewport.
    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    /// Segments and isolated points.
    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    /// Jump limit the segments were built with.
    pub fn max_jump(&self) -> i32 {
        self.max_jump
    }

    /// Sampling counters.
    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Check whether there is no curve to draw.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Sample `function` over `viewport` and split it into segments.
///
/// A degenerate viewport gives an empty trace without a transform. A viewport
/// where the function is hardly visible keeps the transform, so axes are still
/// drawn, but has no segments.
pub fn trace<E>(function: &E, viewport: Viewport, area: PlotArea, config: &GraphConfig) -> Trace
where
    E: Evaluate + ?Sized,
{
    let Some(transform) = Transform::new(viewport, area) else {
        debug!(?viewport, ?area, "degenerate viewport, nothing to plot");
        return Trace::default();
    };
    let evaluator = FunctionEvaluator::new(function, viewport.y);
    let Some(samples) = AdaptiveSampler::new(&evaluator, &transform, config).sample() else {
        return Trace {
            transform: Some(transform),
            ..Trace::default()
        };
    };

    let builder = SegmentBuilder::new(&evaluator, &transform, config, &samples);
    let segments = builder.build(&samples);
    let stats = TraceStats {
        zoom_level: samples.zoom_level(),
        coarse: samples.coarse_count(),
        boundary: samples.count(SampleSource::Boundary),
        refined: samples.count(SampleSource::Refined),
        evaluations: evaluator.evaluations(),
    };
    debug!(
        zoom_level = stats.zoom_level,
        coarse = stats.coarse,
        boundary = stats.boundary,
        refined = stats.refined,
        evaluations = stats.evaluations,
        segments = segments.segments.len(),
        isolated = segments.isolated.len(),
        "traced frame"
    );

    Trace {
        transform: Some(transform),
        segments,
        max_jump: builder.max_jump(),
        stats,
    }
}

/// Parse a constant expression typed into `field`.
pub fn parse_number(field: InputField, text: &str) -> Result<f64, PlotError> {
    let value = Expression::parse(text)
        .and_then(|expr| expr.eval_constant())
        .map_err(|source| PlotError::Parse { field, source })?;
    if !value.is_finite() {
        return Err(PlotError::NonFinite { field });
    }
    Ok(value)
}

/// Text of the function and bound fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotInput {
    /// Function of `x`.
    pub function: String,
    /// Lower x bound.
    pub x_min: String,
    /// Upper x bound.
    pub x_max: String,
    /// Lower y bound.
    pub y_min: String,
    /// Upper y bound.
    pub y_max: String,
}

impl Default for PlotInput {
    fn default() -> Self {
        Self {
            function: "x*sin(x)".to_string(),
            x_min: "-20".to_string(),
            x_max: "20".to_string(),
            y_min: "-10".to_string(),
            y_max: "10".to_string(),
        }
    }
}

impl PlotInput {
    /// Fields describing an expression and viewport, bounds formatted for
    /// re-entry.
    pub fn from_plot(expression: &Expression, viewport: Viewport) -> Self {
        Self {
            function: expression.source().to_string(),
            x_min: format_bound(viewport.x.min),
            x_max: format_bound(viewport.x.max),
            y_min: format_bound(viewport.y.min),
            y_max: format_bound(viewport.y.max),
        }
    }

    /// Parse every field. The first failing field is reported.
    pub fn parse(&self) -> Result<(Expression, Viewport), PlotError> {
        let expression = Expression::parse(&self.function).map_err(|source| PlotError::Parse {
            field: InputField::Function,
            source,
        })?;
        let viewport = Viewport::from_bounds(
            parse_number(InputField::XMin, &self.x_min)?,
            parse_number(InputField::XMax, &self.x_max)?,
            parse_number(InputField::YMin, &self.y_min)?,
            parse_number(InputField::YMax, &self.y_max)?,
        );
        Ok((expression, viewport))
    }
}

/// What the caller should show after an action.
#[derive(Debug, Clone)]
pub enum Update {
    /// Draw the current state once.
    Redraw,
    /// Draw every frame of a viewport animation.
    Animate(Transition),
    /// Leave the plot.
    Exit,
}

/// Interactive plot session.
#[derive(Debug, Clone)]
pub struct Plot {
    expression: Expression,
    viewport: Viewport,
    cursor: CursorState,
    config: GraphConfig,
    display: DisplaySize,
}

impl Plot {
    /// Create a session on the 128×64 display with default configuration.
    pub fn new(expression: Expression, viewport: Viewport) -> Self {
        PlotBuilder::new(expression, viewport).build()
    }

    /// Start building a session with custom configuration.
    pub fn builder(expression: Expression, viewport: Viewport) -> PlotBuilder {
        PlotBuilder::new(expression, viewport)
    }

    /// Create a session from text fields.
    pub fn from_input(input: &PlotInput) -> Result<Self, PlotError> {
        let (expression, viewport) = input.parse()?;
        Ok(Self::new(expression, viewport))
    }

    /// Access the expression.
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Access the current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the cursor.
    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// Access the configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Display size.
    pub fn display(&self) -> DisplaySize {
        self.display
    }

    /// Region the curve is drawn in.
    pub fn area(&self) -> PlotArea {
        PlotArea::for_display(self.display, self.config.bottom_margin)
    }

    /// Current state as text fields.
    pub fn input(&self) -> PlotInput {
        PlotInput::from_plot(&self.expression, self.viewport)
    }

    /// Trace the current viewport.
    pub fn trace(&self) -> Trace {
        trace(&self.expression, self.viewport, self.area(), &self.config)
    }

    /// Apply one action.
    ///
    /// Errors leave the session unchanged.
    pub fn apply(&mut self, action: Action) -> Result<Update, PlotError> {
        let update = match action {
            Action::Navigate(direction) => {
                return self.apply(navigation_action(direction, self.cursor.is_visible()));
            }
            Action::Pan(direction) => self.animate_to(self.viewport.pan(direction, self.config.pan_shift)),
            Action::ZoomIn => self.animate_to(self.viewport.zoom(self.config.zoom_in)),
            Action::ZoomOut => self.animate_to(self.viewport.zoom(self.config.zoom_out)),
            Action::ToggleCursor => {
                self.cursor.toggle_active();
                Update::Redraw
            }
            Action::CycleCursor => {
                self.cursor.cycle_mode();
                Update::Redraw
            }
            Action::MoveCursor(direction) => {
                self.cursor.move_by(direction);
                Update::Redraw
            }
            Action::PixelPan(direction) => {
                self.viewport = self.viewport.pan_by_pixels(direction.step(), 0.0, self.area());
                debug!(viewport = ?self.viewport, "pixel pan");
                Update::Redraw
            }
            Action::SetCustomX(text) => {
                let x = parse_number(InputField::CustomX, &text)?;
                self.viewport = self.viewport.recenter_on(x);
                self.cursor.center();
                debug!(x, viewport = ?self.viewport, "centered on custom x");
                Update::Redraw
            }
            Action::SetCustomDelta(text) => {
                let samples = parse_number(InputField::CustomDelta, &text)?;
                self.config.set_base_samples_per_px(samples)?;
                Update::Redraw
            }
            Action::IncreaseSampling => {
                self.config.increase_sampling();
                Update::Redraw
            }
            Action::DecreaseSampling => {
                self.config.decrease_sampling();
                Update::Redraw
            }
            Action::Redraw => Update::Redraw,
            Action::Back => Update::Exit,
        };
        Ok(update)
    }

    fn animate_to(&mut self, target: Viewport) -> Update {
        let start = self.viewport;
        self.viewport = target;
        debug!(from = ?start, to = ?target, "animating viewport");
        Update::Animate(Transition::new(start, target, self.config.transition_steps))
    }

    /// Draw the current state into `fb`.
    pub fn render_into(&self, fb: &mut Framebuffer) {
        self.render_viewport(self.viewport, fb);
    }

    /// Draw the session as it would look at `viewport`.
    pub fn render_viewport(&self, viewport: Viewport, fb: &mut Framebuffer) {
        fb.clear();
        let trace = trace(&self.expression, viewport, self.area(), &self.config);
        let Some(transform) = trace.transform() else {
            return;
        };
        let evaluator = FunctionEvaluator::new(&self.expression, viewport.y);
        let readout = self.cursor.readout(transform, &evaluator);
        Renderer::new(transform, &self.config)
            .render(trace.segments(), trace.max_jump(), readout.as_ref())
            .rasterize(fb);
    }

    /// Send the frames of `update` to `sink`, returning how many were sent.
    ///
    /// Animation frames are spaced by the configured transition delay.
    pub fn present<S>(&self, update: &Update, sink: &mut S) -> usize
    where
        S: FrameSink + ?Sized,
    {
        let mut fb = Framebuffer::new(self.display);
        match update {
            Update::Exit => 0,
            Update::Redraw => {
                self.render_into(&mut fb);
                sink.present(&fb);
                1
            }
            Update::Animate(transition) => {
                let delay = Duration::from_millis(self.config.transition_delay_ms);
                let mut frames = 0;
                for viewport in transition.clone() {
                    if frames > 0 && !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    self.render_viewport(viewport, &mut fb);
                    sink.present(&fb);
                    frames += 1;
                }
                frames
            }
        }
    }

    /// Apply an action and present its frames. Returns `false` on exit.
    pub fn handle<S>(&mut self, action: Action, sink: &mut S) -> Result<bool, PlotError>
    where
        S: FrameSink + ?Sized,
    {
        let update = self.apply(action)?;
        self.present(&update, sink);
        Ok(!matches!(update, Update::Exit))
    }
}

/// Builder for configuring a plot session before construction.
#[derive(Debug)]
pub struct PlotBuilder {
    expression: Expression,
    viewport: Viewport,
    config: GraphConfig,
    display: DisplaySize,
}

impl PlotBuilder {
    /// Start from an expression and viewport.
    pub fn new(expression: Expression, viewport: Viewport) -> Self {
        Self {
            expression,
            viewport,
            config: GraphConfig::default(),
            display: DisplaySize::LCD,
        }
    }

    /// Set the configuration.
    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the display size.
    pub fn display(mut self, display: DisplaySize) -> Self {
        self.display = display;
        self
    }

    /// Build the session with a hidden, centered cursor.
    pub fn build(self) -> Plot {
        Plot {
            cursor: CursorState::new(self.display.width),
            expression: self.expression,
            viewport: self.viewport,
            config: self.config,
            display: self.display,
        }
    }
}
