//! monoplot plots functions of one variable on small monochrome displays.
//! Sampling adapts to zoom and to the function's shape, and discontinuities
//! are detected so a 128×64 screen never shows spurious vertical strokes.

#![forbid(unsafe_code)]

pub mod axis;
pub mod config;
pub mod cursor;
pub mod error;
pub mod eval;
pub mod font;
pub mod format;
pub mod framebuffer;
pub mod geom;
pub mod interaction;
pub mod plot;
pub mod render;
pub mod sampler;
pub mod segment;
pub mod transform;
pub mod view;

pub use axis::{TickKind, Ticks, nice_ticks, pi_ticks, smart_ticks};
pub use config::GraphConfig;
pub use cursor::{CursorMode, CursorReadout, CursorState};
pub use error::{InputField, PlotError};
pub use eval::{Evaluate, Evaluation, ExprError, Expression, FunctionEvaluator, SampleStatus};
pub use font::Font;
pub use format::{format_axis_label, format_bound, format_readout};
pub use framebuffer::{FrameSink, Framebuffer};
pub use geom::{DisplaySize, PixelPoint, PlotArea, Point};
pub use interaction::{Action, HorizontalDirection, Transition, UnknownAction};
pub use plot::{Plot, PlotBuilder, PlotInput, Trace, TraceStats, Update, trace};
pub use render::{RenderCommand, RenderList, Renderer};
pub use sampler::{AdaptiveSampler, Sample, SampleSet, SampleSource};
pub use segment::{Segment, SegmentBuilder, SegmentSet};
pub use transform::Transform;
pub use view::{PanDirection, Range, Viewport};
