//! Turning a traced frame into draw commands.
//!
//! The [`Renderer`] emits a [`RenderList`] in a fixed order (axes, ticks,
//! labels, curve, cursor) and [`RenderList::rasterize`] plays it onto a
//! [`Framebuffer`]. Keeping the list separate makes frames easy to inspect in
//! tests without decoding pixels.

use tracing::trace;

use crate::axis::smart_ticks;
use crate::config::GraphConfig;
use crate::cursor::CursorReadout;
use crate::font::Font;
use crate::format::{format_axis_label, format_readout, undefined_readout};
use crate::framebuffer::Framebuffer;
use crate::geom::PixelPoint;
use crate::segment::{Segment, SegmentSet};
use crate::transform::Transform;

/// Right-hand readout starts this many pixels from the right edge.
pub const Y_READOUT_INSET: i32 = 42;

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Single pixel.
    Pixel(PixelPoint),
    /// Line including both ends.
    Line {
        /// Line start.
        start: PixelPoint,
        /// Line end.
        end: PixelPoint,
    },
    /// Horizontal run.
    HLine {
        /// Leftmost pixel.
        start: PixelPoint,
        /// Run length.
        len: i32,
    },
    /// Vertical run.
    VLine {
        /// Topmost pixel.
        start: PixelPoint,
        /// Run length.
        len: i32,
    },
    /// Text with its top-left corner at `position`.
    Text {
        /// Top-left corner.
        position: PixelPoint,
        /// Characters to draw.
        text: String,
        /// Font used.
        font: Font,
    },
}

/// Aggregated render commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Check whether nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Draw every command onto `fb`, on top of its current content.
    pub fn rasterize(&self, fb: &mut Framebuffer) {
        for command in &self.commands {
            match command {
                RenderCommand::Pixel(p) => fb.set_pixel(p.x, p.y, true),
                RenderCommand::Line { start, end } => fb.line(start.x, start.y, end.x, end.y),
                RenderCommand::HLine { start, len } => fb.hline(start.x, start.y, *len),
                RenderCommand::VLine { start, len } => fb.vline(start.x, start.y, *len),
                RenderCommand::Text {
                    position,
                    text,
                    font,
                } => font.draw_text(fb, text, position.x, position.y),
            }
        }
    }
}

/// Builds draw commands for one frame.
pub struct Renderer<'a> {
    transform: &'a Transform,
    config: &'a GraphConfig,
}

impl<'a> Renderer<'a> {
    /// Create a renderer for a frame mapped by `transform`.
    pub fn new(transform: &'a Transform, config: &'a GraphConfig) -> Self {
        Self { transform, config }
    }

    fn plot_height(&self) -> i32 {
        self.transform.height()
    }

    /// Row of the x axis, when y = 0 is visible.
    pub fn x_axis_row(&self) -> Option<i32> {
        self.transform
            .viewport()
            .y
            .contains(0.0)
            .then(|| self.transform.map_y_clamped(0.0))
    }

    /// Column of the y axis, when x = 0 is visible.
    pub fn y_axis_column(&self) -> Option<i32> {
        self.transform
            .viewport()
            .x
            .contains(0.0)
            .then(|| self.transform.map_x_clamped(0.0))
    }

    /// Axis lines through the origin.
    pub fn axes(&self, list: &mut RenderList) {
        if let Some(row) = self.x_axis_row() {
            list.push(RenderCommand::HLine {
                start: PixelPoint::new(0, row),
                len: self.transform.width(),
            });
        }
        if let Some(column) = self.y_axis_column() {
            list.push(RenderCommand::VLine {
                start: PixelPoint::new(column, 0),
                len: self.plot_height(),
            });
        }
    }

    /// One-pixel tick marks beside each axis.
    pub fn ticks(&self, list: &mut RenderList) {
        let viewport = self.transform.viewport();
        if let Some(row) = self.x_axis_row() {
            for value in smart_ticks(viewport.x, self.config.x_tick_target).values {
                let column = self.transform.map_x_clamped(value);
                list.push(RenderCommand::Pixel(PixelPoint::new(column, row - 1)));
            }
        }
        if let Some(column) = self.y_axis_column() {
            for value in smart_ticks(viewport.y, self.config.y_tick_target).values {
                let row = self.transform.map_y_clamped(value);
                list.push(RenderCommand::Pixel(PixelPoint::new(column + 1, row)));
            }
        }
    }

    /// Viewport bounds in the small font along the plot edges.
    pub fn boundary_labels(&self, list: &mut RenderList) {
        let viewport = self.transform.viewport();
        let (w, ph) = (self.transform.width(), self.plot_height());
        let labels = [
            (viewport.x.min, PixelPoint::new(2, ph - 6)),
            (viewport.x.max, PixelPoint::new(w - 13, ph - 6)),
            (viewport.y.max, PixelPoint::new(w - 13, 2)),
            (viewport.y.min, PixelPoint::new(w - 13, ph - 12)),
        ];
        for (value, position) in labels {
            list.push(RenderCommand::Text {
                position,
                text: format_axis_label(value),
                font: Font::Small,
            });
        }
    }

    /// Polylines for every segment plus the isolated dots.
    pub fn curve(&self, segments: &SegmentSet, max_jump: i32, list: &mut RenderList) {
        for segment in &segments.segments {
            self.segment(segment, max_jump, list);
        }
        for dot in &segments.isolated {
            list.push(RenderCommand::Pixel(*dot));
        }
    }

    fn segment(&self, segment: &Segment, max_jump: i32, list: &mut RenderList) {
        let mut pixels = segment.pixels().to_vec();
        pixels.dedup();
        let Some((first, rest)) = pixels.split_first() else {
            return;
        };
        list.push(RenderCommand::Pixel(*first));

        let half_height = self.plot_height() / 2;
        let mut prev = *first;
        for &pixel in rest {
            let dx = (pixel.x - prev.x).abs();
            let dy = (pixel.y - prev.y).abs();
            if dy <= max_jump || (dx <= 2 && dy <= half_height) {
                list.push(RenderCommand::Line {
                    start: prev,
                    end: pixel,
                });
            } else {
                trace!(?prev, ?pixel, dy, "jump too large, plotting point alone");
                list.push(RenderCommand::Pixel(pixel));
            }
            prev = pixel;
        }
    }

    /// Vertical cursor line and the readouts below the plot.
    pub fn cursor(&self, readout: &CursorReadout, list: &mut RenderList) {
        let ph = self.plot_height();
        list.push(RenderCommand::VLine {
            start: PixelPoint::new(readout.column, 0),
            len: ph,
        });
        if readout.mode.shows_x() {
            list.push(RenderCommand::Text {
                position: PixelPoint::new(2, ph + 1),
                text: format_readout(readout.x, 'x'),
                font: Font::Medium,
            });
        }
        if readout.mode.shows_y() {
            let text = match readout.y {
                Some(y) => format_readout(y, 'y'),
                None => undefined_readout('y'),
            };
            list.push(RenderCommand::Text {
                position: PixelPoint::new(self.transform.width() - Y_READOUT_INSET, ph + 1),
                text,
                font: Font::Medium,
            });
        }
    }

    /// Full frame in drawing order.
    pub fn render(
        &self,
        segments: &SegmentSet,
        max_jump: i32,
        cursor: Option<&CursorReadout>,
    ) -> RenderList {
        let mut list = RenderList::new();
        self.axes(&mut list);
        if self.config.smart_ticks {
            self.ticks(&mut list);
        }
        if self.config.boundary_labels {
            self.boundary_labels(&mut list);
        }
        self.curve(segments, max_jump, &mut list);
        if let Some(readout) = cursor {
            self.cursor(readout, &mut list);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorMode;
    use crate::geom::{PlotArea, Point};
    use crate::view::Viewport;

    fn transform(viewport: Viewport) -> Transform {
        Transform::new(viewport, PlotArea::new(128, 56)).expect("valid transform")
    }

    #[test]
    fn axes_only_when_origin_visible() {
        let config = GraphConfig::default();
        let t = transform(Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0));
        let renderer = Renderer::new(&t, &config);
        assert_eq!(renderer.x_axis_row(), Some(28));
        assert_eq!(renderer.y_axis_column(), Some(64));

        let t = transform(Viewport::from_bounds(1.0, 5.0, -10.0, 10.0));
        let renderer = Renderer::new(&t, &config);
        assert_eq!(renderer.y_axis_column(), None);
        let mut list = RenderList::new();
        renderer.axes(&mut list);
        assert_eq!(list.commands().len(), 1);
    }

    #[test]
    fn large_jumps_are_not_connected() {
        let config = GraphConfig::default();
        let t = transform(Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0));
        let renderer = Renderer::new(&t, &config);
        let mut list = RenderList::new();
        let set = SegmentSet {
            segments: vec![Segment::from_parts(
                vec![Point::new(0.0, 0.0); 4],
                [(10, 10), (10, 10), (11, 12), (30, 50)]
                    .map(|(x, y)| PixelPoint::new(x, y))
                    .to_vec(),
            )],
            isolated: vec![PixelPoint::new(100, 3)],
        };
        renderer.curve(&set, 11, &mut list);
        assert_eq!(
            list.commands(),
            &[
                RenderCommand::Pixel(PixelPoint::new(10, 10)),
                RenderCommand::Line {
                    start: PixelPoint::new(10, 10),
                    end: PixelPoint::new(11, 12),
                },
                RenderCommand::Pixel(PixelPoint::new(30, 50)),
                RenderCommand::Pixel(PixelPoint::new(100, 3)),
            ]
        );
    }

    #[test]
    fn cursor_readouts_follow_mode() {
        let config = GraphConfig::default();
        let t = transform(Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0));
        let renderer = Renderer::new(&t, &config);
        let mut readout = CursorReadout {
            mode: CursorMode::Both,
            column: 64,
            x: 0.0,
            y: None,
        };
        let mut list = RenderList::new();
        renderer.cursor(&readout, &mut list);
        assert_eq!(list.commands().len(), 3);
        assert!(list.commands().contains(&RenderCommand::Text {
            position: PixelPoint::new(86, 57),
            text: "y undef".to_string(),
            font: Font::Medium,
        }));

        readout.mode = CursorMode::Y;
        let mut list = RenderList::new();
        renderer.cursor(&readout, &mut list);
        assert_eq!(list.commands().len(), 2);
    }

    #[test]
    fn rasterize_draws_frame() {
        let config = GraphConfig {
            boundary_labels: true,
            ..GraphConfig::default()
        };
        let t = transform(Viewport::from_bounds(-20.0, 20.0, -10.0, 10.0));
        let list = Renderer::new(&t, &config).render(&SegmentSet::default(), 11, None);
        let mut fb = Framebuffer::default();
        list.rasterize(&mut fb);
        assert!((0..128).all(|x| fb.pixel(x, 28)));
        assert!((0..56).all(|y| fb.pixel(64, y)));
        assert!(!fb.pixel(64, 56));
        // Tick above the x axis at x = π.
        assert!(fb.pixel(t.map_x_clamped(std::f64::consts::PI), 27));
    }
}
