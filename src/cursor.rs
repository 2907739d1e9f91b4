//! Coordinate cursor state.
//!
//! The cursor only stores its column. The x value comes from the viewport and
//! the y value from evaluating the function there, every frame.

use crate::eval::{Evaluate, FunctionEvaluator};
use crate::interaction::HorizontalDirection;
use crate::transform::Transform;

/// Which readouts the cursor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Cursor not drawn.
    #[default]
    Hidden,
    /// Line and x readout.
    X,
    /// Line and y readout.
    Y,
    /// Line and both readouts.
    Both,
}

impl CursorMode {
    /// Check whether the x readout is drawn.
    pub fn shows_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    /// Check whether the y readout is drawn.
    pub fn shows_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// Cursor position and visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    /// Visibility and readouts.
    pub mode: CursorMode,
    /// Column, fractional so a custom x can sit between two pixels.
    pub x_pixel: f64,
    width: u32,
}

/// Values the cursor shows for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    /// Mode at the time of reading.
    pub mode: CursorMode,
    /// Column of the vertical line.
    pub column: i32,
    /// Data-space x under the cursor.
    pub x: f64,
    /// Function value, `None` when undefined.
    pub y: Option<f64>,
}

impl CursorState {
    /// Hidden cursor centered on a plot `width` pixels wide.
    pub fn new(width: u32) -> Self {
        Self {
            mode: CursorMode::Hidden,
            x_pixel: f64::from(width / 2),
            width,
        }
    }

    /// Check whether the cursor is drawn.
    pub fn is_visible(&self) -> bool {
        self.mode != CursorMode::Hidden
    }

    /// Switch between hidden and showing both readouts.
    pub fn toggle_active(&mut self) {
        self.mode = match self.mode {
            CursorMode::Hidden => CursorMode::Both,
            _ => CursorMode::Hidden,
        };
    }

    /// Step through hidden, x, y and both.
    pub fn cycle_mode(&mut self) {
        self.mode = match self.mode {
            CursorMode::Hidden => CursorMode::X,
            CursorMode::X => CursorMode::Y,
            CursorMode::Y => CursorMode::Both,
            CursorMode::Both => CursorMode::Hidden,
        };
    }

    /// Move one column, staying on the plot. Returns whether it moved.
    pub fn move_by(&mut self, direction: HorizontalDirection) -> bool {
        let last = f64::from(self.width.saturating_sub(1));
        match direction {
            HorizontalDirection::Left if self.x_pixel > 0.0 => {
                self.x_pixel -= 1.0;
                true
            }
            HorizontalDirection::Right if self.x_pixel < last => {
                self.x_pixel += 1.0;
                true
            }
            _ => false,
        }
    }

    /// Put the cursor exactly between the two middle columns and show it.
    pub fn center(&mut self) {
        self.x_pixel = f64::from(self.width.saturating_sub(1)) / 2.0;
        self.mode = CursorMode::Both;
    }

    /// Read the cursor against the current frame, `None` when hidden.
    ///
    /// The y value is not limited to the visible range.
    pub fn readout<E>(&self, transform: &Transform, evaluator: &FunctionEvaluator<'_, E>) -> Option<CursorReadout>
    where
        E: Evaluate + ?Sized,
    {
        if !self.is_visible() {
            return None;
        }
        let x = transform.column_to_x(self.x_pixel);
        Some(CursorReadout {
            mode: self.mode,
            column: self.x_pixel.floor() as i32,
            x,
            y: evaluator.evaluate_finite(x),
        })
    }
}
