//! User actions and animated viewport transitions.
//!
//! Input arrives as a closed set of [`Action`] tokens; key decoding stays with
//! the caller. Directional keys are resolved against the cursor state by
//! [`navigation_action`].

use std::str::FromStr;

use thiserror::Error;

use crate::view::{PanDirection, Viewport};

/// Left or right, for moves along the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    /// Towards smaller x.
    Left,
    /// Towards larger x.
    Right,
}

impl HorizontalDirection {
    /// Signed one-pixel step.
    pub fn step(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// One discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Directional key, resolved against the cursor state.
    Navigate(PanDirection),
    /// Animated pan by the configured fraction.
    Pan(PanDirection),
    /// Animated zoom in.
    ZoomIn,
    /// Animated zoom out.
    ZoomOut,
    /// Show or hide the cursor.
    ToggleCursor,
    /// Step through the cursor readout modes.
    CycleCursor,
    /// Move the cursor one column.
    MoveCursor(HorizontalDirection),
    /// Shift the viewport by one pixel column without animation.
    PixelPan(HorizontalDirection),
    /// Center on the x value given as expression text.
    SetCustomX(String),
    /// Set coarse samples per pixel from expression text.
    SetCustomDelta(String),
    /// Sample more aggressively when zoomed.
    IncreaseSampling,
    /// Sample less aggressively when zoomed.
    DecreaseSampling,
    /// Plot again without changes.
    Redraw,
    /// Leave the plot.
    Back,
}

/// Token that does not name an action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown action `{0}`")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    /// Parse tokens like `pan-left`, `zoom-in` or `custom-x=2*pi`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if let Some(text) = token.strip_prefix("custom-x=") {
            return Ok(Self::SetCustomX(text.to_string()));
        }
        if let Some(text) = token.strip_prefix("custom-delta=") {
            return Ok(Self::SetCustomDelta(text.to_string()));
        }
        let action = match token {
            "up" => Self::Navigate(PanDirection::Up),
            "down" => Self::Navigate(PanDirection::Down),
            "left" => Self::Navigate(PanDirection::Left),
            "right" => Self::Navigate(PanDirection::Right),
            "pan-up" => Self::Pan(PanDirection::Up),
            "pan-down" => Self::Pan(PanDirection::Down),
            "pan-left" => Self::Pan(PanDirection::Left),
            "pan-right" => Self::Pan(PanDirection::Right),
            "zoom-in" => Self::ZoomIn,
            "zoom-out" => Self::ZoomOut,
            "cursor-toggle" => Self::ToggleCursor,
            "cursor-cycle" => Self::CycleCursor,
            "cursor-left" => Self::MoveCursor(HorizontalDirection::Left),
            "cursor-right" => Self::MoveCursor(HorizontalDirection::Right),
            "pixel-pan-left" => Self::PixelPan(HorizontalDirection::Left),
            "pixel-pan-right" => Self::PixelPan(HorizontalDirection::Right),
            "sampling-up" => Self::IncreaseSampling,
            "sampling-down" => Self::DecreaseSampling,
            "redraw" => Self::Redraw,
            "back" => Self::Back,
            _ => return Err(UnknownAction(token.to_string())),
        };
        Ok(action)
    }
}

/// Resolve a directional key.
///
/// With the cursor hidden the key pans the view. With the cursor shown,
/// left and right shift the view by one pixel so the function slides under
/// the cursor, and up and down only redraw.
pub fn navigation_action(direction: PanDirection, cursor_visible: bool) -> Action {
    match (cursor_visible, direction) {
        (false, direction) => Action::Pan(direction),
        (true, PanDirection::Left) => Action::PixelPan(HorizontalDirection::Left),
        (true, PanDirection::Right) => Action::PixelPan(HorizontalDirection::Right),
        (true, PanDirection::Up | PanDirection::Down) => Action::Redraw,
    }
}

/// Frames of an animated move between two viewports.
///
/// Yields `steps` viewports ending exactly on the target, or only the target
/// when `steps` is at most one.
#[derive(Debug, Clone)]
pub struct Transition {
    start: Viewport,
    end: Viewport,
    steps: u32,
    next: u32,
}

impl Transition {
    /// Create a transition.
    pub fn new(start: Viewport, end: Viewport, steps: u32) -> Self {
        let steps = steps.max(1);
        Self {
            start,
            end,
            steps,
            next: 1,
        }
    }

    /// Viewport the transition ends on.
    pub fn target(&self) -> Viewport {
        self.end
    }
}

impl Iterator for Transition {
    type Item = Viewport;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.steps {
            return None;
        }
        let step = self.next;
        self.next += 1;
        if step == self.steps {
            return Some(self.end);
        }
        let t = f64::from(step) / f64::from(self.steps);
        Some(self.start.lerp(&self.end, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.steps + 1 - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Transition {}
