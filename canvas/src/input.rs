//! Input model: modifier keys, mouse buttons, and the interaction state machine.
//!
//! `InteractionMode` is a tagged union, so dragging, resizing and marquee
//! selection are mutually exclusive by construction. The three flag-style
//! setters all go through [`InteractionMode::transition`], which replaces
//! whatever mode was active.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Point, Rect};
use crate::hit::ResizeHandle;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta in pixels (positive `dy` = down).
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// The active pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    /// No gesture in progress. Initial state, and the state after every gesture.
    #[default]
    Idle,
    /// Moving the selected layers.
    Dragging {
        /// World-space pointer position the next delta is measured from.
        anchor: Point,
    },
    /// Resizing the selected layer by one of its handles.
    Resizing {
        direction: ResizeHandle,
        /// World-space pointer position the next delta is measured from.
        anchor: Point,
    },
    /// Dragging a marquee rectangle.
    Selecting {
        /// World-space corner where the marquee started.
        start: Point,
        /// World-space corner under the pointer.
        end: Point,
    },
}

impl InteractionMode {
    /// Replace the current mode. The only way a mode is entered.
    pub fn transition(&mut self, next: InteractionMode) {
        *self = next;
    }

    /// Enter `Dragging` (anchor defaults to the origin) or leave it.
    /// Leaving a mode that is not active does nothing.
    pub fn set_drag_state(&mut self, dragging: bool, drag_start: Option<Point>) {
        if dragging {
            self.transition(Self::Dragging { anchor: drag_start.unwrap_or_default() });
        } else if self.is_dragging() {
            self.transition(Self::Idle);
        }
    }

    /// Enter `Resizing` or leave it.
    ///
    /// Entering needs a direction: without one the request is declined, the
    /// current mode is kept and `false` is returned. Every other call
    /// returns `true`.
    pub fn set_resize_state(
        &mut self,
        resizing: bool,
        direction: Option<ResizeHandle>,
        drag_start: Option<Point>,
    ) -> bool {
        if resizing {
            let Some(direction) = direction else {
                return false;
            };
            self.transition(Self::Resizing { direction, anchor: drag_start.unwrap_or_default() });
        } else if self.is_resizing() {
            self.transition(Self::Idle);
        }
        true
    }

    /// Enter `Selecting` or leave it. A missing end corner collapses onto the start.
    pub fn set_selection_state(&mut self, selecting: bool, start: Option<Point>, end: Option<Point>) {
        if selecting {
            let start = start.unwrap_or_default();
            self.transition(Self::Selecting { start, end: end.unwrap_or(start) });
        } else if self.is_selecting() {
            self.transition(Self::Idle);
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self, Self::Resizing { .. })
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        matches!(self, Self::Selecting { .. })
    }

    /// Anchor of a drag or resize.
    #[must_use]
    pub fn drag_start(&self) -> Option<Point> {
        match *self {
            Self::Dragging { anchor } | Self::Resizing { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    #[must_use]
    pub fn resize_direction(&self) -> Option<ResizeHandle> {
        match *self {
            Self::Resizing { direction, .. } => Some(direction),
            _ => None,
        }
    }

    #[must_use]
    pub fn selection_start(&self) -> Option<Point> {
        match *self {
            Self::Selecting { start, .. } => Some(start),
            _ => None,
        }
    }

    #[must_use]
    pub fn selection_end(&self) -> Option<Point> {
        match *self {
            Self::Selecting { end, .. } => Some(end),
            _ => None,
        }
    }

    /// The normalised marquee rectangle while selecting.
    #[must_use]
    pub fn selection_rect(&self) -> Option<Rect> {
        match *self {
            Self::Selecting { start, end } => Some(Rect::from_corners(start, end)),
            _ => None,
        }
    }
}
