//! Pointer-driven pan/zoom state machine.
//!
//! ```text
//! idle --pointer_down--> dragging --pointer_move--> dragging
//!                        dragging --pointer_up----> idle
//! wheel / zoom buttons / reset: valid in any state
//! ```
//!
//! Every entry point reads the current transform, writes the new one and
//! returns it within a single `&mut self` call.

use crate::error::Result;
use crate::geometry::Point;
use crate::transform::{ViewTransform, ZoomPolicy};

/// Drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No button held.
    #[default]
    Idle,
    /// Button held; `last` is the pointer position of the previous event.
    Dragging {
        /// Last seen pointer position.
        last: Point,
    },
}

/// Owns the [`ViewTransform`] and applies gesture events to it.
#[derive(Debug, Clone, Default)]
pub struct PanZoomController {
    transform: ViewTransform,
    policy: ZoomPolicy,
    state: DragState,
}

impl PanZoomController {
    /// Create a controller at the identity transform.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidZoomPolicy`](crate::Error::InvalidZoomPolicy) if
    /// `policy` fails [`ZoomPolicy::validate`].
    pub fn new(policy: ZoomPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            transform: ViewTransform::IDENTITY,
            policy,
            state: DragState::Idle,
        })
    }

    /// Current transform.
    #[must_use]
    pub const fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Current drag state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Zoom policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &ZoomPolicy {
        &self.policy
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag anchored at `pointer`.
    pub fn pointer_down(&mut self, pointer: Point) -> ViewTransform {
        self.state = DragState::Dragging { last: pointer };
        self.transform
    }

    /// Pan by the pointer delta since the previous event. Ignored when idle.
    pub fn pointer_move(&mut self, pointer: Point) -> ViewTransform {
        if let DragState::Dragging { last } = self.state {
            self.transform = self.transform.panned(pointer.x - last.x, pointer.y - last.y);
            self.state = DragState::Dragging { last: pointer };
        }
        self.transform
    }

    /// End the drag.
    pub fn pointer_up(&mut self) -> ViewTransform {
        self.state = DragState::Idle;
        self.transform
    }

    /// Apply a raw screen-space delta, independent of the drag state.
    pub fn drag_by(&mut self, dx: f32, dy: f32) -> ViewTransform {
        self.transform = self.transform.panned(dx, dy);
        self.transform
    }

    /// One wheel notch at `pointer`: positive `delta_y` zooms out, anything
    /// else zooms in.
    pub fn wheel(&mut self, pointer: Point, delta_y: f32) -> ViewTransform {
        let factor = if delta_y > 0.0 {
            self.policy.wheel_out
        } else {
            self.policy.wheel_in
        };
        self.zoom_at(pointer, factor)
    }

    /// Zoom by `factor` keeping the screen point `pointer` fixed.
    pub fn zoom_at(&mut self, pointer: Point, factor: f32) -> ViewTransform {
        self.transform = self.transform.zoomed_at(pointer, factor, &self.policy);
        self.transform
    }

    /// Zoom-in button: scale up by the button step, translation unchanged.
    pub fn zoom_in(&mut self) -> ViewTransform {
        self.transform = self.transform.rescaled(self.policy.button_step, &self.policy);
        self.transform
    }

    /// Zoom-out button: scale down by the button step, translation unchanged.
    pub fn zoom_out(&mut self) -> ViewTransform {
        self.transform = self.transform.rescaled(1.0 / self.policy.button_step, &self.policy);
        self.transform
    }

    /// Back to the identity transform. The drag state is left as is.
    pub fn reset(&mut self) -> ViewTransform {
        self.transform = ViewTransform::IDENTITY;
        self.transform
    }
}
