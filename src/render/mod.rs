//! Viewport rendering of the PM2.5 surface.
//!
//! Samples are projected to screen space, culled against the viewport and
//! the city markers, then composited into a [`Framebuffer`](crate::framebuffer::Framebuffer)
//! with a cell size that follows the zoom level.

mod overlay;

pub use overlay::{project, OverlayStyle, RenderStats, ViewportRenderer};
