//! # pm25-map
//!
//! Core of an interactive world map of PM2.5 air-quality readings.
//!
//! A sparse set of geolocated samples is drawn as a tinted, semi-transparent
//! grid over a base map. The crate owns the parts that carry real logic:
//!
//! - **Spatial lookup**: `(lat, lon)` to the nearest sample's reading, via an
//!   exact grid index with a bounded nearest-neighbor fallback.
//! - **Viewport rendering**: projection, culling, city-marker avoidance and
//!   zoom-dependent cell sizing into an RGBA [`Framebuffer`](framebuffer::Framebuffer).
//! - **Pan/zoom**: a pointer-driven state machine with scale clamping and
//!   pointer-anchored zoom.
//!
//! Base map geometry, widgets and data loading stay with the host.
//!
//! ## Quick Start
//!
//! ```rust
//! use pm25_map::prelude::*;
//!
//! let samples = vec![Sample::new(51.5, -0.12, 12.0), Sample::new(48.85, 2.35, 55.0)];
//! let lookup = SpatialLookup::from_samples(samples.clone())?;
//! assert_eq!(lookup.query(51.5, -0.12), Some(12.0));
//!
//! let projection = NaturalEarth1::fit_size(1000.0, 500.0);
//! let mut view = PanZoomController::default();
//! let transform = view.zoom_in();
//!
//! let overlay = ViewportRenderer::default()
//!     .render(&samples, &[], &projection, &transform, 1000, 500)?;
//! assert!(overlay.covered_pixels() > 0);
//! # Ok::<(), pm25_map::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable parallel reductions in trueno

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and parsing.
pub mod color;

/// RGBA pixel buffer.
pub mod framebuffer;

/// Screen-space points and rectangles.
pub mod geometry;

/// Value-to-color band mapping.
pub mod scale;

// ============================================================================
// Map Modules
// ============================================================================

/// Samples and city markers.
pub mod data;

/// Nearest-sample lookup by coordinate.
pub mod lookup;

/// Geographic projections.
pub mod projection;

/// Pan/zoom view transform.
pub mod transform;

/// Pointer-driven pan/zoom state machine.
pub mod gesture;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Overlay rasterization.
pub mod render;

/// Output encoders (PNG).
pub mod output;

// ============================================================================
// Configuration and Errors
// ============================================================================

/// YAML configuration.
pub mod config;

/// Error types for pm25-map operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use pm25_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::MapConfig;
    pub use crate::data::{Marker, Sample};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::gesture::{DragState, PanZoomController};
    pub use crate::lookup::{Nearest, SpatialLookup, Stats};
    pub use crate::output::PngEncoder;
    pub use crate::projection::{Equirectangular, NaturalEarth1, Projection};
    pub use crate::render::{OverlayStyle, RenderStats, ViewportRenderer};
    pub use crate::scale::{ColorBands, Scale};
    pub use crate::transform::{ViewTransform, ZoomPolicy};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
