//! PM2.5 overlay rasterization.
//!
//! One call to [`ViewportRenderer::render`] produces the complete overlay for
//! the current view. The pipeline per redraw:
//!
//! 1. project every marker once;
//! 2. derive the cell size from the zoom level;
//! 3. per sample: project, cull against the padded viewport, drop samples
//!    under a marker's avoidance radius;
//! 4. color through the band table, boost saturation, apply the fixed alpha;
//! 5. fill a square cell, later samples overwriting earlier ones.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgba;
use crate::data::{Marker, Sample};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::projection::Projection;
use crate::scale::ColorBands;
use crate::transform::ViewTransform;

/// Fixed rendering constants of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Cell side in pixels at scale 1.
    pub base_cell_size: f32,
    /// Samples strictly closer than this (screen pixels) to a marker are
    /// not drawn.
    pub marker_avoid_radius: f32,
    /// Alpha written into every covered pixel.
    pub alpha: u8,
    /// RGB multiplier applied to band colors.
    pub saturation_boost: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            base_cell_size: 2.0,
            marker_avoid_radius: 8.0,
            alpha: 180,
            saturation_boost: 1.1,
        }
    }
}

impl OverlayStyle {
    /// Reject non-finite or non-positive sizes, radius and boost.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStyle`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("base_cell_size", self.base_cell_size),
            ("marker_avoid_radius", self.marker_avoid_radius),
            ("saturation_boost", self.saturation_boost),
        ];
        match fields.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            Some((name, value)) => Err(Error::InvalidStyle(format!(
                "{name} must be finite and positive, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

/// Per-redraw counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Samples painted.
    pub rendered: usize,
    /// Samples the projection could not place.
    pub off_map: usize,
    /// Samples outside the padded viewport.
    pub culled: usize,
    /// Samples hidden by a marker.
    pub near_marker: usize,
    /// Cell side used for this redraw.
    pub cell_size: u32,
}

/// Project `(lon, lat)` through `projection`, then through `transform`.
///
/// Returns `None` when the projection cannot place the point.
pub fn project<P>(lon: f64, lat: f64, projection: &P, transform: &ViewTransform) -> Option<Point>
where
    P: Projection + ?Sized,
{
    projection
        .project(lon, lat)
        .filter(|p| p.is_finite())
        .map(|p| transform.apply(p))
}

/// Paints the sample field into a pixel buffer for one view.
///
/// # Example
///
/// ```
/// use pm25_map::data::Sample;
/// use pm25_map::geometry::Point;
/// use pm25_map::render::ViewportRenderer;
/// use pm25_map::transform::ViewTransform;
///
/// let flat = |lon: f64, lat: f64| Some(Point::new(lon as f32, lat as f32));
/// let samples = [Sample::new(20.0, 30.0, 12.0)];
///
/// let fb = ViewportRenderer::default()
///     .render(&samples, &[], &flat, &ViewTransform::IDENTITY, 64, 64)
///     .unwrap();
///
/// assert_eq!(fb.get_pixel(30, 20).unwrap().a, 180);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ViewportRenderer {
    bands: ColorBands,
    style: OverlayStyle,
}

impl ViewportRenderer {
    /// Create a renderer with a band table and style.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStyle`] if `style` fails [`OverlayStyle::validate`].
    pub fn new(bands: ColorBands, style: OverlayStyle) -> Result<Self> {
        style.validate()?;
        Ok(Self { bands, style })
    }

    /// The band table.
    #[must_use]
    pub fn bands(&self) -> &ColorBands {
        &self.bands
    }

    /// The rendering constants.
    #[must_use]
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Cell side for a zoom level: `max(1, round(base * scale))`.
    #[must_use]
    pub fn cell_size(&self, scale: f32) -> u32 {
        (self.style.base_cell_size * scale).round().max(1.0) as u32
    }

    /// Final pixel color for a sample value.
    #[must_use]
    pub fn sample_color(&self, value: Option<f32>) -> Rgba {
        self.bands
            .color_for(value)
            .boosted(self.style.saturation_boost)
            .with_alpha(self.style.alpha)
    }

    /// Render into a fresh `width × height` buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the drawing surface has a zero dimension.
    pub fn render<P>(
        &self,
        samples: &[Sample],
        markers: &[Marker],
        projection: &P,
        transform: &ViewTransform,
        width: u32,
        height: u32,
    ) -> Result<Framebuffer>
    where
        P: Projection + ?Sized,
    {
        let mut fb = Framebuffer::new(width, height)?;
        self.render_into(&mut fb, samples, markers, projection, transform);
        Ok(fb)
    }

    /// Render into an existing buffer, replacing all of its contents.
    pub fn render_into<P>(
        &self,
        fb: &mut Framebuffer,
        samples: &[Sample],
        markers: &[Marker],
        projection: &P,
        transform: &ViewTransform,
    ) -> RenderStats
    where
        P: Projection + ?Sized,
    {
        fb.clear(Rgba::TRANSPARENT);

        let cell_size = self.cell_size(transform.scale);
        let mut stats = RenderStats {
            cell_size,
            ..RenderStats::default()
        };

        let marker_positions: Vec<Point> = markers
            .iter()
            .filter_map(|m| project(m.longitude, m.latitude, projection, transform))
            .collect();

        let viewport = Rect::new(0.0, 0.0, fb.width() as f32, fb.height() as f32)
            .inflate(cell_size as f32);
        let avoid_radius = self.style.marker_avoid_radius;

        for sample in samples {
            let Some(screen) = project(sample.longitude, sample.latitude, projection, transform)
            else {
                stats.off_map += 1;
                continue;
            };

            if !viewport.contains(screen) {
                stats.culled += 1;
                continue;
            }

            if marker_positions.iter().any(|m| screen.distance(*m) < avoid_radius) {
                stats.near_marker += 1;
                continue;
            }

            fb.fill_cell(screen, cell_size, self.sample_color(sample.reading()));
            stats.rendered += 1;
        }

        debug!(
            rendered = stats.rendered,
            culled = stats.culled,
            off_map = stats.off_map,
            near_marker = stats.near_marker,
            scale = transform.scale,
            "overlay rendered"
        );

        stats
    }
}
