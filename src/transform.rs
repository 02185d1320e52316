//! Pan/zoom view transform.
//!
//! `screen = projected * scale + translate`. Every mutation goes through a
//! [`ZoomPolicy`] so the scale can never leave `[min_scale, max_scale]`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Zoom limits and step factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    /// Smallest allowed scale.
    pub min_scale: f32,
    /// Largest allowed scale.
    pub max_scale: f32,
    /// Scale multiplier for one wheel notch towards the user.
    pub wheel_in: f32,
    /// Scale multiplier for one wheel notch away from the user.
    pub wheel_out: f32,
    /// Scale multiplier for the zoom buttons.
    pub button_step: f32,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 8.0,
            wheel_in: 1.1,
            wheel_out: 0.9,
            button_step: 1.5,
        }
    }
}

impl ZoomPolicy {
    /// Check that the limits are finite, positive and ordered, and that each
    /// step factor zooms in the direction its name says.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidZoomPolicy`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("wheel_in", self.wheel_in),
            ("wheel_out", self.wheel_out),
            ("button_step", self.button_step),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidZoomPolicy(format!("{name} is {value}")));
        }

        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(Error::InvalidZoomPolicy(format!(
                "scale range [{}, {}] must be positive and ordered",
                self.min_scale, self.max_scale
            )));
        }
        if self.wheel_in <= 1.0 {
            return Err(Error::InvalidZoomPolicy(format!(
                "wheel_in {} must be greater than 1",
                self.wheel_in
            )));
        }
        if self.wheel_out <= 0.0 || self.wheel_out >= 1.0 {
            return Err(Error::InvalidZoomPolicy(format!(
                "wheel_out {} must be in (0, 1)",
                self.wheel_out
            )));
        }
        if self.button_step <= 1.0 {
            return Err(Error::InvalidZoomPolicy(format!(
                "button_step {} must be greater than 1",
                self.button_step
            )));
        }
        Ok(())
    }

    /// Clamp a scale into `[min_scale, max_scale]`.
    #[must_use]
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Affine map from projected map space to screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Zoom factor.
    pub scale: f32,
    /// Horizontal offset in screen pixels.
    pub translate_x: f32,
    /// Vertical offset in screen pixels.
    pub translate_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// Scale 1, no translation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0);

    /// Create a transform.
    #[must_use]
    pub const fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Map a projected point to the screen.
    #[must_use]
    pub fn apply(&self, projected: Point) -> Point {
        Point::new(
            projected.x * self.scale + self.translate_x,
            projected.y * self.scale + self.translate_y,
        )
    }

    /// Map a screen point back to projected map space.
    #[must_use]
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    /// Translate by a screen-space delta.
    #[must_use]
    pub fn panned(self, dx: f32, dy: f32) -> Self {
        Self::new(self.scale, self.translate_x + dx, self.translate_y + dy)
    }

    /// Multiply the scale by `factor`, keeping the screen point `anchor` fixed.
    ///
    /// The new scale is clamped by `policy`. If clamping leaves the scale
    /// unchanged, or `factor` is not a finite positive number, the transform
    /// is returned as is.
    #[must_use]
    pub fn zoomed_at(self, anchor: Point, factor: f32, policy: &ZoomPolicy) -> Self {
        if !(factor.is_finite() && factor > 0.0) {
            return self;
        }
        let new_scale = policy.clamp(self.scale * factor);
        if new_scale == self.scale {
            return self;
        }

        let ratio = new_scale / self.scale;
        Self::new(
            new_scale,
            anchor.x - (anchor.x - self.translate_x) * ratio,
            anchor.y - (anchor.y - self.translate_y) * ratio,
        )
    }

    /// Multiply the scale by `factor` without touching the translation.
    #[must_use]
    pub fn rescaled(self, factor: f32, policy: &ZoomPolicy) -> Self {
        if !(factor.is_finite() && factor > 0.0) {
            return self;
        }
        Self::new(policy.clamp(self.scale * factor), self.translate_x, self.translate_y)
    }
}
