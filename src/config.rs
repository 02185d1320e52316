//! YAML configuration for the map overlay.
//!
//! Every field has a default, so an empty document is a valid configuration.
//!
//! ```yaml
//! version: 1
//! render:
//!   base_cell_size: 2.0
//!   marker_avoid_radius: 8.0
//!   alpha: 180
//!   saturation_boost: 1.1
//! zoom:
//!   min_scale: 0.5
//!   max_scale: 8.0
//! neutral_color: "#e0e0e0"
//! bands:
//!   - { lower: 0, color: "rgb(164,255,255)" }
//!   - { lower: 5, color: "rgb(176,218,233)" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::gesture::PanZoomController;
use crate::render::{OverlayStyle, ViewportRenderer};
use crate::scale::ColorBands;
use crate::transform::ZoomPolicy;

/// One `{ lower, color }` entry of the band table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// Inclusive lower bound.
    pub lower: f32,
    /// `rgb(r,g,b)` or `#rrggbb`.
    pub color: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Overlay rendering constants.
    #[serde(default)]
    pub render: OverlayStyle,

    /// Zoom limits and steps.
    #[serde(default)]
    pub zoom: ZoomPolicy,

    /// Color for samples without a value.
    #[serde(default = "default_neutral_color")]
    pub neutral_color: String,

    /// Band table; empty means the built-in PM2.5 palette.
    #[serde(default)]
    pub bands: Vec<BandConfig>,
}

fn default_version() -> u32 {
    1
}
fn default_neutral_color() -> String {
    "#e0e0e0".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            render: OverlayStyle::default(),
            zoom: ZoomPolicy::default(),
            neutral_color: default_neutral_color(),
            bands: Vec::new(),
        }
    }
}

impl MapConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Resolve the band table, parsing every color.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable colors or non-increasing bounds.
    pub fn color_bands(&self) -> Result<ColorBands> {
        let neutral = Rgba::parse(&self.neutral_color)?;

        let bands = if self.bands.is_empty() {
            ColorBands::pm25()
        } else {
            let table = self
                .bands
                .iter()
                .map(|b| Ok((b.lower, Rgba::parse(&b.color)?)))
                .collect::<Result<Vec<_>>>()?;
            ColorBands::new(table)?
        };

        Ok(bands.with_neutral(neutral))
    }

    /// The zoom policy, validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the limits are not finite, positive and ordered,
    /// or a step factor zooms the wrong way.
    pub fn zoom_policy(&self) -> Result<ZoomPolicy> {
        self.zoom.validate()?;
        Ok(self.zoom)
    }

    /// Build a pan/zoom controller from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the zoom policy is invalid.
    pub fn controller(&self) -> Result<PanZoomController> {
        PanZoomController::new(self.zoom_policy()?)
    }

    /// Build a renderer from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the band table or the render style is invalid.
    pub fn renderer(&self) -> Result<ViewportRenderer> {
        ViewportRenderer::new(self.color_bands()?, self.render)
    }
}
