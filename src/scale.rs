//! Scale functions for data-to-visual mappings.
//!
//! The overlay colors samples with a stepped (banded) scale: an ordered table
//! of `(lower_bound, color)` pairs in which each band covers
//! `[lower_bound, next_lower_bound)`.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;
}

/// One entry of a [`ColorBands`] table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Inclusive lower bound of the band.
    pub lower: f32,
    /// Color painted for values in this band.
    pub color: Rgba,
}

/// Stepped color scale over ordered `(lower_bound, color)` bands.
///
/// Lookup rules:
/// - the first band with `lower <= v < next.lower` wins;
/// - values at or above the last bound take the last band's color;
/// - values below the first bound match no interval and also fall through to
///   the last band's color;
/// - `NaN` and absent values map to the neutral color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBands {
    bands: Vec<Band>,
    neutral: Rgba,
}

impl ColorBands {
    /// Create a band table.
    ///
    /// # Errors
    ///
    /// Returns an error if `bands` is empty, a bound is NaN, or bounds are not
    /// strictly increasing.
    ///
    /// # Example
    ///
    /// ```
    /// use pm25_map::color::Rgba;
    /// use pm25_map::scale::ColorBands;
    ///
    /// let bands = ColorBands::new(vec![
    ///     (0.0, Rgba::rgb(0, 255, 0)),
    ///     (5.0, Rgba::rgb(0, 0, 255)),
    ///     (9999.0, Rgba::rgb(255, 0, 0)),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(bands.color_for(Some(3.0)), Rgba::rgb(0, 255, 0));
    /// assert_eq!(bands.color_for(None), Rgba::NEUTRAL);
    /// ```
    pub fn new(bands: Vec<(f32, Rgba)>) -> Result<Self> {
        if bands.is_empty() {
            return Err(Error::InvalidBands("at least one band is required".to_string()));
        }

        if let Some((i, _)) = bands.iter().enumerate().find(|(_, (lower, _))| lower.is_nan()) {
            return Err(Error::InvalidBands(format!("band {i} has a NaN lower bound")));
        }

        if let Some(i) = bands.windows(2).position(|w| w[0].0 >= w[1].0) {
            return Err(Error::InvalidBands(format!(
                "bounds must increase: band {} ({}) >= band {} ({})",
                i,
                bands[i].0,
                i + 1,
                bands[i + 1].0
            )));
        }

        Ok(Self {
            bands: bands.into_iter().map(|(lower, color)| Band { lower, color }).collect(),
            neutral: Rgba::NEUTRAL,
        })
    }

    /// The PM2.5 air-quality palette in µg/m³, from "very good" to
    /// "extremely poor".
    #[must_use]
    pub fn pm25() -> Self {
        let bands = [
            (0.0, Rgba::rgb(164, 255, 255)),
            (5.0, Rgba::rgb(176, 218, 233)),
            (10.0, Rgba::rgb(176, 206, 237)),
            (15.0, Rgba::rgb(249, 224, 71)),
            (20.0, Rgba::rgb(242, 200, 75)),
            (30.0, Rgba::rgb(241, 166, 63)),
            (40.0, Rgba::rgb(233, 135, 37)),
            (50.0, Rgba::rgb(175, 69, 83)),
            (60.0, Rgba::rgb(134, 59, 71)),
            (70.0, Rgba::rgb(103, 58, 61)),
            (80.0, Rgba::rgb(70, 47, 48)),
            (90.0, Rgba::rgb(37, 36, 36)),
        ];

        Self {
            bands: bands.into_iter().map(|(lower, color)| Band { lower, color }).collect(),
            neutral: Rgba::NEUTRAL,
        }
    }

    /// Replace the color used for absent and `NaN` values.
    #[must_use]
    pub fn with_neutral(mut self, neutral: Rgba) -> Self {
        self.neutral = neutral;
        self
    }

    /// The neutral color.
    #[must_use]
    pub const fn neutral(&self) -> Rgba {
        self.neutral
    }

    /// The band table in ascending order.
    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Index of the band a value falls in, or `None` for `NaN`.
    #[must_use]
    pub fn band_index(&self, value: f32) -> Option<usize> {
        if value.is_nan() {
            return None;
        }

        let last = self.bands.len() - 1;
        let index = self
            .bands
            .windows(2)
            .position(|w| value >= w[0].lower && value < w[1].lower)
            .unwrap_or(last);
        Some(index)
    }

    /// Color for an optional value.
    #[must_use]
    pub fn color_for(&self, value: Option<f32>) -> Rgba {
        match value.and_then(|v| self.band_index(v)) {
            Some(i) => self.bands[i].color,
            None => self.neutral,
        }
    }
}

impl Default for ColorBands {
    fn default() -> Self {
        Self::pm25()
    }
}

impl Scale<f32, Rgba> for ColorBands {
    fn scale(&self, value: f32) -> Rgba {
        self.color_for(Some(value))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every non-negative value lands in exactly one band, and that band's
        /// interval contains the value.
        #[test]
        fn prop_bands_partition_non_negative_reals(value in 0.0f32..1.0e6) {
            let bands = ColorBands::pm25();
            let i = bands.band_index(value).expect("finite values always map to a band");
            let table = bands.bands();

            prop_assert!(value >= table[i].lower);
            if i + 1 < table.len() {
                prop_assert!(value < table[i + 1].lower);
            }

            let containing = table
                .iter()
                .enumerate()
                .filter(|(j, band)| {
                    value >= band.lower
                        && table.get(j + 1).map_or(true, |next| value < next.lower)
                })
                .count();
            prop_assert_eq!(containing, 1);
        }

        /// Color mapping is total: any bit pattern yields a band color or the
        /// neutral color, never a panic.
        #[test]
        fn prop_color_mapping_is_total(bits in any::<u32>()) {
            let value = f32::from_bits(bits);
            let bands = ColorBands::pm25();
            let color = bands.color_for(Some(value));

            if value.is_nan() {
                prop_assert_eq!(color, Rgba::NEUTRAL);
            } else {
                prop_assert!(bands.bands().iter().any(|b| b.color == color));
            }
        }
    }
}
