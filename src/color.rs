//! Color types and parsing.
//!
//! Colors are 8-bit RGBA. Band tables in configuration files write colors as
//! CSS-style `rgb(r,g,b)` or `#rrggbb` strings, both parsed here.

use std::str::FromStr;

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Neutral gray (`#e0e0e0`) used for samples without a value.
    pub const NEUTRAL: Self = Self::rgb(224, 224, 224);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Multiply each RGB channel by `factor`, rounding and clamping to 255.
    ///
    /// Alpha is left unchanged.
    #[must_use]
    pub fn boosted(self, factor: f32) -> Self {
        let boost = |c: u8| -> u8 { (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8 };
        Self::new(boost(self.r), boost(self.g), boost(self.b), self.a)
    }

    /// Parse an `rgb(r,g,b)` or `#rrggbb` color string.
    ///
    /// # Example
    ///
    /// ```
    /// use pm25_map::color::Rgba;
    ///
    /// assert_eq!(Rgba::parse("rgb(164, 255, 255)").unwrap(), Rgba::rgb(164, 255, 255));
    /// assert_eq!(Rgba::parse("#e0e0e0").unwrap(), Rgba::NEUTRAL);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel =
                |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let channels = inner
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<u8>>>()?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
