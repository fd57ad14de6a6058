//! RGBA pixel samples and the color keys used for palettes and statistics

use crate::io::configuration::{OTHER_COLOR_KEY, PAINTED_ALPHA_THRESHOLD};
use crate::io::error::{TileDiffError, invalid_record};
use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single RGBA sample from a template or canvas raster
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
    /// Alpha channel
    pub alpha: u8,
}

impl Pixel {
    /// Create a pixel from its channels
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// A fully transparent black pixel
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Whether the pixel is opaque enough to count as painted
    pub const fn is_painted(&self) -> bool {
        self.alpha >= PAINTED_ALPHA_THRESHOLD
    }

    /// Whether the pixel counts as blank
    pub const fn is_unpainted(&self) -> bool {
        !self.is_painted()
    }

    /// The palette key of this pixel's color, ignoring alpha
    pub const fn color_key(&self) -> ColorKey {
        ColorKey::Known([self.red, self.green, self.blue])
    }

    /// Compare color channels only
    pub const fn eq_rgb(&self, other: &Self) -> bool {
        self.red == other.red && self.green == other.green && self.blue == other.blue
    }

    /// Compare all four channels
    pub const fn eq_rgba(&self, other: &Self) -> bool {
        self.eq_rgb(other) && self.alpha == other.alpha
    }
}

impl From<Rgba<u8>> for Pixel {
    fn from(value: Rgba<u8>) -> Self {
        let [red, green, blue, alpha] = value.0;
        Self::new(red, green, blue, alpha)
    }
}

impl From<&Rgba<u8>> for Pixel {
    fn from(value: &Rgba<u8>) -> Self {
        Self::from(*value)
    }
}

impl From<Pixel> for Rgba<u8> {
    fn from(value: Pixel) -> Self {
        Self([value.red, value.green, value.blue, value.alpha])
    }
}

/// Palette and statistics key for a color
///
/// Colors outside a template's allowed color set share the `Other` bucket
/// when palette filtering is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorKey {
    /// A concrete RGB color
    Known([u8; 3]),
    /// Any color not in the allowed color set
    Other,
}

impl ColorKey {
    /// Key for an RGB triple
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::Known([red, green, blue])
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known([r, g, b]) => write!(f, "{r},{g},{b}"),
            Self::Other => f.write_str(OTHER_COLOR_KEY),
        }
    }
}

impl FromStr for ColorKey {
    type Err = TileDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == OTHER_COLOR_KEY {
            return Ok(Self::Other);
        }

        let mut channels = [0u8; 3];
        let mut parts = s.split(',');
        for channel in &mut channels {
            let part = parts
                .next()
                .ok_or_else(|| invalid_record(&s, &"color key needs three channels"))?;
            *channel = part
                .trim()
                .parse::<u8>()
                .map_err(|e| invalid_record(&s, &e))?;
        }
        if parts.next().is_some() {
            return Err(invalid_record(&s, &"color key has more than three channels"));
        }

        Ok(Self::Known(channels))
    }
}

impl Serialize for ColorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
