//! Tile grid coordinates and fixed-width tile address keys

use crate::io::configuration::{PIXEL_FIELD_WIDTH, TILE_FIELD_WIDTH};
use crate::io::error::{Result, TileDiffError, invalid_geometry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Grid position of a canvas tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoords {
    /// Tile column
    pub x: u32,
    /// Tile row
    pub y: u32,
}

impl TileCoords {
    /// Create tile coordinates
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Tile plus pixel offset inside that tile
///
/// Field order gives the same ordering as the zero-padded string form, so a
/// `BTreeMap` keyed by addresses iterates in storage-key order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    /// Tile column
    pub tile_x: u32,
    /// Tile row
    pub tile_y: u32,
    /// Pixel column inside the tile
    pub pixel_x: u32,
    /// Pixel row inside the tile
    pub pixel_y: u32,
}

impl TileAddress {
    /// Create a tile address
    pub const fn new(tile_x: u32, tile_y: u32, pixel_x: u32, pixel_y: u32) -> Self {
        Self {
            tile_x,
            tile_y,
            pixel_x,
            pixel_y,
        }
    }

    /// The tile this address lies in
    pub const fn tile(&self) -> TileCoords {
        TileCoords::new(self.tile_x, self.tile_y)
    }

    /// Smallest address inside a tile
    pub const fn tile_start(coords: TileCoords) -> Self {
        Self::new(coords.x, coords.y, 0, 0)
    }

    /// Largest address inside a tile
    pub const fn tile_end(coords: TileCoords) -> Self {
        Self::new(coords.x, coords.y, u32::MAX, u32::MAX)
    }

    /// Validate user-supplied coordinates and build an address
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if any component is non-finite, negative,
    /// fractional, too large, or if the pixel offset is outside the tile
    pub fn from_components(components: [f64; 4], tile_size: u32) -> Result<Self> {
        let mut values = [0u32; 4];
        for (value, component) in values.iter_mut().zip(components) {
            if !component.is_finite() {
                return Err(invalid_geometry(&format!(
                    "coordinate {component} is not finite"
                )));
            }
            if component < 0.0 {
                return Err(invalid_geometry(&format!(
                    "coordinate {component} is negative"
                )));
            }
            if component.fract() != 0.0 {
                return Err(invalid_geometry(&format!(
                    "coordinate {component} is not a whole number"
                )));
            }
            if component > f64::from(u32::MAX) {
                return Err(invalid_geometry(&format!(
                    "coordinate {component} is out of range"
                )));
            }
            *value = component as u32;
        }

        let [tile_x, tile_y, pixel_x, pixel_y] = values;
        if pixel_x >= tile_size || pixel_y >= tile_size {
            return Err(invalid_geometry(&format!(
                "pixel offset ({pixel_x}, {pixel_y}) lies outside a {tile_size}px tile"
            )));
        }

        Ok(Self::new(tile_x, tile_y, pixel_x, pixel_y))
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0tw$},{:0tw$},{:0pw$},{:0pw$}",
            self.tile_x,
            self.tile_y,
            self.pixel_x,
            self.pixel_y,
            tw = TILE_FIELD_WIDTH,
            pw = PIXEL_FIELD_WIDTH
        )
    }
}

impl FromStr for TileAddress {
    type Err = TileDiffError;

    fn from_str(s: &str) -> Result<Self> {
        let mut values = [0u32; 4];
        let mut parts = s.split(',');
        for value in &mut values {
            let part = parts
                .next()
                .ok_or_else(|| invalid_geometry(&format!("tile address '{s}' needs four fields")))?;
            *value = part
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid_geometry(&format!("tile address '{s}': {e}")))?;
        }
        if parts.next().is_some() {
            return Err(invalid_geometry(&format!(
                "tile address '{s}' has more than four fields"
            )));
        }

        let [tile_x, tile_y, pixel_x, pixel_y] = values;
        Ok(Self::new(tile_x, tile_y, pixel_x, pixel_y))
    }
}

impl Serialize for TileAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TileAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
