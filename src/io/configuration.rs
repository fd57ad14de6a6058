//! Engine constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};

/// Side length of one canvas tile in logical pixels
pub const DEFAULT_TILE_SIZE: u32 = 1000;

/// Device pixels per logical pixel when rendering overlays (must be odd)
pub const DEFAULT_DRAW_MULTIPLIER: u32 = 3;

// Below this alpha a pixel counts as blank on both the canvas and the template
/// Minimum alpha for a pixel to count as painted
pub const PAINTED_ALPHA_THRESHOLD: u8 = 64;

/// Digits used for tile grid fields in serialized tile addresses
pub const TILE_FIELD_WIDTH: usize = 4;
/// Digits used for pixel offset fields in serialized tile addresses
pub const PIXEL_FIELD_WIDTH: usize = 3;

/// Palette bucket name for colors outside the allowed color set
pub const OTHER_COLOR_KEY: &str = "other";

/// Version written into persisted template documents
pub const SCHEMA_VERSION: u32 = 1;

// Output settings
/// Suffix added to composite tile filenames
pub const OVERLAY_SUFFIX: &str = "_overlay";
/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn";
/// Log filter used with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "debug";
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Geometry shared by the chunker and the diff engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Side length of one canvas tile in logical pixels
    pub tile_size: u32,
    /// Device pixels per logical pixel
    pub draw_multiplier: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            draw_multiplier: DEFAULT_DRAW_MULTIPLIER,
        }
    }
}

impl EngineConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the tile size is zero or the draw multiplier is
    /// not a positive odd integer
    pub fn new(tile_size: u32, draw_multiplier: u32) -> Result<Self> {
        if tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &"must be at least 1",
            ));
        }
        if draw_multiplier == 0 || draw_multiplier.is_multiple_of(2) {
            return Err(invalid_parameter(
                "draw_multiplier",
                &draw_multiplier,
                &"must be a positive odd integer",
            ));
        }
        if tile_size.checked_mul(draw_multiplier).is_none() {
            return Err(invalid_parameter(
                "draw_multiplier",
                &draw_multiplier,
                &"draw size overflows",
            ));
        }
        Ok(Self {
            tile_size,
            draw_multiplier,
        })
    }

    /// Side length of a rendered tile in device pixels
    pub const fn draw_size(&self) -> u32 {
        self.tile_size * self.draw_multiplier
    }

    /// Offset of the sampled pixel inside each upscaled block
    pub const fn center_offset(&self) -> u32 {
        (self.draw_multiplier - 1) / 2
    }
}
