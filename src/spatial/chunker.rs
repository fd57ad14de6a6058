//! Slicing template images into tile-aligned fragments
//!
//! A template may start anywhere inside a tile and span any number of tiles.
//! The chunker walks the template in tile-sized steps and emits one fragment
//! per tile it touches, upscaled to draw resolution.

use crate::io::configuration::EngineConfig;
use crate::io::error::{Result, invalid_geometry};
use crate::spatial::address::TileAddress;
use crate::template::entity::TileFragment;
use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;

/// Produces the tile fragments of a template image
///
/// Implementations must emit at most one fragment per tile; the matcher
/// only ever reads the first fragment of a tile.
pub trait Chunker {
    /// Split `image` placed at `origin` into fragments keyed by address
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be placed on the canvas
    fn chunk(
        &self,
        image: &RgbaImage,
        origin: TileAddress,
    ) -> Result<BTreeMap<TileAddress, TileFragment>>;

    /// Geometry the fragments are produced for
    fn config(&self) -> EngineConfig;
}

/// Chunker cutting along the canvas tile grid
#[derive(Clone, Copy, Debug, Default)]
pub struct GridChunker {
    config: EngineConfig,
}

impl GridChunker {
    /// Create a chunker for the given geometry
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl Chunker for GridChunker {
    fn chunk(
        &self,
        image: &RgbaImage,
        origin: TileAddress,
    ) -> Result<BTreeMap<TileAddress, TileFragment>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(invalid_geometry(&"template image has no pixels"));
        }

        let tile_size = u64::from(self.config.tile_size);
        if u64::from(origin.pixel_x) >= tile_size || u64::from(origin.pixel_y) >= tile_size {
            return Err(invalid_geometry(&format!(
                "pixel offset ({}, {}) lies outside a {tile_size}px tile",
                origin.pixel_x, origin.pixel_y
            )));
        }

        let start_x = u64::from(origin.pixel_x);
        let start_y = u64::from(origin.pixel_y);
        let end_x = start_x + u64::from(width);
        let end_y = start_y + u64::from(height);

        let mut fragments = BTreeMap::new();

        // Absolute pixel positions relative to the origin tile's top-left corner
        let mut pixel_y = start_y;
        while pixel_y < end_y {
            let span_y = (tile_size - pixel_y % tile_size).min(end_y - pixel_y);

            let mut pixel_x = start_x;
            while pixel_x < end_x {
                let span_x = (tile_size - pixel_x % tile_size).min(end_x - pixel_x);

                let address = TileAddress::new(
                    offset_tile(origin.tile_x, pixel_x / tile_size)?,
                    offset_tile(origin.tile_y, pixel_y / tile_size)?,
                    (pixel_x % tile_size) as u32,
                    (pixel_y % tile_size) as u32,
                );

                let bitmap = self.shred(
                    image,
                    (pixel_x - start_x) as u32,
                    (pixel_y - start_y) as u32,
                    span_x as u32,
                    span_y as u32,
                );
                fragments.insert(address, TileFragment::new(address, bitmap));

                pixel_x += span_x;
            }

            pixel_y += span_y;
        }

        Ok(fragments)
    }

    fn config(&self) -> EngineConfig {
        self.config
    }
}

impl GridChunker {
    // Upscales a region so each logical pixel becomes a block whose center
    // holds the color and whose remaining pixels stay transparent
    fn shred(
        self,
        image: &RgbaImage,
        source_x: u32,
        source_y: u32,
        span_x: u32,
        span_y: u32,
    ) -> RgbaImage {
        let multiplier = self.config.draw_multiplier;
        let center = self.config.center_offset();
        let mut bitmap = RgbaImage::from_pixel(
            span_x * multiplier,
            span_y * multiplier,
            Rgba([0, 0, 0, 0]),
        );

        for local_y in 0..span_y {
            for local_x in 0..span_x {
                let Some(&source) = image.get_pixel_checked(source_x + local_x, source_y + local_y)
                else {
                    continue;
                };
                if let Some(target) = bitmap.get_pixel_mut_checked(
                    local_x * multiplier + center,
                    local_y * multiplier + center,
                ) {
                    *target = source;
                }
            }
        }

        bitmap
    }
}

fn offset_tile(base: u32, offset: u64) -> Result<u32> {
    u32::try_from(u64::from(base) + offset).map_err(|_overflow| {
        invalid_geometry(&format!("tile index {base} + {offset} is out of range"))
    })
}
