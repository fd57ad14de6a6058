//! Template entities and their tile fragments

use crate::color::palette::{AllowedColors, ColorPalette};
use crate::color::pixel::Pixel;
use crate::io::configuration::EngineConfig;
use crate::spatial::address::{TileAddress, TileCoords};
use image::RgbaImage;
use std::collections::{BTreeMap, HashSet};

/// The part of a template bitmap that falls inside one canvas tile
///
/// Bitmaps are stored at draw resolution and never change after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileFragment {
    address: TileAddress,
    bitmap: RgbaImage,
}

impl TileFragment {
    /// Create a fragment anchored at `address`
    pub const fn new(address: TileAddress, bitmap: RgbaImage) -> Self {
        Self { address, bitmap }
    }

    /// Address of the fragment's top-left corner
    pub const fn address(&self) -> TileAddress {
        self.address
    }

    /// Tile the fragment lies in
    pub const fn tile_coords(&self) -> TileCoords {
        self.address.tile()
    }

    /// Offset of the fragment inside its tile, in logical pixels
    pub const fn pixel_coords(&self) -> (u32, u32) {
        (self.address.pixel_x, self.address.pixel_y)
    }

    /// Draw-resolution raster
    pub const fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    /// Iterate the center pixel of every block with its logical offset
    pub fn centers(&self, config: &EngineConfig) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        let multiplier = config.draw_multiplier;
        let center = config.center_offset();
        let (width, height) = self.bitmap.dimensions();
        let columns = width / multiplier;
        let rows = height / multiplier;

        (0..rows).flat_map(move |row| {
            (0..columns).filter_map(move |column| {
                self.bitmap
                    .get_pixel_checked(column * multiplier + center, row * multiplier + center)
                    .map(|rgba| (column, row, Pixel::from(rgba)))
            })
        })
    }
}

/// Caller-supplied description of a template
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateMetadata {
    /// Label shown to the user
    pub display_name: String,
    /// Draw order key, lowest is the bottom layer
    pub priority: i64,
    /// Opaque identity used to disambiguate storage keys
    pub author_id: String,
    /// Canvas palette; when absent the template's own colors are used
    pub allowed_colors: Option<AllowedColors>,
}

impl TemplateMetadata {
    /// Metadata with no explicit canvas palette
    pub fn new(display_name: &str, priority: i64, author_id: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            priority,
            author_id: author_id.to_string(),
            allowed_colors: None,
        }
    }

    /// Storage key in `"<priority> <authorId>"` form
    pub fn storage_key(&self) -> String {
        format!("{} {}", self.priority, self.author_id)
    }
}

/// One user template split into tile fragments
#[derive(Clone, Debug)]
pub struct Template {
    display_name: String,
    priority: i64,
    author_id: String,
    storage_key: String,
    tiles: BTreeMap<TileAddress, TileFragment>,
    tile_prefixes: Option<HashSet<TileCoords>>,
    color_palette: ColorPalette,
    allowed_colors: AllowedColors,
    required_pixel_count: usize,
    pixel_count: usize,
}

impl Template {
    /// Build a template from its fragments, sampling block centers for
    /// palette and pixel totals
    pub fn from_fragments(
        metadata: TemplateMetadata,
        tiles: BTreeMap<TileAddress, TileFragment>,
        config: &EngineConfig,
    ) -> Self {
        let storage_key = metadata.storage_key();
        let allowed_colors = metadata
            .allowed_colors
            .unwrap_or_else(|| template_colors(&tiles, *config));

        let mut color_palette = ColorPalette::new();
        let mut required_pixel_count = 0;
        let mut pixel_count = 0;
        for fragment in tiles.values() {
            for (_, _, pixel) in fragment.centers(config) {
                pixel_count += 1;
                if pixel.is_painted() {
                    required_pixel_count += 1;
                    color_palette.tally(pixel, &allowed_colors);
                }
            }
        }

        let mut template = Self {
            display_name: metadata.display_name,
            priority: metadata.priority,
            author_id: metadata.author_id,
            storage_key,
            tiles,
            tile_prefixes: None,
            color_palette,
            allowed_colors,
            required_pixel_count,
            pixel_count,
        };
        template.rebuild_tile_index();
        template
    }

    /// Label shown to the user
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Draw order key
    pub const fn priority(&self) -> i64 {
        self.priority
    }

    /// Author identity
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// Stable external identifier
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// All fragments keyed by address
    pub const fn tiles(&self) -> &BTreeMap<TileAddress, TileFragment> {
        &self.tiles
    }

    /// Palette with enable flags
    pub const fn color_palette(&self) -> &ColorPalette {
        &self.color_palette
    }

    /// Mutable palette access for toggling colors
    pub const fn color_palette_mut(&mut self) -> &mut ColorPalette {
        &mut self.color_palette
    }

    /// Canvas colors considered in-palette
    pub const fn allowed_colors(&self) -> &AllowedColors {
        &self.allowed_colors
    }

    /// Number of template pixels that must be painted
    pub const fn required_pixel_count(&self) -> usize {
        self.required_pixel_count
    }

    /// Number of template pixels, painted or blank
    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Whether the tile index is currently built
    pub const fn has_tile_index(&self) -> bool {
        self.tile_prefixes.is_some()
    }

    /// Drop the tile index; lookups fall back to scanning fragment keys
    pub fn invalidate_tile_index(&mut self) {
        self.tile_prefixes = None;
    }

    /// Rebuild the tile index from the fragment keys
    pub fn rebuild_tile_index(&mut self) {
        self.tile_prefixes = Some(self.tiles.keys().map(TileAddress::tile).collect());
    }

    /// Whether any fragment lies in the given tile
    pub fn touches_tile(&self, coords: TileCoords) -> bool {
        self.tile_prefixes.as_ref().map_or_else(
            || self.touches_tile_by_scan(coords),
            |prefixes| prefixes.contains(&coords),
        )
    }

    /// Scan every fragment key for the given tile
    pub fn touches_tile_by_scan(&self, coords: TileCoords) -> bool {
        self.tiles.keys().any(|address| address.tile() == coords)
    }

    /// First fragment of this template inside the given tile
    pub fn fragment_for_tile(&self, coords: TileCoords) -> Option<&TileFragment> {
        self.tiles
            .range(TileAddress::tile_start(coords)..=TileAddress::tile_end(coords))
            .next()
            .map(|(_, fragment)| fragment)
    }
}

// Every painted color of a template, used when no canvas palette is given
fn template_colors(
    tiles: &BTreeMap<TileAddress, TileFragment>,
    config: EngineConfig,
) -> AllowedColors {
    AllowedColors::new(tiles.values().flat_map(|fragment| {
        fragment
            .centers(&config)
            .filter(|(_, _, pixel)| pixel.is_painted())
            .map(|(_, _, pixel)| [pixel.red, pixel.green, pixel.blue])
    }))
}
