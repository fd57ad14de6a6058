//! Center-sampled classification of template pixels against a canvas snapshot

use crate::analysis::tile_progress::TileProgress;
use crate::color::palette::{AllowedColors, ColorPalette};
use crate::color::pixel::{ColorKey, Pixel};
use crate::io::configuration::EngineConfig;
use crate::io::error::{Result, invalid_geometry};
use crate::spatial::address::TileAddress;
use crate::template::entity::{Template, TileFragment};
use image::RgbaImage;

/// Palette and allowed colors that drive filtering and blank-cell checks
///
/// Taken from the first template drawn on a tile and applied to every
/// fragment of that tile.
#[derive(Clone, Copy, Debug)]
pub struct ReferencePalette<'a> {
    /// Enable flags used for the overlay filter
    pub palette: &'a ColorPalette,
    /// Colors that count as in-palette on the canvas
    pub allowed: &'a AllowedColors,
}

impl<'a> ReferencePalette<'a> {
    /// Use a template's own palette as the reference
    pub const fn from_template(template: &'a Template) -> Self {
        Self {
            palette: template.color_palette(),
            allowed: template.allowed_colors(),
        }
    }
}

/// Outcome of comparing one template pixel with the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Blank template cell with nothing relevant painted over it
    Ignored,
    /// Blank template cell painted with an in-palette canvas color
    Overpainted(ColorKey),
    /// Required pixel painted with the template color
    Correct(ColorKey),
    /// Required pixel painted with another color; carries the expected color
    Wrong(ColorKey),
    /// Required pixel not painted yet
    Pending,
}

impl Classification {
    /// Whether the template pixel must be painted
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Correct(_) | Self::Wrong(_) | Self::Pending)
    }

    /// Whether the canvas disagrees with the template here
    pub const fn is_wrong(&self) -> bool {
        matches!(self, Self::Overpainted(_) | Self::Wrong(_))
    }
}

/// Classify a template pixel (`shred`) against the canvas pixel under it
pub fn classify_pixel(shred: Pixel, ground: Pixel, allowed: &AllowedColors) -> Classification {
    if shred.is_unpainted() {
        if ground.is_painted() && allowed.contains(ground.color_key()) {
            return Classification::Overpainted(ground.color_key());
        }
        return Classification::Ignored;
    }

    if ground.is_unpainted() {
        Classification::Pending
    } else if ground.eq_rgb(&shred) {
        Classification::Correct(shred.color_key())
    } else {
        Classification::Wrong(shred.color_key())
    }
}

/// Copy of the live tile taken before any overlay is drawn
#[derive(Clone, Debug)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    /// Capture the raw pixels of a rendered tile
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if the canvas is not `draw_size` square,
    /// in which case its pixels cannot be lined up with template fragments
    pub fn capture(canvas: &RgbaImage, config: &EngineConfig) -> Result<Self> {
        let draw_size = config.draw_size();
        if canvas.dimensions() != (draw_size, draw_size) {
            return Err(invalid_geometry(&format!(
                "tile canvas is {}x{}, expected {draw_size}x{draw_size}",
                canvas.width(),
                canvas.height()
            )));
        }

        Ok(Self {
            pixels: canvas.clone(),
        })
    }

    /// Pixel at a draw-space position, if inside the tile
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        self.pixels.get_pixel_checked(x, y).map(Pixel::from)
    }
}

/// Classify every sampled pixel of one fragment into `progress`
///
/// Samples that fall outside the snapshot, including fragments whose offset
/// lies beyond draw space, are skipped. Wrong pixels are recorded in template
/// pixel space.
pub fn classify_fragment(
    fragment: &TileFragment,
    snapshot: &Snapshot,
    allowed: &AllowedColors,
    config: &EngineConfig,
    progress: &mut TileProgress,
) {
    let multiplier = config.draw_multiplier;
    let center = config.center_offset();
    let (offset_x, offset_y) = fragment.pixel_coords();
    let tile = fragment.tile_coords();
    let (Some(base_x), Some(base_y)) = (
        offset_x.checked_mul(multiplier),
        offset_y.checked_mul(multiplier),
    ) else {
        return;
    };

    for (column, row, shred) in fragment.centers(config) {
        let ground = base_x
            .checked_add(column * multiplier + center)
            .zip(base_y.checked_add(row * multiplier + center))
            .and_then(|(x, y)| snapshot.pixel(x, y));
        let Some(ground) = ground else {
            continue;
        };

        // A sample inside the snapshot keeps offset + column below tile_size
        let classification = classify_pixel(shred, ground, allowed);
        let position = TileAddress::new(tile.x, tile.y, offset_x + column, offset_y + row);
        progress.record(classification, position);
    }
}
