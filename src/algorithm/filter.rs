//! Palette filtering of fragment bitmaps before compositing

use crate::algorithm::classify::ReferencePalette;
use crate::color::pixel::Pixel;
use crate::io::configuration::EngineConfig;
use crate::io::error::{Result, invalid_geometry};
use crate::template::entity::TileFragment;
use image::RgbaImage;
use log::warn;
use std::borrow::Cow;

/// Bitmap to draw for a fragment under the reference palette
///
/// Borrows the stored bitmap when every color is enabled or when filtering
/// fails; otherwise returns a filtered copy.
pub fn overlay_bitmap<'a>(
    fragment: &'a TileFragment,
    reference: &ReferencePalette<'_>,
    config: &EngineConfig,
) -> Cow<'a, RgbaImage> {
    if reference.palette.all_enabled() {
        return Cow::Borrowed(fragment.bitmap());
    }

    match filter_fragment(fragment, reference, config) {
        Ok(filtered) => Cow::Owned(filtered),
        Err(error) => {
            warn!(
                "Palette filter failed for fragment {}: {error}; drawing unfiltered",
                fragment.address()
            );
            Cow::Borrowed(fragment.bitmap())
        }
    }
}

/// Copy a fragment bitmap with disabled colors made transparent
///
/// Only block centers with non-zero alpha are inspected and cleared; colors
/// outside the allowed set are looked up under the `Other` bucket.
///
/// # Errors
///
/// Returns `InvalidGeometry` if the bitmap is not a whole number of blocks
pub fn filter_fragment(
    fragment: &TileFragment,
    reference: &ReferencePalette<'_>,
    config: &EngineConfig,
) -> Result<RgbaImage> {
    let multiplier = config.draw_multiplier;
    let (width, height) = fragment.bitmap().dimensions();
    if width % multiplier != 0 || height % multiplier != 0 {
        return Err(invalid_geometry(&format!(
            "bitmap {width}x{height} is not a multiple of draw multiplier {multiplier}"
        )));
    }

    let center = config.center_offset();
    let mut filtered = fragment.bitmap().clone();
    for (column, row, pixel) in fragment.centers(config) {
        if pixel.alpha == 0 {
            continue;
        }

        let bucket = reference.allowed.bucket(pixel.color_key());
        if reference.palette.is_hidden(bucket)
            && let Some(target) =
                filtered.get_pixel_mut_checked(column * multiplier + center, row * multiplier + center)
        {
            *target = Pixel::new(pixel.red, pixel.green, pixel.blue, 0).into();
        }
    }

    Ok(filtered)
}
