//! Tile diffing: snapshot, classify, composite

use crate::algorithm::classify::{ReferencePalette, Snapshot, classify_fragment};
use crate::algorithm::filter::overlay_bitmap;
use crate::analysis::tile_progress::TileProgress;
use crate::io::configuration::EngineConfig;
use crate::spatial::address::TileCoords;
use crate::spatial::matcher::MatchedFragment;
use crate::template::store::TemplateStore;
use image::{Pixel as _, Rgba, RgbaImage};
use log::{debug, warn};

/// Result of diffing one tile
#[derive(Clone, Debug)]
pub struct DiffOutcome {
    /// Image to display in place of the live tile
    pub composite: RgbaImage,
    /// Statistics for the tile, absent when nothing was classified
    pub progress: Option<TileProgress>,
}

/// Compares live tiles with the stored templates
#[derive(Clone, Copy, Debug, Default)]
pub struct DiffEngine {
    config: EngineConfig,
}

impl DiffEngine {
    /// Create an engine for the given geometry
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Geometry the engine renders at
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Diff a live tile at native resolution against every template on it
    ///
    /// Tiles without templates come back unmodified and without progress.
    /// Never fails: problems degrade to rendering without statistics.
    pub fn process_tile(
        &self,
        store: &TemplateStore,
        coords: TileCoords,
        tile: &RgbaImage,
    ) -> DiffOutcome {
        let fragments = store.fragments_for_tile(coords);
        let Some(first) = fragments.first() else {
            debug!("No templates on tile {coords}");
            return DiffOutcome {
                composite: tile.clone(),
                progress: None,
            };
        };

        let reference = ReferencePalette::from_template(first.template);
        self.diff(self.upscale(tile), coords, &fragments, &reference)
    }

    /// Diff an already upscaled canvas against ordered fragments
    ///
    /// `reference` decides palette filtering and which canvas colors count as
    /// wrong on blank template cells, for all fragments alike.
    pub fn diff(
        &self,
        mut canvas: RgbaImage,
        coords: TileCoords,
        fragments: &[MatchedFragment<'_>],
        reference: &ReferencePalette<'_>,
    ) -> DiffOutcome {
        let snapshot = match Snapshot::capture(&canvas, &self.config) {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                warn!("Skipping statistics for tile {coords}: {error}");
                None
            }
        };

        let multiplier = self.config.draw_multiplier;
        let mut progress = TileProgress::new();
        let mut classified = false;

        for matched in fragments {
            if let Some(snapshot) = &snapshot {
                classify_fragment(
                    matched.fragment,
                    snapshot,
                    reference.allowed,
                    &self.config,
                    &mut progress,
                );
                classified = true;
            }

            let (pixel_x, pixel_y) = matched.fragment.pixel_coords();
            let (Some(draw_x), Some(draw_y)) = (
                pixel_x.checked_mul(multiplier),
                pixel_y.checked_mul(multiplier),
            ) else {
                warn!(
                    "Fragment {} lies outside draw space; not drawn",
                    matched.fragment.address()
                );
                continue;
            };
            let bitmap = overlay_bitmap(matched.fragment, reference, &self.config);
            composite_over(&mut canvas, &bitmap, draw_x, draw_y);
        }

        if classified {
            debug!(
                "Tile {coords}: {}/{} painted, {} wrong",
                progress.painted_pixel_count,
                progress.total_pixel_count,
                progress.wrong_pixel_count
            );
        }

        DiffOutcome {
            composite: canvas,
            progress: classified.then_some(progress),
        }
    }

    /// Nearest-neighbour upscale of a native tile by the draw multiplier
    pub fn upscale(&self, tile: &RgbaImage) -> RgbaImage {
        let multiplier = self.config.draw_multiplier;
        RgbaImage::from_fn(
            tile.width() * multiplier,
            tile.height() * multiplier,
            |x, y| {
                tile.get_pixel_checked(x / multiplier, y / multiplier)
                    .copied()
                    .unwrap_or(Rgba([0, 0, 0, 0]))
            },
        )
    }
}

/// Draw `top` over `canvas` at a draw-space offset (source-over)
///
/// Transparent pixels leave the canvas untouched and opaque ones replace it
/// exactly; only partial alpha is blended. Pixels past the canvas edge are
/// clipped.
pub fn composite_over(canvas: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (local_x, local_y, source) in top.enumerate_pixels() {
        let alpha = source.0[3];
        if alpha == 0 {
            continue;
        }
        let Some(target) = x
            .checked_add(local_x)
            .zip(y.checked_add(local_y))
            .and_then(|(target_x, target_y)| canvas.get_pixel_mut_checked(target_x, target_y))
        else {
            continue;
        };
        if alpha == u8::MAX {
            *target = *source;
        } else {
            target.blend(source);
        }
    }
}
