//! Statistics for a single diffed tile

use crate::algorithm::classify::Classification;
use crate::color::pixel::ColorKey;
use crate::spatial::address::TileAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification counts for one tile, rebuilt on every diff
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileProgress {
    /// Required template pixels inside the tile
    pub total_pixel_count: usize,
    /// Required pixels painted with the right color
    pub painted_pixel_count: usize,
    /// Pixels painted wrong, including paint over blank template cells
    pub wrong_pixel_count: usize,
    /// Correct pixels per template color
    pub painted_color_counts: BTreeMap<ColorKey, usize>,
    /// Wrong pixels per recorded color
    pub wrong_color_counts: BTreeMap<ColorKey, usize>,
    /// Template-space positions of wrong pixels, in sampling order
    pub wrong_pixel_positions: Vec<TileAddress>,
}

impl TileProgress {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one classified sample into the counts
    pub fn record(&mut self, classification: Classification, position: TileAddress) {
        if classification.is_required() {
            self.total_pixel_count += 1;
        }

        match classification {
            Classification::Correct(color) => {
                self.painted_pixel_count += 1;
                *self.painted_color_counts.entry(color).or_default() += 1;
            }
            Classification::Wrong(color) | Classification::Overpainted(color) => {
                self.wrong_pixel_count += 1;
                *self.wrong_color_counts.entry(color).or_default() += 1;
                self.wrong_pixel_positions.push(position);
            }
            Classification::Pending | Classification::Ignored => {}
        }
    }
}
