//! Status snapshot handed to whatever displays progress

use crate::analysis::aggregator::ProgressAggregator;
use crate::spatial::address::TileAddress;
use crate::template::store::TemplateStore;
use serde::{Deserialize, Serialize};

/// Counts describing how far the canvas is from the templates
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Number of loaded templates
    pub template_count: usize,
    /// Correctly painted pixels over the diffed tiles
    pub painted_pixel_count: usize,
    /// Pixels that must be painted
    pub total_pixel_count: usize,
    /// Wrongly painted pixels over the diffed tiles
    pub wrong_pixel_count: usize,
    /// Template-space positions of wrong pixels
    pub wrong_pixel_positions: Vec<TileAddress>,
}

impl StatusSnapshot {
    /// Build a snapshot from the store and the aggregated tiles
    ///
    /// The required total comes from the templates whenever they report one,
    /// because the aggregator only knows about tiles diffed so far.
    pub fn collect(store: &TemplateStore, aggregator: &ProgressAggregator) -> Self {
        let totals = aggregator.totals();
        let required = store.required_pixel_total();

        Self {
            template_count: store.len(),
            painted_pixel_count: totals.painted_pixel_count,
            total_pixel_count: if required > 0 {
                required
            } else {
                totals.total_pixel_count
            },
            wrong_pixel_count: totals.wrong_pixel_count,
            wrong_pixel_positions: totals.wrong_pixel_positions,
        }
    }

    /// Required pixels not yet painted correctly
    pub const fn remaining_pixel_count(&self) -> usize {
        self.total_pixel_count.saturating_sub(self.painted_pixel_count)
    }

    /// Share of required pixels painted correctly, in percent
    pub fn completion_percent(&self) -> f64 {
        if self.total_pixel_count == 0 {
            return 0.0;
        }
        self.painted_pixel_count as f64 * 100.0 / self.total_pixel_count as f64
    }
}
