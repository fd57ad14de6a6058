//! Session-wide progress bookkeeping fed through a single-writer channel
//!
//! Diff passes never touch the aggregator directly. They send
//! [`ProgressUpdate`] messages through a [`ProgressSender`]; the owner of the
//! aggregator drains them with [`ProgressAggregator::apply_pending`]. Records
//! are upserts keyed by tile, so the last diff of a tile wins.

use crate::analysis::tile_progress::TileProgress;
use crate::color::pixel::ColorKey;
use crate::spatial::address::{TileAddress, TileCoords};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

/// Message delivered to the aggregator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Replace the record of a tile
    Record(TileCoords, TileProgress),
    /// Forget every record, sent when templates are removed or reset
    Clear,
}

/// Sending half handed to diff passes
#[derive(Clone, Debug)]
pub struct ProgressSender {
    sender: Sender<ProgressUpdate>,
}

impl ProgressSender {
    /// Queue a tile record; returns false once the aggregator is gone
    pub fn record(&self, coords: TileCoords, progress: TileProgress) -> bool {
        self.sender
            .send(ProgressUpdate::Record(coords, progress))
            .is_ok()
    }

    /// Queue a reset; returns false once the aggregator is gone
    pub fn clear(&self) -> bool {
        self.sender.send(ProgressUpdate::Clear).is_ok()
    }
}

/// Receiving half owned alongside the aggregator
#[derive(Debug)]
pub struct ProgressReceiver {
    receiver: Receiver<ProgressUpdate>,
}

/// Create a connected sender/receiver pair
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (sender, receiver) = mpsc::channel();
    (ProgressSender { sender }, ProgressReceiver { receiver })
}

/// Summed counts over every recorded tile
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressTotals {
    /// Required pixels over the diffed tiles
    pub total_pixel_count: usize,
    /// Correctly painted pixels
    pub painted_pixel_count: usize,
    /// Wrongly painted pixels
    pub wrong_pixel_count: usize,
    /// Wrong pixel positions, tile by tile
    pub wrong_pixel_positions: Vec<TileAddress>,
}

/// Per-color sums over every recorded tile
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTotals {
    /// Correct pixels per color
    pub painted: BTreeMap<ColorKey, usize>,
    /// Wrong pixels per color
    pub wrong: BTreeMap<ColorKey, usize>,
}

/// Latest progress record of every diffed tile
///
/// Iteration follows tile coordinate order, so totals are deterministic for
/// any insertion history.
#[derive(Clone, Debug, Default)]
pub struct ProgressAggregator {
    tiles: BTreeMap<TileCoords, TileProgress>,
}

impl ProgressAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for a tile
    pub fn record(&mut self, coords: TileCoords, progress: TileProgress) {
        if self.tiles.insert(coords, progress).is_some() {
            trace!("Replaced progress for tile {coords}");
        }
    }

    /// Forget every record
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Apply one update
    pub fn apply(&mut self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::Record(coords, progress) => self.record(coords, progress),
            ProgressUpdate::Clear => self.clear(),
        }
    }

    /// Apply every update queued so far without blocking
    ///
    /// Returns the number of updates applied.
    pub fn apply_pending(&mut self, receiver: &ProgressReceiver) -> usize {
        let mut applied = 0;
        while let Ok(update) = receiver.receiver.try_recv() {
            self.apply(update);
            applied += 1;
        }
        if applied > 0 {
            debug!("Applied {applied} progress updates");
        }
        applied
    }

    /// Record for one tile
    pub fn get(&self, coords: TileCoords) -> Option<&TileProgress> {
        self.tiles.get(&coords)
    }

    /// Number of tiles with a record
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile has been recorded
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum counts and concatenate wrong positions over all tiles
    pub fn totals(&self) -> ProgressTotals {
        self.tiles
            .values()
            .fold(ProgressTotals::default(), |mut totals, tile| {
                totals.total_pixel_count += tile.total_pixel_count;
                totals.painted_pixel_count += tile.painted_pixel_count;
                totals.wrong_pixel_count += tile.wrong_pixel_count;
                totals
                    .wrong_pixel_positions
                    .extend_from_slice(&tile.wrong_pixel_positions);
                totals
            })
    }

    /// Sum per-color counts over all tiles
    pub fn color_totals(&self) -> ColorTotals {
        let mut totals = ColorTotals::default();
        for tile in self.tiles.values() {
            for (&color, &count) in &tile.painted_color_counts {
                *totals.painted.entry(color).or_default() += count;
            }
            for (&color, &count) in &tile.wrong_color_counts {
                *totals.wrong.entry(color).or_default() += count;
            }
        }
        totals
    }
}
