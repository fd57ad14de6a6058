//! Terminal progress display while diffing a batch of tiles

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Tiles: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar over the tiles of one run, showing the running match rate
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a bar for `tile_count` tiles
    pub fn new(tile_count: usize) -> Self {
        let bar = ProgressBar::new(tile_count as u64);
        bar.set_style(TILE_STYLE.clone());
        Self { bar }
    }

    /// Create a bar that draws nothing, for quiet runs and tests
    pub fn hidden(tile_count: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(tile_count as u64);
        Self { bar }
    }

    /// Mark the next tile as done and show current totals
    pub fn tile_done(&self, tile_name: &str, painted: usize, required: usize) {
        self.bar.set_message(format!("{tile_name} {painted}/{required}"));
        self.bar.inc(1);
    }

    /// Tiles processed so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
