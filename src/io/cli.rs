//! Command-line interface for diffing a directory of canvas tiles

use crate::algorithm::engine::DiffEngine;
use crate::analysis::aggregator::{
    ProgressAggregator, ProgressReceiver, ProgressSender, progress_channel,
};
use crate::analysis::status::StatusSnapshot;
use crate::color::palette::AllowedColors;
use crate::color::pixel::ColorKey;
use crate::io::configuration::{
    DEFAULT_DRAW_MULTIPLIER, DEFAULT_TILE_SIZE, EngineConfig, OVERLAY_SUFFIX,
};
use crate::io::error::{Result, TileDiffError, invalid_parameter};
use crate::io::image::{load_png, save_png};
use crate::io::persistence::{export_store, import_document, load_document, save_document};
use crate::io::progress::BatchProgress;
use crate::spatial::address::TileCoords;
use crate::spatial::chunker::GridChunker;
use crate::template::entity::TemplateMetadata;
use crate::template::store::TemplateStore;
use clap::Parser;
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tilediff")]
#[command(
    author,
    version,
    about = "Overlay templates on canvas tiles and measure painting progress"
)]
/// Command-line arguments for the tile diff tool
pub struct Cli {
    /// Directory of live tiles named `<tileX>_<tileY>.png`
    #[arg(value_name = "TILES")]
    pub tiles: PathBuf,

    /// Template image to add before diffing
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Template origin as tileX,tileY,pixelX,pixelY
    #[arg(
        short,
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        value_name = "TX,TY,PX,PY"
    )]
    pub origin: Vec<f64>,

    /// Display name of the added template
    #[arg(short, long, default_value = "template")]
    pub name: String,

    /// Draw priority of the added template (lowest draws first)
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    pub priority: i64,

    /// Author identity used in the template storage key
    #[arg(short, long, default_value = "local")]
    pub author: String,

    /// Canvas palette color as r,g,b (repeatable; defaults to template colors)
    #[arg(long = "allowed-color", value_name = "R,G,B")]
    pub allowed_colors: Vec<ColorKey>,

    /// Palette color to hide from overlays as r,g,b or `other` (repeatable)
    #[arg(long = "disable", value_name = "R,G,B")]
    pub disabled_colors: Vec<ColorKey>,

    /// JSON file templates are loaded from and saved to
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Directory for composite tiles (defaults to the tiles directory)
    #[arg(short = 'O', long)]
    pub output: Option<PathBuf>,

    /// Write the final status snapshot as JSON to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Tile side length in canvas pixels
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Device pixels per canvas pixel (odd)
    #[arg(short = 'm', long, default_value_t = DEFAULT_DRAW_MULTIPLIER)]
    pub draw_multiplier: u32,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Validated engine geometry
    ///
    /// # Errors
    ///
    /// Returns an error if the tile size or draw multiplier is invalid
    pub fn engine_config(&self) -> Result<EngineConfig> {
        EngineConfig::new(self.tile_size, self.draw_multiplier)
    }
}

/// Parse `<tileX>_<tileY>.png` into tile coordinates
pub fn parse_tile_name(path: &Path) -> Option<TileCoords> {
    if path.extension().and_then(|s| s.to_str()) != Some("png") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (x, y) = stem.split_once('_')?;
    Some(TileCoords::new(x.parse().ok()?, y.parse().ok()?))
}

/// Drives templates, the diff engine and the aggregator over tile files
pub struct TileProcessor {
    cli: Cli,
    engine: DiffEngine,
    store: TemplateStore,
    aggregator: ProgressAggregator,
    sender: ProgressSender,
    receiver: ProgressReceiver,
}

impl TileProcessor {
    /// Create a processor for the given arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the engine geometry is invalid
    pub fn new(cli: Cli) -> Result<Self> {
        let engine = DiffEngine::new(cli.engine_config()?);
        let (sender, receiver) = progress_channel();

        Ok(Self {
            cli,
            engine,
            store: TemplateStore::new(),
            aggregator: ProgressAggregator::new(),
            sender,
            receiver,
        })
    }

    /// Templates loaded so far
    pub const fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Load templates, diff every tile and report the outcome
    ///
    /// # Errors
    ///
    /// Returns an error if the template or state cannot be loaded, the tiles
    /// directory cannot be read, or outputs cannot be written
    pub fn process(&mut self) -> Result<StatusSnapshot> {
        self.load_state()?;
        self.add_template()?;
        self.apply_disabled_colors();

        let tiles = self.collect_tiles()?;
        let progress = if self.cli.should_show_progress() {
            BatchProgress::new(tiles.len())
        } else {
            BatchProgress::hidden(tiles.len())
        };

        for (coords, path) in &tiles {
            self.process_tile(*coords, path)?;
            self.aggregator.apply_pending(&self.receiver);
            let totals = self.aggregator.totals();
            progress.tile_done(
                &coords.to_string(),
                totals.painted_pixel_count,
                totals.total_pixel_count,
            );
        }
        progress.finish();

        self.aggregator.apply_pending(&self.receiver);
        let status = StatusSnapshot::collect(&self.store, &self.aggregator);

        self.save_state()?;
        self.write_report(&status)?;
        self.print_summary(&status);

        Ok(status)
    }

    fn load_state(&mut self) -> Result<()> {
        let Some(state) = &self.cli.state else {
            return Ok(());
        };
        if !state.exists() {
            info!("No saved templates at {}", state.display());
            return Ok(());
        }

        let document = load_document(state)?;
        import_document(&document, &mut self.store, &self.engine.config());
        // Stored statistics belong to the previous template set
        self.sender.clear();
        Ok(())
    }

    fn add_template(&mut self) -> Result<()> {
        let Some(path) = &self.cli.template else {
            return Ok(());
        };

        let origin: [f64; 4] = self.cli.origin.as_slice().try_into().map_err(|_len| {
            invalid_parameter(
                "origin",
                &format!("{:?}", self.cli.origin),
                &"expected four values tileX,tileY,pixelX,pixelY",
            )
        })?;

        let image = load_png(path)?;
        let mut metadata = TemplateMetadata::new(&self.cli.name, self.cli.priority, &self.cli.author);
        if !self.cli.allowed_colors.is_empty() {
            metadata.allowed_colors = Some(AllowedColors::new(
                self.cli.allowed_colors.iter().filter_map(|key| match key {
                    ColorKey::Known(rgb) => Some(*rgb),
                    ColorKey::Other => None,
                }),
            ));
        }

        let chunker = GridChunker::new(self.engine.config());
        self.store.add_template(&chunker, &image, origin, metadata)?;
        self.sender.clear();
        Ok(())
    }

    fn apply_disabled_colors(&mut self) {
        let keys: Vec<String> = self
            .store
            .templates()
            .iter()
            .map(|template| template.storage_key().to_string())
            .collect();

        for color in &self.cli.disabled_colors {
            let hidden = keys
                .iter()
                .filter(|key| self.store.set_color_enabled(key, *color, false).is_ok())
                .count();
            if hidden == 0 {
                warn!("Color {color} is not used by any template");
            }
        }
    }

    fn collect_tiles(&self) -> Result<Vec<(TileCoords, PathBuf)>> {
        let dir = &self.cli.tiles;
        if !dir.is_dir() {
            return Err(invalid_parameter(
                "tiles",
                &dir.display(),
                &"must be a directory of <tileX>_<tileY>.png files",
            ));
        }

        let entries = std::fs::read_dir(dir).map_err(|e| TileDiffError::FileSystem {
            path: dir.clone(),
            operation: "read directory",
            source: e,
        })?;

        let mut tiles = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(coords) = parse_tile_name(&path) {
                tiles.push((coords, path));
            }
        }
        tiles.sort();
        Ok(tiles)
    }

    fn process_tile(&self, coords: TileCoords, path: &Path) -> Result<()> {
        let tile = match load_png(path) {
            Ok(tile) => tile,
            Err(error) => {
                warn!("Skipping tile {coords}: {error}");
                return Ok(());
            }
        };

        let outcome = self.engine.process_tile(&self.store, coords, &tile);
        if let Some(progress) = outcome.progress {
            self.sender.record(coords, progress);
        }

        let output_dir = self.cli.output.as_deref().unwrap_or(&self.cli.tiles);
        let output_path = output_dir.join(format!("{}_{}{OVERLAY_SUFFIX}.png", coords.x, coords.y));
        save_png(&outcome.composite, &output_path)
    }

    fn save_state(&self) -> Result<()> {
        match &self.cli.state {
            Some(state) => save_document(&export_store(&self.store)?, state),
            None => Ok(()),
        }
    }

    fn write_report(&self, status: &StatusSnapshot) -> Result<()> {
        let Some(report) = &self.cli.report else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(status)?;
        std::fs::write(report, text).map_err(|e| TileDiffError::FileSystem {
            path: report.clone(),
            operation: "write report",
            source: e,
        })
    }

    // Allow print for the final summary line
    #[allow(clippy::print_stdout)]
    fn print_summary(&self, status: &StatusSnapshot) {
        if self.cli.quiet {
            return;
        }
        println!(
            "{} templates: {}/{} pixels painted ({:.2}%), {} wrong",
            status.template_count,
            status.painted_pixel_count,
            status.total_pixel_count,
            status.completion_percent(),
            status.wrong_pixel_count
        );
    }
}
