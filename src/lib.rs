//! Template overlay and progress tracking for tiled pixel-art canvases
//!
//! Templates are sliced into fragments along the canvas tile grid. Each live
//! tile is compared against the fragments covering it by sampling the center
//! of every upscaled pixel block, producing an overlay image and per-tile
//! statistics that are aggregated into a session-wide status.

#![forbid(unsafe_code)]

/// Tile diffing: classification, palette filtering and compositing
pub mod algorithm;
/// Per-tile statistics, aggregation and status snapshots
pub mod analysis;
/// Pixel values, color keys and template palettes
pub mod color;
/// Input/output operations, configuration and error handling
pub mod io;
/// Tile addressing, template chunking and fragment lookup
pub mod spatial;
/// Template entities and the template store
pub mod template;

pub use io::error::{Result, TileDiffError};
