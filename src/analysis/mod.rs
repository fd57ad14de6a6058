//! Progress statistics for diffed tiles

/// Session-wide aggregation fed through a channel
pub mod aggregator;
/// Status snapshot for display collaborators
pub mod status;
/// Statistics of a single tile
pub mod tile_progress;
