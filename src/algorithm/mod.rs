//! Tile diffing against stored templates

/// Pixel classification and canvas snapshots
pub mod classify;
/// Tile diff engine combining classification and compositing
pub mod engine;
/// Palette filtering of fragment bitmaps
pub mod filter;
