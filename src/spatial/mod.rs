//! Spatial layout of templates on the canvas tile grid
//!
//! This module contains spatial-related functionality including:
//! - Tile and pixel addressing
//! - Template chunking into tile fragments
//! - Priority-ordered fragment lookup per tile

/// Tile coordinates and tile address keys
pub mod address;
/// Template chunking along the tile grid
pub mod chunker;
/// Fragment lookup in draw order
pub mod matcher;

pub use address::{TileAddress, TileCoords};
