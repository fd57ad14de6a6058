//! Color handling shared by templates and the diff engine

/// Template palettes and allowed color sets
pub mod palette;
/// RGBA samples and color keys
pub mod pixel;

pub use pixel::{ColorKey, Pixel};
