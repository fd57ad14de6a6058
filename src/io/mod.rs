//! Input/output operations and error handling

/// Command-line interface and batch orchestration
pub mod cli;
/// Engine constants and runtime configuration
pub mod configuration;
/// Error types
pub mod error;
/// PNG loading, saving and raster codecs
pub mod image;
/// Logger setup
pub mod logging;
/// Template record import and export
pub mod persistence;
/// Terminal progress display
pub mod progress;
