//! PNG loading, saving and in-memory raster codecs

use crate::io::error::{Result, TileDiffError};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Decode compressed image bytes into an RGBA raster
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| TileDiffError::ImageCodec {
            operation: "decode",
            source: e,
        })
}

/// Encode an RGBA raster as PNG bytes
///
/// # Errors
///
/// Returns an error if PNG encoding fails
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| TileDiffError::ImageCodec {
            operation: "encode",
            source: e,
        })?;
    Ok(bytes)
}

/// Load an image file as an RGBA raster
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_png(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| TileDiffError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Save a raster as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn save_png(raster: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TileDiffError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    raster
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| TileDiffError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}
