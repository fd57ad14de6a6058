//! Conversion between stored template records and the template store
//!
//! Records carry each fragment as a base64 PNG keyed by its serialized tile
//! address. Import is lenient: a tile that fails to parse or decode is
//! skipped with a warning and the rest of the template is kept.

use crate::color::palette::{AllowedColors, PaletteEntry};
use crate::color::pixel::ColorKey;
use crate::io::configuration::{EngineConfig, SCHEMA_VERSION};
use crate::io::error::{Result, TileDiffError, invalid_record};
use crate::io::image::{decode_raster, encode_png};
use crate::spatial::address::TileAddress;
use crate::template::entity::{Template, TemplateMetadata, TileFragment};
use crate::template::store::TemplateStore;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One persisted template
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// `"<priority> <authorId>"`
    pub storage_key: String,
    /// Label shown to the user
    pub display_name: String,
    /// Serialized tile address to base64-encoded PNG fragment
    pub tiles: BTreeMap<String, String>,
    /// Palette counts and enable flags
    #[serde(default)]
    pub palette: BTreeMap<ColorKey, PaletteEntry>,
    /// Canvas palette, when one was supplied at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_colors: Option<Vec<ColorKey>>,
}

/// File-level container for persisted templates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    /// Version of the layout that wrote the document
    pub schema_version: u32,
    /// Templates in store order
    pub templates: Vec<TemplateRecord>,
}

impl Default for TemplateDocument {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            templates: Vec::new(),
        }
    }
}

/// What an import kept and dropped
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Templates added to the store
    pub imported_templates: usize,
    /// Templates dropped entirely
    pub skipped_templates: usize,
    /// Individual tiles dropped from otherwise imported templates
    pub skipped_tiles: usize,
}

/// Split a storage key into priority and author
///
/// # Errors
///
/// Returns `InvalidRecord` if the key is not `"<integer> <author>"`
pub fn parse_storage_key(storage_key: &str) -> Result<(i64, String)> {
    let (priority, author) = storage_key
        .split_once(' ')
        .ok_or_else(|| invalid_record(&storage_key, &"expected '<priority> <author>'"))?;
    let priority = priority
        .parse::<i64>()
        .map_err(|e| invalid_record(&storage_key, &e))?;
    Ok((priority, author.to_string()))
}

/// Convert a template into its persisted form
///
/// # Errors
///
/// Returns an error if a fragment cannot be encoded as PNG
pub fn template_to_record(template: &Template) -> Result<TemplateRecord> {
    let mut tiles = BTreeMap::new();
    for (address, fragment) in template.tiles() {
        let png = encode_png(fragment.bitmap())?;
        tiles.insert(address.to_string(), STANDARD.encode(png));
    }

    Ok(TemplateRecord {
        storage_key: template.storage_key().to_string(),
        display_name: template.display_name().to_string(),
        tiles,
        palette: template.color_palette().to_map(),
        allowed_colors: Some(template.allowed_colors().keys().collect()),
    })
}

/// Convert every template of a store into a document
///
/// # Errors
///
/// Returns an error if any fragment cannot be encoded
pub fn export_store(store: &TemplateStore) -> Result<TemplateDocument> {
    let templates = store
        .templates()
        .iter()
        .map(template_to_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(TemplateDocument {
        schema_version: SCHEMA_VERSION,
        templates,
    })
}

/// Rebuild a template from a record
///
/// Returns the template and the number of tiles that had to be skipped.
///
/// # Errors
///
/// Returns `InvalidRecord` if the storage key is malformed or no tile could
/// be decoded. Tiles whose offset or bitmap does not fit the configured tile
/// geometry count as undecodable.
pub fn record_to_template(
    record: &TemplateRecord,
    config: &EngineConfig,
) -> Result<(Template, usize)> {
    let (priority, author_id) = parse_storage_key(&record.storage_key)?;

    let mut fragments = BTreeMap::new();
    let mut skipped = 0;
    for (key, encoded) in &record.tiles {
        match decode_tile(key, encoded, config) {
            Ok(fragment) => {
                fragments.insert(fragment.address(), fragment);
            }
            Err(error) => {
                warn!("Skipping tile {key} of '{}': {error}", record.storage_key);
                skipped += 1;
            }
        }
    }

    if fragments.is_empty() {
        return Err(invalid_record(&record.storage_key, &"no decodable tiles"));
    }

    let allowed_colors = record.allowed_colors.as_ref().map(|keys| {
        AllowedColors::new(keys.iter().filter_map(|key| match key {
            ColorKey::Known(rgb) => Some(*rgb),
            ColorKey::Other => None,
        }))
    });

    let metadata = TemplateMetadata {
        display_name: record.display_name.clone(),
        priority,
        author_id,
        allowed_colors,
    };
    let mut template = Template::from_fragments(metadata, fragments, config);
    template.color_palette_mut().apply_flags(&record.palette);

    Ok((template, skipped))
}

fn decode_tile(key: &str, encoded: &str, config: &EngineConfig) -> Result<TileFragment> {
    let address: TileAddress = key.parse()?;
    if address.pixel_x >= config.tile_size || address.pixel_y >= config.tile_size {
        return Err(invalid_record(&key, &"pixel offset lies outside the tile"));
    }

    let bytes = STANDARD.decode(encoded.trim())?;
    let bitmap = decode_raster(&bytes)?;
    let multiplier = config.draw_multiplier;
    let (width, height) = bitmap.dimensions();
    if !width.is_multiple_of(multiplier) || !height.is_multiple_of(multiplier) {
        return Err(invalid_record(
            &key,
            &format!("bitmap {width}x{height} is not a whole number of {multiplier}px blocks"),
        ));
    }
    // Offsets are below tile_size, so these sums cannot overflow
    if address.pixel_x + width / multiplier > config.tile_size
        || address.pixel_y + height / multiplier > config.tile_size
    {
        return Err(invalid_record(&key, &"bitmap extends past the tile edge"));
    }

    Ok(TileFragment::new(address, bitmap))
}

/// Add every importable template of a document to a store
///
/// Malformed templates and tiles are skipped and counted, never fatal.
pub fn import_document(
    document: &TemplateDocument,
    store: &mut TemplateStore,
    config: &EngineConfig,
) -> ImportReport {
    let mut report = ImportReport::default();

    for record in &document.templates {
        match record_to_template(record, config) {
            Ok((template, skipped_tiles)) => {
                store.insert(template);
                report.imported_templates += 1;
                report.skipped_tiles += skipped_tiles;
            }
            Err(error) => {
                warn!("Skipping template '{}': {error}", record.storage_key);
                report.skipped_templates += 1;
            }
        }
    }

    info!(
        "Imported {} templates ({} skipped, {} tiles skipped)",
        report.imported_templates, report.skipped_templates, report.skipped_tiles
    );
    report
}

/// Read a template document from a JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid document
pub fn load_document(path: &Path) -> Result<TemplateDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| TileDiffError::FileSystem {
        path: path.to_path_buf(),
        operation: "read templates",
        source: e,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Write a template document as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if serialization or writing fails
pub fn save_document(document: &TemplateDocument, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(document)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TileDiffError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }
    std::fs::write(path, text).map_err(|e| TileDiffError::FileSystem {
        path: path.to_path_buf(),
        operation: "write templates",
        source: e,
    })
}
