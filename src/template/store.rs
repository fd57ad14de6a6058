//! Collection of active templates

use crate::color::pixel::ColorKey;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::address::{TileAddress, TileCoords};
use crate::spatial::chunker::Chunker;
use crate::spatial::matcher::{self, MatchedFragment};
use crate::template::entity::{Template, TemplateMetadata};
use image::RgbaImage;
use log::{debug, info};

/// Owns every template in insertion order
#[derive(Clone, Debug, Default)]
pub struct TemplateStore {
    templates: Vec<Template>,
}

impl TemplateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk an image into a new template and store it
    ///
    /// A template whose storage key already exists replaces the old one in
    /// its original slot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if the origin coordinates are non-finite,
    /// negative, fractional or outside the tile, or if the image is empty
    pub fn add_template(
        &mut self,
        chunker: &impl Chunker,
        image: &RgbaImage,
        origin: [f64; 4],
        metadata: TemplateMetadata,
    ) -> Result<&Template> {
        let config = chunker.config();
        let origin = TileAddress::from_components(origin, config.tile_size)?;
        let fragments = chunker.chunk(image, origin)?;
        let template = Template::from_fragments(metadata, fragments, &config);

        info!(
            "Template '{}' added at {origin}: {} fragments, {} required pixels",
            template.display_name(),
            template.tiles().len(),
            template.required_pixel_count()
        );

        let storage_key = template.storage_key().to_string();
        self.insert(template);
        self.get(&storage_key).ok_or_else(|| {
            invalid_parameter("storage_key", &storage_key, &"template missing after insert")
        })
    }

    /// Store an already built template
    ///
    /// Returns the template previously stored under the same key, whose slot
    /// the new template takes over.
    pub fn insert(&mut self, template: Template) -> Option<Template> {
        let existing = self
            .templates
            .iter()
            .position(|stored| stored.storage_key() == template.storage_key());

        self.templates.push(template);
        existing.map(|index| {
            debug!("Replacing template at slot {index}");
            self.templates.swap_remove(index)
        })
    }

    /// Remove a template by storage key
    pub fn remove(&mut self, storage_key: &str) -> Option<Template> {
        let index = self
            .templates
            .iter()
            .position(|template| template.storage_key() == storage_key)?;
        Some(self.templates.remove(index))
    }

    /// Remove every template
    pub fn clear(&mut self) {
        self.templates.clear();
    }

    /// Look up a template by storage key
    pub fn get(&self, storage_key: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|template| template.storage_key() == storage_key)
    }

    /// Mutable lookup by storage key
    pub fn get_mut(&mut self, storage_key: &str) -> Option<&mut Template> {
        self.templates
            .iter_mut()
            .find(|template| template.storage_key() == storage_key)
    }

    /// Templates in insertion order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Number of templates
    pub const fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the store is empty
    pub const fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fragments covering a tile, lowest priority first
    pub fn fragments_for_tile(&self, coords: TileCoords) -> Vec<MatchedFragment<'_>> {
        matcher::fragments_for_tile(&self.templates, coords)
    }

    /// Sum of required pixels over all templates
    pub fn required_pixel_total(&self) -> usize {
        self.templates
            .iter()
            .map(Template::required_pixel_count)
            .sum()
    }

    /// Show or hide one palette color of a template
    ///
    /// # Errors
    ///
    /// Returns an error if the template or the color does not exist
    pub fn set_color_enabled(
        &mut self,
        storage_key: &str,
        key: ColorKey,
        enabled: bool,
    ) -> Result<()> {
        let template = self
            .get_mut(storage_key)
            .ok_or_else(|| invalid_parameter("storage_key", &storage_key, &"no such template"))?;
        if template.color_palette_mut().set_enabled(key, enabled) {
            Ok(())
        } else {
            Err(invalid_parameter(
                "color",
                &key,
                &"color is not in the template palette",
            ))
        }
    }

    /// Show or hide every palette color of a template
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not exist
    pub fn set_all_colors_enabled(&mut self, storage_key: &str, enabled: bool) -> Result<()> {
        let template = self
            .get_mut(storage_key)
            .ok_or_else(|| invalid_parameter("storage_key", &storage_key, &"no such template"))?;
        template.color_palette_mut().set_all_enabled(enabled);
        Ok(())
    }
}
