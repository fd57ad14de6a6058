//! Per-template color palettes with enable/disable flags

use crate::color::pixel::{ColorKey, Pixel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Usage count and visibility of one palette color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Number of required template pixels with this color
    pub count: usize,
    /// Whether pixels of this color are drawn in the overlay
    pub enabled: bool,
}

impl Default for PaletteEntry {
    fn default() -> Self {
        Self {
            count: 0,
            enabled: true,
        }
    }
}

/// Set of colors that exist on the target canvas
///
/// Template colors outside this set are bucketed under [`ColorKey::Other`]
/// for filtering, and painted canvas pixels outside it never count as wrong
/// where the template is blank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowedColors {
    colors: BTreeSet<[u8; 3]>,
}

impl AllowedColors {
    /// Build from RGB triples
    pub fn new(colors: impl IntoIterator<Item = [u8; 3]>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    /// Whether a key is in the allowed set (`Other` never is)
    pub fn contains(&self, key: ColorKey) -> bool {
        match key {
            ColorKey::Known(rgb) => self.colors.contains(&rgb),
            ColorKey::Other => false,
        }
    }

    /// Map a key to its filter bucket
    pub fn bucket(&self, key: ColorKey) -> ColorKey {
        if self.contains(key) {
            key
        } else {
            ColorKey::Other
        }
    }

    /// Iterate over allowed colors as keys, in ascending order
    pub fn keys(&self) -> impl Iterator<Item = ColorKey> + '_ {
        self.colors.iter().map(|&rgb| ColorKey::Known(rgb))
    }

    /// Number of allowed colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no colors are allowed
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Color palette of a template, keyed by filter bucket
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorPalette {
    entries: BTreeMap<ColorKey, PaletteEntry>,
}

impl ColorPalette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one required template pixel under its bucket
    pub fn tally(&mut self, pixel: Pixel, allowed: &AllowedColors) {
        let bucket = allowed.bucket(pixel.color_key());
        self.entries.entry(bucket).or_default().count += 1;
    }

    /// Look up a palette entry
    pub fn get(&self, key: ColorKey) -> Option<&PaletteEntry> {
        self.entries.get(&key)
    }

    /// Whether every entry is enabled, allowing unfiltered drawing
    pub fn all_enabled(&self) -> bool {
        self.entries.values().all(|entry| entry.enabled)
    }

    /// Whether pixels in this bucket should be hidden by the overlay filter
    ///
    /// Known colors missing from the palette stay visible; a missing `Other`
    /// bucket is hidden.
    pub fn is_hidden(&self, bucket: ColorKey) -> bool {
        self.entries
            .get(&bucket)
            .map_or(bucket == ColorKey::Other, |entry| !entry.enabled)
    }

    /// Enable or disable one color; returns false if the color is absent
    pub fn set_enabled(&mut self, key: ColorKey, enabled: bool) -> bool {
        self.entries.get_mut(&key).is_some_and(|entry| {
            entry.enabled = enabled;
            true
        })
    }

    /// Enable or disable every color
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for entry in self.entries.values_mut() {
            entry.enabled = enabled;
        }
    }

    /// Apply persisted enable flags to colors that exist in this palette
    ///
    /// Counts always come from template content; flags for colors the
    /// template no longer contains are dropped.
    pub fn apply_flags(&mut self, flags: &BTreeMap<ColorKey, PaletteEntry>) {
        for (key, flag) in flags {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.enabled = flag.enabled;
            }
        }
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (ColorKey, &PaletteEntry)> + '_ {
        self.entries.iter().map(|(&key, entry)| (key, entry))
    }

    /// Snapshot of all entries for persistence
    pub fn to_map(&self) -> BTreeMap<ColorKey, PaletteEntry> {
        self.entries.clone()
    }

    /// Number of distinct buckets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
