//! Priority-ordered lookup of the template fragments covering a tile

use crate::spatial::address::TileCoords;
use crate::template::entity::{Template, TileFragment};

/// One template's contribution to a tile
#[derive(Clone, Copy, Debug)]
pub struct MatchedFragment<'a> {
    /// Template the fragment belongs to
    pub template: &'a Template,
    /// Fragment inside the requested tile
    pub fragment: &'a TileFragment,
}

/// Collect fragments for `coords` in draw order
///
/// Templates are stably sorted by ascending priority, so equal priorities
/// keep the order of `templates`. Each template contributes at most one
/// fragment. An empty result means there is nothing to draw.
pub fn fragments_for_tile(templates: &[Template], coords: TileCoords) -> Vec<MatchedFragment<'_>> {
    let mut ordered: Vec<&Template> = templates.iter().collect();
    ordered.sort_by_key(|template| template.priority());

    ordered
        .into_iter()
        .filter(|template| template.touches_tile(coords))
        .filter_map(|template| {
            template
                .fragment_for_tile(coords)
                .map(|fragment| MatchedFragment { template, fragment })
        })
        .collect()
}
