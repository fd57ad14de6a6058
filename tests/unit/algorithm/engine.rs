//! Tests for tile diffing and compositing

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tilediff::algorithm::classify::ReferencePalette;
    use tilediff::algorithm::engine::{DiffEngine, composite_over};
    use tilediff::io::configuration::EngineConfig;
    use std::collections::BTreeMap;
    use tilediff::spatial::address::{TileAddress, TileCoords};
    use tilediff::spatial::chunker::GridChunker;
    use tilediff::template::entity::{Template, TemplateMetadata, TileFragment};
    use tilediff::template::store::TemplateStore;

    fn engine() -> DiffEngine {
        DiffEngine::new(EngineConfig::new(10, 3).unwrap())
    }

    fn store_with(image: &RgbaImage, origin: [f64; 4], priority: i64) -> TemplateStore {
        let mut store = TemplateStore::new();
        store
            .add_template(
                &GridChunker::new(engine().config()),
                image,
                origin,
                TemplateMetadata::new("t", priority, "a"),
            )
            .unwrap();
        store
    }

    // Tests upscaling repeats each native pixel over its block
    // Verified by sampling only block centers
    #[test]
    fn test_upscale_nearest() {
        let mut tile = RgbaImage::new(2, 1);
        tile.put_pixel(1, 0, Rgba([9, 8, 7, 255]));
        let upscaled = engine().upscale(&tile);

        assert_eq!(upscaled.dimensions(), (6, 3));
        assert_eq!(*upscaled.get_pixel(3, 0), Rgba([9, 8, 7, 255]));
        assert_eq!(*upscaled.get_pixel(5, 2), Rgba([9, 8, 7, 255]));
        assert_eq!(upscaled.get_pixel(2, 2).0[3], 0);
    }

    // Tests compositing skips transparent pixels, replaces opaque ones and
    // clips at the canvas edge
    // Verified by blending opaque pixels
    #[test]
    fn test_composite_over() {
        let mut canvas = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 255, 255]));
        let mut top = RgbaImage::new(2, 2);
        top.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        top.put_pixel(1, 1, Rgba([0, 255, 0, 255]));

        composite_over(&mut canvas, &top, 2, 2);
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([255, 0, 0, 255]));

        composite_over(&mut canvas, &top, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([0, 255, 0, 255]));
    }

    // Tests tiles without templates pass through untouched
    // Verified by upscaling every tile
    #[test]
    fn test_no_templates_passthrough() {
        let store = store_with(&RgbaImage::from_pixel(1, 1, Rgba([1, 1, 1, 255])), [5.0, 5.0, 0.0, 0.0], 0);
        let tile = RgbaImage::from_pixel(10, 10, Rgba([3, 3, 3, 255]));

        let outcome = engine().process_tile(&store, TileCoords::new(0, 0), &tile);
        assert_eq!(outcome.composite, tile);
        assert!(outcome.progress.is_none());
    }

    // Tests a wrong-sized tile still renders but yields no statistics
    // Verified by classifying against a mis-sized snapshot
    #[test]
    fn test_mis_sized_tile_renders_without_progress() {
        let store = store_with(&RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255])), [0.0, 0.0, 0.0, 0.0], 0);
        let tile = RgbaImage::new(4, 4);

        let outcome = engine().process_tile(&store, TileCoords::new(0, 0), &tile);
        assert!(outcome.progress.is_none());
        assert_eq!(outcome.composite.dimensions(), (12, 12));
        assert_eq!(*outcome.composite.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }

    // Tests later fragments draw over earlier ones and statistics use the
    // canvas as it was before any overlay
    // Verified by classifying against the partially composited canvas
    #[test]
    fn test_diff_layers_and_snapshot_order() {
        let chunker = GridChunker::new(engine().config());
        let mut store = TemplateStore::new();
        store
            .add_template(
                &chunker,
                &RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255])),
                [0.0, 0.0, 0.0, 0.0],
                TemplateMetadata::new("bottom", 0, "a"),
            )
            .unwrap();
        store
            .add_template(
                &chunker,
                &RgbaImage::from_pixel(1, 1, Rgba([0, 255, 0, 255])),
                [0.0, 0.0, 0.0, 0.0],
                TemplateMetadata::new("top", 1, "b"),
            )
            .unwrap();

        let coords = TileCoords::new(0, 0);
        let fragments = store.fragments_for_tile(coords);
        let reference = ReferencePalette::from_template(fragments.first().unwrap().template);
        let canvas = engine().upscale(&RgbaImage::new(10, 10));

        let outcome = engine().diff(canvas, coords, &fragments, &reference);
        assert_eq!(*outcome.composite.get_pixel(1, 1), Rgba([0, 255, 0, 255]));

        let progress = outcome.progress.unwrap();
        assert_eq!(progress.total_pixel_count, 2);
        assert_eq!(progress.painted_pixel_count, 0);
        assert_eq!(progress.wrong_pixel_count, 0);
    }

    // Tests a fragment offset beyond draw space is neither sampled nor drawn
    // Verified by multiplying the offset without overflow checks
    #[test]
    fn test_far_offset_fragment_is_skipped() {
        let address = TileAddress::new(0, 0, 2_000_000_000, 0);
        let mut fragments = BTreeMap::new();
        fragments.insert(
            address,
            TileFragment::new(address, RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]))),
        );
        let mut store = TemplateStore::new();
        store.insert(Template::from_fragments(
            TemplateMetadata::new("far", 0, "a"),
            fragments,
            &engine().config(),
        ));
        let tile = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));

        let outcome = engine().process_tile(&store, TileCoords::new(0, 0), &tile);
        assert_eq!(outcome.composite, engine().upscale(&tile));
        assert_eq!(outcome.progress.map(|p| p.total_pixel_count), Some(0));
    }

    // Tests compositing at the edge of the coordinate range clips instead of wrapping
    // Verified by adding offsets without overflow checks
    #[test]
    fn test_composite_at_coordinate_limit() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        let top = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let before = canvas.clone();

        composite_over(&mut canvas, &top, u32::MAX, u32::MAX);
        assert_eq!(canvas, before);
    }
}
