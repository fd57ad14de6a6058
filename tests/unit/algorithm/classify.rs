//! Tests for pixel classification and snapshot sampling

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tilediff::analysis::tile_progress::TileProgress;
    use tilediff::algorithm::classify::{Classification, Snapshot, classify_fragment, classify_pixel};
    use tilediff::color::palette::AllowedColors;
    use tilediff::color::pixel::{ColorKey, Pixel};
    use tilediff::io::configuration::EngineConfig;
    use tilediff::spatial::address::TileAddress;
    use tilediff::spatial::chunker::{Chunker, GridChunker};

    const RED: Pixel = Pixel::new(255, 0, 0, 255);
    const GREEN: Pixel = Pixel::new(0, 255, 0, 255);
    const BLANK: Pixel = Pixel::new(0, 0, 0, 0);

    fn allowed() -> AllowedColors {
        AllowedColors::new([[255, 0, 0], [0, 255, 0]])
    }

    // Tests each template/canvas combination maps to its class
    // Verified by swapping the Pending and Wrong branches
    #[test]
    fn test_classify_pixel_cases() {
        let allowed = allowed();
        assert_eq!(
            classify_pixel(RED, RED, &allowed),
            Classification::Correct(ColorKey::rgb(255, 0, 0))
        );
        assert_eq!(
            classify_pixel(RED, GREEN, &allowed),
            Classification::Wrong(ColorKey::rgb(255, 0, 0))
        );
        assert_eq!(classify_pixel(RED, BLANK, &allowed), Classification::Pending);
        assert_eq!(
            classify_pixel(BLANK, GREEN, &allowed),
            Classification::Overpainted(ColorKey::rgb(0, 255, 0))
        );
        assert_eq!(classify_pixel(BLANK, BLANK, &allowed), Classification::Ignored);
    }

    // Tests foreign colors over blank cells and faint paint are ignored
    // Verified by counting any painted canvas pixel as overpaint
    #[test]
    fn test_classify_pixel_thresholds() {
        let allowed = allowed();
        let foreign = Pixel::new(1, 2, 3, 255);
        let faint = Pixel::new(0, 255, 0, 63);

        assert_eq!(classify_pixel(BLANK, foreign, &allowed), Classification::Ignored);
        assert_eq!(classify_pixel(BLANK, faint, &allowed), Classification::Ignored);
        assert_eq!(classify_pixel(RED, faint, &allowed), Classification::Pending);
        assert_eq!(
            classify_pixel(Pixel::new(255, 0, 0, 64), Pixel::new(255, 0, 0, 100), &allowed),
            Classification::Correct(ColorKey::rgb(255, 0, 0))
        );
    }

    // Tests the required and wrong predicates
    // Verified by treating Overpainted as required
    #[test]
    fn test_classification_predicates() {
        let key = ColorKey::rgb(1, 1, 1);
        assert!(Classification::Pending.is_required());
        assert!(Classification::Wrong(key).is_required());
        assert!(!Classification::Overpainted(key).is_required());
        assert!(Classification::Overpainted(key).is_wrong());
        assert!(!Classification::Correct(key).is_wrong());
        assert!(!Classification::Ignored.is_wrong());
    }

    // Tests snapshots only accept draw-size canvases
    // Verified by accepting native-size tiles
    #[test]
    fn test_snapshot_requires_draw_size() {
        let config = EngineConfig::new(10, 3).unwrap();
        assert!(Snapshot::capture(&RgbaImage::new(10, 10), &config).is_err());
        assert!(Snapshot::capture(&RgbaImage::new(30, 29), &config).is_err());

        let snapshot = Snapshot::capture(&RgbaImage::new(30, 30), &config).unwrap();
        assert!(snapshot.pixel(29, 29).is_some());
        assert!(snapshot.pixel(30, 0).is_none());
    }

    // Tests fragment classification samples centers at the fragment offset
    // and records wrong positions in template pixel space
    // Verified by sampling from the tile origin
    #[test]
    fn test_classify_fragment_positions() {
        let config = EngineConfig::new(10, 3).unwrap();
        let image = RgbaImage::from_pixel(2, 1, Rgba([255, 0, 0, 255]));
        let fragments = GridChunker::new(config)
            .chunk(&image, TileAddress::new(4, 2, 5, 7))
            .unwrap();
        let fragment = fragments.values().next().unwrap();

        // Canvas: logical (5, 7) red, logical (6, 7) green
        let mut canvas = RgbaImage::new(30, 30);
        canvas.put_pixel(16, 22, Rgba([255, 0, 0, 255]));
        canvas.put_pixel(19, 22, Rgba([0, 255, 0, 255]));
        let snapshot = Snapshot::capture(&canvas, &config).unwrap();

        let mut progress = TileProgress::new();
        classify_fragment(fragment, &snapshot, &allowed(), &config, &mut progress);

        assert_eq!(progress.total_pixel_count, 2);
        assert_eq!(progress.painted_pixel_count, 1);
        assert_eq!(progress.wrong_pixel_count, 1);
        assert_eq!(progress.wrong_pixel_positions, vec![TileAddress::new(4, 2, 6, 7)]);
    }
}
