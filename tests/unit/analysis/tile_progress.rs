//! Tests for per-tile statistics

#[cfg(test)]
mod tests {
    use tilediff::algorithm::classify::Classification;
    use tilediff::analysis::tile_progress::TileProgress;
    use tilediff::color::pixel::ColorKey;
    use tilediff::spatial::address::TileAddress;

    // Tests each classification updates the matching counters
    // Verified by counting overpaint toward the required total
    #[test]
    fn test_record_counts() {
        let red = ColorKey::rgb(255, 0, 0);
        let green = ColorKey::rgb(0, 255, 0);
        let mut progress = TileProgress::new();

        progress.record(Classification::Correct(red), TileAddress::new(0, 0, 0, 0));
        progress.record(Classification::Correct(red), TileAddress::new(0, 0, 1, 0));
        progress.record(Classification::Wrong(red), TileAddress::new(0, 0, 2, 0));
        progress.record(Classification::Overpainted(green), TileAddress::new(0, 0, 3, 0));
        progress.record(Classification::Pending, TileAddress::new(0, 0, 4, 0));
        progress.record(Classification::Ignored, TileAddress::new(0, 0, 5, 0));

        assert_eq!(progress.total_pixel_count, 4);
        assert_eq!(progress.painted_pixel_count, 2);
        assert_eq!(progress.wrong_pixel_count, 2);
        assert_eq!(progress.painted_color_counts.get(&red), Some(&2));
        assert_eq!(progress.wrong_color_counts.get(&red), Some(&1));
        assert_eq!(progress.wrong_color_counts.get(&green), Some(&1));
        assert_eq!(
            progress.wrong_pixel_positions,
            vec![TileAddress::new(0, 0, 2, 0), TileAddress::new(0, 0, 3, 0)]
        );
    }

    // Tests the JSON form uses camelCase names and string keys
    // Verified by serializing snake_case fields
    #[test]
    fn test_json_shape() {
        let mut progress = TileProgress::new();
        progress.record(
            Classification::Wrong(ColorKey::rgb(1, 2, 3)),
            TileAddress::new(1, 2, 3, 4),
        );

        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["totalPixelCount"], 1);
        assert_eq!(json["wrongColorCounts"]["1,2,3"], 1);
        assert_eq!(json["wrongPixelPositions"][0], "0001,0002,003,004");

        let back: TileProgress = serde_json::from_value(json).unwrap();
        assert_eq!(back, progress);
    }
}
