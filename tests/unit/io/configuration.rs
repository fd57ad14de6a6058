//! Tests for engine geometry validation

#[cfg(test)]
mod tests {
    use tilediff::TileDiffError;
    use tilediff::io::configuration::{DEFAULT_DRAW_MULTIPLIER, DEFAULT_TILE_SIZE, EngineConfig};

    // Tests default geometry matches the published constants
    // Verified by changing the default multiplier
    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(config.draw_multiplier, DEFAULT_DRAW_MULTIPLIER);
        assert_eq!(config.draw_size(), 3000);
        assert_eq!(config.center_offset(), 1);
    }

    // Tests zero sizes, even multipliers and overflowing draw sizes are rejected
    // Verified by accepting even multipliers
    #[test]
    fn test_validation() {
        for (tile_size, multiplier) in [(0, 3), (10, 0), (10, 2), (u32::MAX, 3)] {
            assert!(matches!(
                EngineConfig::new(tile_size, multiplier),
                Err(TileDiffError::InvalidParameter { .. })
            ));
        }
        assert!(EngineConfig::new(1, 1).is_ok());
    }

    // Tests geometry derived from a wider multiplier
    // Verified by using the block corner as center
    #[test]
    fn test_wide_multiplier_geometry() {
        let config = EngineConfig::new(10, 5).unwrap();
        assert_eq!(config.center_offset(), 2);
        assert_eq!(config.draw_size(), 50);
        assert_eq!(EngineConfig::new(7, 1).unwrap().center_offset(), 0);
    }
}
