//! Tests for palette bucketing and enable flags

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use tilediff::color::palette::{AllowedColors, ColorPalette, PaletteEntry};
    use tilediff::color::pixel::{ColorKey, Pixel};

    fn allowed() -> AllowedColors {
        AllowedColors::new([[255, 0, 0], [0, 0, 255]])
    }

    // Tests colors outside the allowed set land in the Other bucket
    // Verified by tallying raw color keys
    #[test]
    fn test_tally_buckets_unknown_colors() {
        let allowed = allowed();
        let mut palette = ColorPalette::new();
        palette.tally(Pixel::new(255, 0, 0, 255), &allowed);
        palette.tally(Pixel::new(255, 0, 0, 255), &allowed);
        palette.tally(Pixel::new(1, 2, 3, 255), &allowed);

        assert_eq!(palette.get(ColorKey::rgb(255, 0, 0)).map(|e| e.count), Some(2));
        assert_eq!(palette.get(ColorKey::Other).map(|e| e.count), Some(1));
        assert!(palette.get(ColorKey::rgb(1, 2, 3)).is_none());
        assert_eq!(palette.len(), 2);
    }

    // Tests allowed set membership and bucket mapping
    // Verified by letting Other count as allowed
    #[test]
    fn test_allowed_colors_bucket() {
        let allowed = allowed();
        assert!(allowed.contains(ColorKey::rgb(0, 0, 255)));
        assert!(!allowed.contains(ColorKey::Other));
        assert_eq!(allowed.bucket(ColorKey::rgb(9, 9, 9)), ColorKey::Other);
        assert_eq!(allowed.bucket(ColorKey::rgb(255, 0, 0)), ColorKey::rgb(255, 0, 0));
        assert_eq!(allowed.len(), 2);
    }

    // Tests hidden-bucket rules: disabled entries hide, missing Other hides,
    // missing known colors stay visible
    // Verified by treating every missing bucket as visible
    #[test]
    fn test_is_hidden_rules() {
        let allowed = allowed();
        let mut palette = ColorPalette::new();
        palette.tally(Pixel::new(255, 0, 0, 255), &allowed);
        palette.tally(Pixel::new(0, 0, 255, 255), &allowed);

        assert!(palette.all_enabled());
        assert!(!palette.is_hidden(ColorKey::rgb(255, 0, 0)));
        assert!(palette.is_hidden(ColorKey::Other));
        assert!(!palette.is_hidden(ColorKey::rgb(7, 7, 7)));

        assert!(palette.set_enabled(ColorKey::rgb(255, 0, 0), false));
        assert!(!palette.all_enabled());
        assert!(palette.is_hidden(ColorKey::rgb(255, 0, 0)));
        assert!(!palette.is_hidden(ColorKey::rgb(0, 0, 255)));
    }

    // Tests toggling a color that is not in the palette reports failure
    // Verified by inserting missing entries on toggle
    #[test]
    fn test_set_enabled_missing_color() {
        let mut palette = ColorPalette::new();
        assert!(!palette.set_enabled(ColorKey::rgb(1, 1, 1), false));
        assert!(palette.is_empty());
    }

    // Tests persisted flags override enable state but not counts
    // Verified by copying persisted counts
    #[test]
    fn test_apply_flags() {
        let allowed = allowed();
        let mut palette = ColorPalette::new();
        palette.tally(Pixel::new(255, 0, 0, 255), &allowed);

        let mut flags = BTreeMap::new();
        flags.insert(
            ColorKey::rgb(255, 0, 0),
            PaletteEntry {
                count: 99,
                enabled: false,
            },
        );
        flags.insert(
            ColorKey::rgb(0, 0, 255),
            PaletteEntry {
                count: 5,
                enabled: false,
            },
        );
        palette.apply_flags(&flags);

        let entry = palette.get(ColorKey::rgb(255, 0, 0)).copied();
        assert_eq!(
            entry,
            Some(PaletteEntry {
                count: 1,
                enabled: false
            })
        );
        assert!(palette.get(ColorKey::rgb(0, 0, 255)).is_none());

        palette.set_all_enabled(true);
        assert!(palette.all_enabled());
    }
}
