//! Tests for logger setup

#[cfg(test)]
mod tests {
    use tilediff::io::configuration::{DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER};
    use tilediff::io::logging::{default_filter, init};

    // Tests the verbose flag selects the debug filter
    // Verified by ignoring the flag
    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), DEFAULT_LOG_FILTER);
        assert_eq!(default_filter(true), VERBOSE_LOG_FILTER);
    }

    // Tests repeated initialization does not panic
    // Verified by calling init instead of try_init
    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
        log::info!("logger installed");
    }
}
