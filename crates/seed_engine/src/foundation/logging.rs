//! Logging utilities
//!
//! The crate logs through the `log` facade. Binaries call one of the
//! initializers below once at startup; `RUST_LOG` still wins when set.

pub use log::{debug, error, info, trace, warn};

/// Initialize logging from `RUST_LOG`, defaulting to `info`
pub fn init() {
    init_with_level("info");
}

/// Initialize logging with a default filter such as `"debug"` or
/// `"seed_engine=trace"`
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());

    let result = env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .try_init();

    if result.is_ok() {
        log::debug!("Logging initialized with filter '{}'", filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_ignored() {
        init_with_level("warn");
        init_with_level("trace");
        init();
    }
}
