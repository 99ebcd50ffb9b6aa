//! Log targets and logger setup
//!
//! Components log under a fixed target so `RUST_LOG` can filter them, e.g.
//! `RUST_LOG=glossary::rest=debug`.

use log::LevelFilter;

/// HTTP transport and catalog client
pub const REST: &str = "glossary::rest";
/// Command orchestration
pub const CLI: &str = "glossary::cli";

/// Install the global logger
///
/// Defaults to `info` (`debug` with `verbose`); `RUST_LOG` overrides both.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        // Prefix match: covers the fixed targets and `glossary_uploader::*`
        .filter_module("glossary", default_level)
        .format_timestamp_secs()
        .parse_default_env();

    // A second init (tests) keeps the first logger
    let _ = builder.try_init();
}
