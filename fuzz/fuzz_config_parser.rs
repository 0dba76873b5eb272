//! Fuzz target for the grading configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Feeds arbitrary text to `GraderConfig::parse()`; parsing and validation
//! must reject bad input with an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = crossgrade_config::GraderConfig::parse(s) {
            // Anything that validates must survive a round trip.
            let text = toml::to_string(&config).expect("valid config serializes");
            crossgrade_config::GraderConfig::parse(&text).expect("serialized config re-parses");
        }
    }
});
