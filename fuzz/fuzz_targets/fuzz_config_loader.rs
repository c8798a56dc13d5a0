#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use pomotick::config::loader::{ConfigLoader, merge};
use pomotick::config::Overrides;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        // Parsing and layering must never panic, whatever the input
        if let Ok(file) = ConfigLoader::parse(yaml_str, Path::new("fuzz.yaml")) {
            let _ = merge(&file, &Overrides::default(), None);
        }
    }
});
