//! Fuzz target for timestamp parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use timeblocks::input::parse_timestamp;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_timestamp(text);
    }
});
