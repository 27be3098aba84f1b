//! Fuzz target for the measurement loader.
//!
//! The loader must never panic on malformed input: every failure is a
//! `TimeblocksError`, and every success satisfies `end >= start`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use timeblocks::{LoaderConfig, MeasurementStore};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(store) = MeasurementStore::from_bytes(data, LoaderConfig::default()) {
        for m in store.measurements() {
            assert!(m.end >= m.start);
        }
    }
});
