//! Fuzz target for segmentation invariants on arbitrary intervals.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use timeblocks::segment::gap;
use timeblocks::{segment, Measurement, Threshold};

#[derive(Debug, Arbitrary)]
struct Input {
    threshold_minutes: u16,
    intervals: Vec<(u32, u16)>,
}

fuzz_target!(|input: Input| {
    if input.intervals.len() > 2_000 {
        return;
    }

    let Some(base) = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return;
    };
    let measurements: Vec<Measurement> = input
        .intervals
        .iter()
        .enumerate()
        .map(|(i, &(start, len))| {
            let start = base + chrono::Duration::seconds(i64::from(start));
            let end = start + chrono::Duration::seconds(i64::from(len));
            Measurement::new(i as i64, "fuzz", start, end)
        })
        .collect();

    let Ok(threshold) = Threshold::from_minutes(i64::from(input.threshold_minutes)) else {
        return;
    };
    let blocks = segment(&measurements, threshold);

    let total: usize = blocks.iter().map(|b| b.len()).sum();
    assert_eq!(total, measurements.len());
    for pair in blocks.windows(2) {
        let (Some(last), Some(first)) = (pair[0].last(), pair[1].first()) else {
            continue;
        };
        assert!(gap(last, first) > threshold.as_duration());
    }
});
