//! Property-based tests for block segmentation.
//!
//! These tests use proptest to generate random measurement sets and verify
//! that segmentation keeps its invariants for every input and threshold.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p timeblocks --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p timeblocks --test property_tests
//! ```

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use timeblocks::segment::gap;
use timeblocks::{segment, Block, GapBaseline, Measurement, Segmenter, SegmenterConfig, Threshold};

// =============================================================================
// Test Strategies
// =============================================================================

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Measurements for one specimen: start within ~10 days, duration up to 6h.
/// Coarse start steps make duplicate starts and touching intervals common.
fn measurements() -> impl Strategy<Value = Vec<Measurement>> {
    prop::collection::vec((0i64..2_000, 0i64..60), 0..60).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (start_step, duration_step))| {
                let start = base() + Duration::minutes(start_step * 7);
                let end = start + Duration::minutes(duration_step * 6);
                Measurement::new(i as i64, "FOF2-1", start, end)
            })
            .collect()
    })
}

fn threshold() -> impl Strategy<Value = Threshold> {
    prop_oneof![
        Just(Threshold::zero()),
        (0i64..600).prop_map(|m| Threshold::from_minutes(m).unwrap()),
        (0i64..48).prop_map(|h| Threshold::from_hours(h).unwrap()),
    ]
}

fn sizes(blocks: &[Block]) -> Vec<usize> {
    blocks.iter().map(Block::len).collect()
}

fn flatten(blocks: &[Block]) -> Vec<Measurement> {
    blocks.iter().flat_map(|b| b.members.iter().cloned()).collect()
}

// =============================================================================
// Partition Properties
// =============================================================================

proptest! {
    /// Every measurement lands in exactly one block.
    #[test]
    fn segmentation_is_a_partition(input in measurements(), t in threshold()) {
        let blocks = segment(&input, t);
        let ids: Vec<i64> = blocks.iter().flat_map(|b| b.ids()).collect();
        let unique: HashSet<i64> = ids.iter().copied().collect();

        prop_assert_eq!(ids.len(), input.len());
        prop_assert_eq!(unique.len(), input.len());
        prop_assert!(input.iter().all(|m| unique.contains(&m.id)));
    }

    /// Blocks are never empty and indices run 1, 2, 3, ...
    #[test]
    fn block_indices_are_contiguous(input in measurements(), t in threshold()) {
        let blocks = segment(&input, t);
        for (i, block) in blocks.iter().enumerate() {
            prop_assert_eq!(block.block_index, i + 1);
            prop_assert!(!block.is_empty());
        }
        prop_assert_eq!(blocks.is_empty(), input.is_empty());
    }

    /// Members are in start order and ranges cover them.
    #[test]
    fn members_are_time_ordered(input in measurements(), t in threshold()) {
        for block in segment(&input, t) {
            for pair in block.members.windows(2) {
                prop_assert!(pair[0].start <= pair[1].start);
            }
            prop_assert!(block.members.iter().all(|m| m.start >= block.start_range));
            prop_assert!(block.members.iter().all(|m| m.end <= block.end_range));
        }
    }
}

// =============================================================================
// Boundary Properties
// =============================================================================

proptest! {
    /// Consecutive blocks are separated by more than the threshold.
    #[test]
    fn boundaries_exceed_threshold(input in measurements(), t in threshold()) {
        let blocks = segment(&input, t);
        for pair in blocks.windows(2) {
            let last = pair[0].last().unwrap();
            let first = pair[1].first().unwrap();
            prop_assert!(gap(last, first) > t.as_duration());
        }
    }

    /// Inside a block no consecutive gap exceeds the threshold.
    #[test]
    fn gaps_within_blocks_within_threshold(input in measurements(), t in threshold()) {
        for block in segment(&input, t) {
            for pair in block.members.windows(2) {
                prop_assert!(gap(&pair[0], &pair[1]) <= t.as_duration());
            }
        }
    }

    /// A single measurement is always one block of one.
    #[test]
    fn single_measurement_single_block(start in 0i64..10_000, dur in 0i64..600, t in threshold()) {
        let s = base() + Duration::minutes(start);
        let input = vec![Measurement::new(1, "FOF2-1", s, s + Duration::minutes(dur))];
        prop_assert_eq!(sizes(&segment(&input, t)), vec![1]);
    }
}

// =============================================================================
// Monotonicity, Determinism, Idempotence
// =============================================================================

proptest! {
    /// Raising the threshold never produces more blocks.
    #[test]
    fn larger_threshold_never_more_blocks(input in measurements(), a in 0i64..600, b in 0i64..600) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let few = segment(&input, Threshold::from_minutes(hi).unwrap()).len();
        let many = segment(&input, Threshold::from_minutes(lo).unwrap()).len();
        prop_assert!(few <= many);
    }

    /// Input order does not change the result.
    #[test]
    fn order_independent(input in measurements(), t in threshold()) {
        let mut reversed = input.clone();
        reversed.reverse();
        prop_assert_eq!(segment(&input, t), segment(&reversed, t));
    }

    /// Segmenting flattened output again reproduces the same boundaries.
    #[test]
    fn resegmenting_is_idempotent(input in measurements(), t in threshold()) {
        let first = segment(&input, t);
        let second = segment(&flatten(&first), t);
        prop_assert_eq!(first, second);
    }

    /// The running-max baseline never splits more often than previous-end.
    #[test]
    fn running_max_never_more_blocks(input in measurements(), t in threshold()) {
        let running = Segmenter::with_config(SegmenterConfig {
            baseline: GapBaseline::RunningMaxEnd,
        });
        let previous = Segmenter::new();
        prop_assert!(running.segment(&input, t).len() <= previous.segment(&input, t).len());
    }
}
