// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashSet;

use proptest::prelude::*;

use super::*;

#[yare::parameterized(
    inside         = { 0, 10, 100, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9] },
    to_the_edge    = { 7, 3, 10, vec![7, 8, 9] },
    wraps_forward  = { 5, 10, 12, vec![5, 6, 7, 8, 9, 10, 11, 0, 1, 2] },
    full_lap       = { 4, 6, 6, vec![4, 5, 0, 1, 2, 3] },
    backward       = { 5, -3, 10, vec![5, 4, 3] },
    wraps_backward = { 1, -4, 6, vec![1, 0, 5, 4] },
    backward_to_0  = { 2, -3, 6, vec![2, 1, 0] },
    zero_amount    = { 3, 0, 10, vec![] },
    zero_capacity  = { 0, 4, 0, vec![] },
    past_a_lap     = { 3, 12, 5, vec![3, 4, 0, 1, 2] },
    back_past_a_lap = { 0, -12, 5, vec![0, 4, 3, 2, 1] },
    back_full_lap  = { 4, -5, 5, vec![4, 3, 2, 1, 0] },
)]
fn segmented_positions(start: usize, amount: isize, capacity: usize, expected: Vec<usize>) {
    assert_eq!(segmented(start, amount, capacity).to_vec(), expected);
    assert_eq!(reference(start, amount, capacity).to_vec(), expected);
}

#[test]
fn wrapped_flags() {
    assert!(!segmented(0, 10, 100).is_wrapped());
    assert!(segmented(5, 10, 12).is_wrapped());
    assert!(segmented(1, -4, 6).is_wrapped());
    assert!(!segmented(1, -2, 6).is_wrapped());
}

#[test]
fn segments_of_wrapped_range() {
    let range = segmented(500, 1000, 1000);
    let segments: Vec<Segment> = range.segments().collect();
    assert_eq!(segments, vec![Segment::ascending(500, 500), Segment::ascending(0, 500)]);
    assert_eq!(range.len(), 1000);
}

#[test]
fn reference_yields_one_row_segments() {
    let range = reference(2, 3, 4);
    assert_eq!(range.segments().count(), 3);
    assert_eq!(range.to_vec(), vec![2, 3, 0]);
}

#[test]
fn empty_range_has_no_segments() {
    assert_eq!(IndexRange::Empty.segments().count(), 0);
    assert!(IndexRange::default().is_empty());
}

fn window() -> impl Strategy<Value = (usize, isize, usize)> {
    (1usize..64).prop_flat_map(|capacity| {
        let cap = capacity as isize;
        (0..capacity, -3 * cap..=3 * cap, Just(capacity))
    })
}

proptest! {
    #[test]
    fn strategies_agree((start, amount, capacity) in window()) {
        prop_assert_eq!(segmented(start, amount, capacity).to_vec(), reference(start, amount, capacity).to_vec());
    }

    #[test]
    fn positions_in_bounds_and_unique((start, amount, capacity) in window()) {
        let rows = map(start, amount, capacity).to_vec();
        prop_assert_eq!(rows.len(), amount.unsigned_abs().min(capacity));
        prop_assert!(rows.iter().all(|&row| row < capacity));
        let unique: HashSet<usize> = rows.iter().copied().collect();
        prop_assert_eq!(unique.len(), rows.len());
    }

    #[test]
    fn rewrapping_recovers_offsets((start, amount, capacity) in window()) {
        let step = amount.signum();
        for (i, row) in map(start, amount, capacity).positions().enumerate() {
            let logical = start as isize + step * i as isize;
            prop_assert_eq!(row as isize, logical.rem_euclid(capacity as isize));
        }
    }
}
