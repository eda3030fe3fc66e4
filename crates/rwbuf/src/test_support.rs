// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: sample builders and assertion helpers.

use crate::block::Block;

/// Single-channel ramp `0.0, 1.0, ..., n - 1`.
pub fn ramp(n: usize) -> Vec<f32> {
    (0..n).map(|i| i as f32).collect()
}

/// Two-channel block whose row `i` is `[i, i * i]`.
pub fn frames(n: usize) -> Block<f32> {
    let rows: Vec<[f32; 2]> = (0..n).map(|i| [i as f32, (i * i) as f32]).collect();
    Block::from_frames(&rows)
}

/// Assert that an expression evaluates to `Err` whose Display output
/// contains the given substring.
#[macro_export]
macro_rules! assert_err_contains {
    ($expr:expr, $substr:expr) => {{
        let result = $expr;
        let err = result.expect_err(concat!("expected Err for: ", stringify!($expr)));
        let msg = err.to_string();
        assert!(msg.contains($substr), "expected error containing {:?}, got: {msg:?}", $substr);
    }};
}
