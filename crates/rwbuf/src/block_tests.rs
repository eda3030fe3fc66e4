// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_rejects_wrong_element_count() {
    crate::assert_err_contains!(Block::new((3, 2), vec![0.0f32; 5]), "(5,)");
}

#[test]
fn from_frames_is_row_major() {
    let block = Block::from_frames(&[[0i16, 0], [1, 1], [2, 4]]);
    assert_eq!(block.shape(), &Shape::new(3, 2));
    assert_eq!(block.as_slice(), &[0, 0, 1, 1, 2, 4]);
    assert_eq!(block.row(2), Some(&[2i16, 4][..]));
    assert_eq!(block.row(3), None);
    assert_eq!(block.column(1), vec![0, 1, 4]);
}

#[test]
fn empty_keeps_record_layout() {
    let block = Block::<f32>::empty(&Shape::with_trailing(10, 2, &[3]));
    assert!(block.is_empty());
    assert_eq!(block.shape().dims(), &[0, 2, 3]);
}

#[test]
fn flat_view_normalizes_to_one_column() {
    let data = [1.0f32, 2.0, 3.0];
    let view = BlockView::from(&data).normalized();
    assert_eq!(view.shape(), &Shape::new(3, 1));
}

#[test]
fn tail_takes_last_rows() -> anyhow::Result<()> {
    let data: Vec<i32> = (0..12).collect();
    let view = BlockView::new((6, 2), &data)?;
    let tail = view.tail(2);
    assert_eq!(tail.rows(), 2);
    assert_eq!(tail.as_slice(), &[8, 9, 10, 11]);
    assert_eq!(view.tail(100).rows(), 6);
    Ok(())
}

#[test]
fn zeros() {
    let block = Block::<u8>::zeros((4, 2));
    assert_eq!(block.as_slice(), &[0; 8]);
    assert_eq!(block.iter_rows().count(), 4);
}
