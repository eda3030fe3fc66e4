// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row-major sample blocks moved in and out of buffers.
//!
//! [`BlockView`] is what writes accept: it borrows caller data and may be
//! rank-1 (no column dimension). [`Block`] is what reads return: an owned,
//! detached copy that never aliases buffer storage.

use crate::error::BufferError;
use crate::sample::Sample;
use crate::shape::Shape;

/// Owned block of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Sample> Block<T> {
    /// Wrap `data` as a block of the given shape.
    pub fn new(shape: impl Into<Shape>, data: Vec<T>) -> Result<Self, BufferError> {
        let shape = shape.into();
        if shape.element_count() != data.len() {
            return Err(BufferError::ShapeMismatch { expected: shape, actual: Shape::flat(data.len()) });
        }
        Ok(Self { data, shape })
    }

    /// Zero-filled block.
    pub fn zeros(shape: impl Into<Shape>) -> Self {
        let shape = shape.into();
        Self { data: vec![T::default(); shape.element_count()], shape }
    }

    /// Zero-row block with the given record layout.
    pub fn empty(record: &Shape) -> Self {
        Self { data: Vec::new(), shape: record.with_rows(0) }
    }

    /// Build a `(rows, C)` block from fixed-width frames.
    pub fn from_frames<const C: usize>(frames: &[[T; C]]) -> Self {
        let data = frames.iter().flat_map(|frame| frame.iter().copied()).collect();
        Self { data, shape: Shape::new(frames.len(), C) }
    }

    pub(crate) fn from_parts(shape: Shape, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.element_count(), data.len());
        Self { data, shape }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn columns(&self) -> usize {
        self.shape.columns()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn row(&self, index: usize) -> Option<&[T]> {
        let width = self.shape.record_len();
        self.data.get(index * width..(index + 1) * width)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.shape.record_len().max(1))
    }

    /// Column `index` of every row, for single-channel inspection.
    pub fn column(&self, index: usize) -> Vec<T> {
        self.iter_rows().filter_map(|row| row.get(index).copied()).collect()
    }

    pub fn view(&self) -> BlockView<'_, T> {
        BlockView { data: &self.data, shape: self.shape.clone() }
    }
}

/// Borrowed block of samples.
#[derive(Debug, Clone)]
pub struct BlockView<'a, T> {
    data: &'a [T],
    shape: Shape,
}

impl<'a, T: Sample> BlockView<'a, T> {
    pub fn new(shape: impl Into<Shape>, data: &'a [T]) -> Result<Self, BufferError> {
        let shape = shape.into();
        if shape.element_count() != data.len() {
            return Err(BufferError::ShapeMismatch { expected: shape, actual: Shape::flat(data.len()) });
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Reshape a rank-1 view to a single column.
    pub fn normalized(self) -> Self {
        Self { shape: self.shape.normalized(), data: self.data }
    }

    /// The last `rows` rows (all of them if the view is shorter).
    pub fn tail(&self, rows: usize) -> Self {
        let keep = rows.min(self.rows());
        let skip = (self.rows() - keep) * self.shape.record_len();
        Self { data: &self.data[skip..], shape: self.shape.with_rows(keep) }
    }

    pub fn to_block(&self) -> Block<T> {
        Block { data: self.data.to_vec(), shape: self.shape.clone() }
    }
}

impl<'a, T: Sample> From<&'a [T]> for BlockView<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self { data, shape: Shape::flat(data.len()) }
    }
}

impl<'a, T: Sample, const N: usize> From<&'a [T; N]> for BlockView<'a, T> {
    fn from(data: &'a [T; N]) -> Self {
        Self { data, shape: Shape::flat(N) }
    }
}

impl<'a, T: Sample> From<&'a Vec<T>> for BlockView<'a, T> {
    fn from(data: &'a Vec<T>) -> Self {
        Self { data, shape: Shape::flat(data.len()) }
    }
}

impl<'a, T: Sample> From<&'a Block<T>> for BlockView<'a, T> {
    fn from(block: &'a Block<T>) -> Self {
        block.view()
    }
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
