// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::index::IndexRange;
use crate::sample::Sample;
use crate::shape::Shape;

/// Contiguous row-major backing store for a ring.
///
/// Knows nothing about cursors; callers hand it an [`IndexRange`] of row
/// positions to copy in, copy out, or zero.
#[derive(Debug, Clone)]
pub(crate) struct Storage<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Sample> Storage<T> {
    pub fn zeroed(shape: Shape) -> Self {
        Self { data: vec![T::default(); shape.element_count()], shape }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Resize to `shape`, keeping the flat element prefix that still fits and
    /// zero-padding the rest.
    pub fn resize(&mut self, shape: Shape) {
        self.data.resize(shape.element_count(), T::default());
        self.shape = shape;
    }

    /// Reinterpret the same elements under a new shape. Ignored if the
    /// element counts differ.
    pub fn reinterpret(&mut self, shape: Shape) {
        if shape.element_count() == self.data.len() {
            self.shape = shape;
        }
    }

    pub fn zero_all(&mut self) {
        self.data.fill(T::default());
    }

    /// Copy the rows at `range` out, in range order.
    pub fn gather(&self, range: &IndexRange) -> Vec<T> {
        let width = self.shape.record_len();
        let mut out = Vec::with_capacity(range.len() * width);
        for segment in range.segments() {
            if segment.is_ascending() {
                let span = segment.first() * width..(segment.first() + segment.len()) * width;
                out.extend_from_slice(&self.data[span]);
            } else {
                for row in segment.positions() {
                    out.extend_from_slice(&self.data[row * width..(row + 1) * width]);
                }
            }
        }
        out
    }

    /// Copy `rows` into the positions at `range`. `rows` must hold exactly
    /// `range.len()` records.
    pub fn scatter(&mut self, range: &IndexRange, rows: &[T]) {
        let width = self.shape.record_len();
        let mut offset = 0;
        for segment in range.segments() {
            if segment.is_ascending() {
                let count = segment.len() * width;
                let dst = segment.first() * width;
                self.data[dst..dst + count].copy_from_slice(&rows[offset..offset + count]);
                offset += count;
            } else {
                for row in segment.positions() {
                    self.data[row * width..(row + 1) * width]
                        .copy_from_slice(&rows[offset..offset + width]);
                    offset += width;
                }
            }
        }
    }

    pub fn zero(&mut self, range: &IndexRange) {
        let width = self.shape.record_len();
        for segment in range.segments() {
            for row in segment.positions() {
                self.data[row * width..(row + 1) * width].fill(T::default());
            }
        }
    }

    /// Element-wise conversion into another sample type.
    pub fn cast<U: Sample>(&self) -> Storage<U> {
        Storage { data: self.data.iter().map(|v| v.cast()).collect(), shape: self.shape.clone() }
    }
}
