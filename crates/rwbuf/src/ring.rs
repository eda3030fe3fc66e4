// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tracing::debug;

use crate::block::{Block, BlockView};
use crate::cursor::{CursorState, LengthMode};
use crate::error::BufferError;
use crate::index::{self, IndexRange};
use crate::sample::Sample;
use crate::shape::Shape;
use crate::storage::Storage;

/// Circular buffer over a `(capacity, columns, ...)` block of samples.
///
/// A producer appends rows at `end`, a consumer takes rows from `start`.
/// Every read returns an owned copy. Strict operations (`error = true`) fail
/// without touching the buffer; lenient ones overwrite the oldest rows or
/// clamp as documented per method.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    storage: Storage<T>,
    cursor: CursorState,
}

impl<T: Sample> RingBuffer<T> {
    /// Create an empty buffer of `capacity` rows by `columns` (at least one).
    pub fn new(capacity: usize, columns: usize) -> Self {
        Self::with_shape(Shape::new(capacity, columns))
    }

    /// Create an empty buffer from a full shape. Extra trailing dimensions
    /// become part of each row.
    pub fn with_shape(shape: impl Into<Shape>) -> Self {
        Self::with_mode(shape.into(), LengthMode::Synced)
    }

    pub(crate) fn with_mode(shape: Shape, mode: LengthMode) -> Self {
        let shape = shape.normalized();
        let cursor = CursorState::with_mode(shape.rows(), mode);
        Self { storage: Storage::zeroed(shape), cursor }
    }

    // -- Metadata -----------------------------------------------------------

    /// Number of buffered rows.
    pub fn len(&self) -> usize {
        self.cursor.buffered()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signed buffered length (only a framing buffer lets it go negative).
    pub fn length(&self) -> isize {
        self.cursor.length()
    }

    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    pub fn columns(&self) -> usize {
        self.storage.shape().columns()
    }

    pub fn shape(&self) -> &Shape {
        self.storage.shape()
    }

    pub fn start(&self) -> usize {
        self.cursor.start()
    }

    pub fn end(&self) -> usize {
        self.cursor.end()
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn get_available_space(&self) -> usize {
        self.cursor.available_space()
    }

    /// Storage rows covered by `amount` rows from `start` at this capacity.
    pub fn get_indexes(&self, start: usize, amount: isize) -> IndexRange {
        index::map(start, amount, self.capacity())
    }

    /// Raw storage contents, row-major, regardless of cursors.
    pub fn raw(&self) -> &[T] {
        self.storage.as_slice()
    }

    // -- Cursor control -----------------------------------------------------

    pub fn clear(&mut self) {
        self.cursor.clear();
    }

    /// Move the start cursor without copying data. See
    /// [`CursorState::move_start`].
    pub fn move_start(
        &mut self,
        amount: isize,
        error: bool,
        limit_amount: bool,
    ) -> Result<(), BufferError> {
        self.cursor.move_start(amount, error, limit_amount)
    }

    /// Move the end cursor without copying data. See
    /// [`CursorState::move_end`].
    pub fn move_end(
        &mut self,
        amount: isize,
        error: bool,
        move_start_on_overflow: bool,
    ) -> Result<(), BufferError> {
        self.cursor.move_end(amount, error, move_start_on_overflow)
    }

    pub fn sync_length(&mut self, is_write: bool) {
        self.cursor.sync_length(is_write);
    }

    // -- Shape --------------------------------------------------------------

    /// Resize the storage to `shape` and clear. Existing elements are kept in
    /// flat order as far as they fit; new space is zero.
    pub fn set_shape(&mut self, shape: impl Into<Shape>) {
        let shape = shape.into().normalized();
        debug!(from = %self.shape(), to = %shape, "resize buffer");
        self.cursor.resize(shape.rows());
        self.storage.resize(shape);
    }

    /// Change the row count (keeping the record layout) and clear.
    pub fn set_capacity(&mut self, capacity: usize) {
        let shape = self.shape().with_rows(capacity);
        self.set_shape(shape);
    }

    /// Change the column count (keeping the row count) and clear.
    pub fn set_columns(&mut self, columns: usize) {
        let shape = self.shape().with_columns(columns);
        self.set_shape(shape);
    }

    /// Change the column count and let the row count follow.
    ///
    /// When the stored elements divide evenly into the new row width the
    /// storage is reinterpreted in place and the cursors survive if they
    /// still fit. Otherwise rows become `ceil(elements / width)`, the storage
    /// is reallocated and the buffer cleared.
    pub fn reshape_columns(&mut self, columns: usize) {
        let record = self.shape().with_columns(columns.max(1)).with_rows(1);
        let width = record.element_count();
        let elements = self.storage.as_slice().len();

        if width > 0 && elements % width == 0 {
            let shape = record.with_rows(elements / width);
            let rows = shape.rows();
            self.storage.reinterpret(shape);
            let kept = self.cursor.retarget(rows);
            debug!(shape = %self.shape(), kept_cursors = kept, "reinterpreted columns in place");
            return;
        }

        let rows = if width == 0 { 0 } else { elements.div_ceil(width) };
        self.set_shape(record.with_rows(rows));
    }

    /// Resize to `shape`, clear, and zero every element.
    pub fn reshape_and_zero(&mut self, shape: impl Into<Shape>) {
        self.set_shape(shape);
        self.storage.zero_all();
    }

    /// Zero every element without moving cursors.
    pub(crate) fn zero_storage(&mut self) {
        self.storage.zero_all();
    }

    /// Convert to another element type. Contents and cursors carry over.
    pub fn recast<U: Sample>(&self) -> RingBuffer<U> {
        RingBuffer { storage: self.storage.cast(), cursor: self.cursor.clone() }
    }

    // -- Writes -------------------------------------------------------------

    /// Write rows at the end cursor.
    ///
    /// With `error` set, writing more rows than there is space for fails with
    /// [`BufferError::Overflow`]. Without it the oldest rows are overwritten,
    /// and a payload longer than the whole buffer is cut to its last
    /// `capacity` rows.
    pub fn write<'a>(
        &mut self,
        data: impl Into<BlockView<'a, T>>,
        error: bool,
    ) -> Result<(), BufferError> {
        let mut data = self.validate(data.into())?;
        if !error && data.rows() > self.capacity() {
            data = data.tail(self.capacity());
        }
        self.put(&data, error, true)
    }

    /// Write rows, first growing the buffer to exactly the payload length if
    /// the payload is longer than the whole buffer. Growing discards the
    /// current contents.
    pub fn expanding_write<'a>(
        &mut self,
        data: impl Into<BlockView<'a, T>>,
        error: bool,
    ) -> Result<(), BufferError> {
        let data = self.validate(data.into())?;
        if data.rows() > self.capacity() {
            self.set_capacity(data.rows());
        }
        self.put(&data, error, true)
    }

    /// Write rows, growing the buffer by exactly the shortfall if there is
    /// not enough free space. Unread rows are preserved, so this never
    /// discards data and never overflows.
    pub fn growing_write<'a>(&mut self, data: impl Into<BlockView<'a, T>>) -> Result<(), BufferError> {
        let data = self.validate(data.into())?;
        let available = self.get_available_space();
        if data.rows() > available {
            let unread = self.get_data();
            self.set_capacity(self.capacity() + data.rows() - available);
            self.put(&unread.view(), false, true)?;
        }
        self.put(&data, true, true)
    }

    /// Replace the buffer with `data`: adopt its shape, clear, and write it.
    pub fn set_data<'a>(&mut self, data: impl Into<BlockView<'a, T>>) -> Result<(), BufferError> {
        let data = data.into().normalized();
        self.set_shape(data.shape().clone());
        self.expanding_write(data, true)
    }

    fn validate<'a>(&self, data: BlockView<'a, T>) -> Result<BlockView<'a, T>, BufferError> {
        let data = data.normalized();
        if data.shape().record_dims() != self.shape().record_dims() {
            return Err(BufferError::ShapeMismatch {
                expected: self.shape().clone(),
                actual: data.shape().clone(),
            });
        }
        Ok(data)
    }

    /// Map, move the end cursor, then copy. Nothing is copied if the move
    /// fails. A strict payload longer than the whole ring always overflows,
    /// even when a negative length reports more room than that.
    pub(crate) fn put(
        &mut self,
        data: &BlockView<'_, T>,
        error: bool,
        move_start_on_overflow: bool,
    ) -> Result<(), BufferError> {
        let amount = data.rows() as isize;
        if error && data.rows() > self.capacity() {
            return Err(BufferError::Overflow {
                requested: amount,
                available: self.get_available_space() as isize,
            });
        }
        let range = self.get_indexes(self.end(), amount);
        self.cursor.move_end(amount, error, move_start_on_overflow)?;
        self.storage.scatter(&range, data.as_slice());
        Ok(())
    }

    // -- Reads --------------------------------------------------------------

    /// Copy of the buffered rows, without moving the start cursor.
    pub fn get_data(&self) -> Block<T> {
        let rows = self.len();
        self.copy_out(&self.get_indexes(self.start(), rows as isize), rows)
    }

    /// Read exactly `amount` rows (everything buffered for `None`).
    ///
    /// All or nothing: if fewer rows are buffered the result is empty and the
    /// buffer is unchanged.
    pub fn read(&mut self, amount: Option<usize>) -> Block<T> {
        let amount = amount.unwrap_or_else(|| self.len());
        if amount == 0 || amount > self.len() {
            return self.empty_block();
        }
        self.take(amount, amount)
    }

    /// Read up to `amount` rows (everything buffered for `None`).
    ///
    /// Best effort: returns whatever is buffered if that is less.
    pub fn read_remaining(&mut self, amount: Option<usize>) -> Block<T> {
        let amount = amount.map_or(self.len(), |amount| amount.min(self.len()));
        if amount == 0 {
            return self.empty_block();
        }
        self.take(amount, amount)
    }

    /// Read `amount` rows but advance the start cursor by only `increment`
    /// (default `amount`), so consecutive reads can overlap. All or nothing
    /// like [`read`](Self::read).
    pub fn read_overlap(&mut self, amount: Option<usize>, increment: Option<usize>) -> Block<T> {
        let amount = amount.unwrap_or_else(|| self.len());
        let increment = increment.unwrap_or(amount);
        if amount == 0 || amount > self.len() {
            return self.empty_block();
        }
        self.take(amount, increment)
    }

    /// Read the most recent `amount` rows aligned to an `update_rate`
    /// boundary.
    ///
    /// Whole `update_rate` steps that would leave at least `amount` rows are
    /// skipped, the window is copied, and the start advances one more step.
    /// Returns the window and the number of updates it represents
    /// (`1 + skipped steps`), or `None` (zero updates) if fewer than `amount`
    /// rows are buffered.
    pub fn read_last(
        &mut self,
        amount: Option<usize>,
        update_rate: Option<usize>,
    ) -> Option<(Block<T>, usize)> {
        let amount = amount.unwrap_or_else(|| self.len());
        let update_rate = update_rate.filter(|&rate| rate > 0).unwrap_or(amount);
        if amount == 0 || amount > self.len() {
            return None;
        }

        let skips = (self.len() - amount) / update_rate;
        if skips > 0 {
            self.cursor.advance_start((update_rate * skips) as isize, true);
        }
        Some((self.take(amount, update_rate), skips + 1))
    }

    /// Copy `amount` rows from start, then advance by `advance` (clamped to
    /// what is buffered).
    fn take(&mut self, amount: usize, advance: usize) -> Block<T> {
        let range = self.get_indexes(self.start(), amount as isize);
        self.cursor.advance_start(advance as isize, true);
        self.copy_out(&range, amount)
    }

    fn copy_out(&self, range: &IndexRange, rows: usize) -> Block<T> {
        Block::from_parts(self.shape().with_rows(rows), self.storage.gather(range))
    }

    pub(crate) fn gather(&self, range: &IndexRange) -> Vec<T> {
        self.storage.gather(range)
    }

    pub(crate) fn zero(&mut self, range: &IndexRange) {
        self.storage.zero(range);
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut CursorState {
        &mut self.cursor
    }

    fn empty_block(&self) -> Block<T> {
        Block::empty(self.shape())
    }
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
