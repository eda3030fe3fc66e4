// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-safe buffer wrapper.
//!
//! Every public operation on a [`Synchronized`] buffer runs under one
//! re-entrant lock, so operations from different threads never interleave.
//! A thread that needs several operations to appear atomic holds
//! [`Synchronized::lock`] across them; nested calls from the same thread
//! re-enter the lock instead of deadlocking.

use std::cell::RefCell;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::block::{Block, BlockView};
use crate::error::BufferError;
use crate::index::IndexRange;
use crate::ring::RingBuffer;
use crate::sample::Sample;
use crate::shape::Shape;

/// A buffer behind a re-entrant lock.
pub struct Synchronized<B> {
    inner: ReentrantMutex<RefCell<B>>,
}

/// Holds the buffer lock for the calling thread until dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct BufferLock<'a, B> {
    _guard: ReentrantMutexGuard<'a, RefCell<B>>,
}

impl<B> Synchronized<B> {
    pub fn new(buffer: B) -> Self {
        Self { inner: ReentrantMutex::new(RefCell::new(buffer)) }
    }

    /// Hold the lock across a compound sequence of calls.
    pub fn lock(&self) -> BufferLock<'_, B> {
        BufferLock { _guard: self.inner.lock() }
    }

    pub fn into_inner(self) -> B {
        self.inner.into_inner().into_inner()
    }

    /// Run `f` on the buffer under the lock. `f` must not call back into
    /// `self`; compound sequences nest under [`lock`](Self::lock) instead.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        let guard = self.inner.lock();
        let mut buffer = guard.borrow_mut();
        f(&mut buffer)
    }
}

impl<B: Clone> Synchronized<B> {
    /// Copy of the current buffer state.
    pub fn snapshot(&self) -> B {
        self.with(|b| b.clone())
    }
}

impl<B: Default> Default for Synchronized<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for Synchronized<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock();
        let result = match guard.try_borrow() {
            Ok(buffer) => f.debug_struct("Synchronized").field("buffer", &*buffer).finish(),
            Err(_) => f.debug_struct("Synchronized").finish_non_exhaustive(),
        };
        result
    }
}

/// [`RingBuffer`] whose operations are atomic with respect to each other.
pub type SynchronizedRingBuffer<T> = Synchronized<RingBuffer<T>>;

impl<T: Sample> Synchronized<RingBuffer<T>> {
    pub fn with_capacity(capacity: usize, columns: usize) -> Self {
        Self::new(RingBuffer::new(capacity, columns))
    }

    pub fn with_shape(shape: impl Into<Shape>) -> Self {
        Self::new(RingBuffer::with_shape(shape))
    }

    pub fn len(&self) -> usize {
        self.with(|b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.with(|b| b.is_empty())
    }

    pub fn length(&self) -> isize {
        self.with(|b| b.length())
    }

    pub fn capacity(&self) -> usize {
        self.with(|b| b.capacity())
    }

    pub fn columns(&self) -> usize {
        self.with(|b| b.columns())
    }

    pub fn shape(&self) -> Shape {
        self.with(|b| b.shape().clone())
    }

    pub fn start(&self) -> usize {
        self.with(|b| b.start())
    }

    pub fn end(&self) -> usize {
        self.with(|b| b.end())
    }

    pub fn get_available_space(&self) -> usize {
        self.with(|b| b.get_available_space())
    }

    pub fn get_indexes(&self, start: usize, amount: isize) -> IndexRange {
        self.with(|b| b.get_indexes(start, amount))
    }

    pub fn clear(&self) {
        self.with(|b| b.clear())
    }

    pub fn move_start(&self, amount: isize, error: bool, limit_amount: bool) -> Result<(), BufferError> {
        self.with(|b| b.move_start(amount, error, limit_amount))
    }

    pub fn move_end(
        &self,
        amount: isize,
        error: bool,
        move_start_on_overflow: bool,
    ) -> Result<(), BufferError> {
        self.with(|b| b.move_end(amount, error, move_start_on_overflow))
    }

    pub fn sync_length(&self, is_write: bool) {
        self.with(|b| b.sync_length(is_write))
    }

    pub fn set_shape(&self, shape: impl Into<Shape>) {
        let shape = shape.into();
        self.with(|b| b.set_shape(shape))
    }

    pub fn set_capacity(&self, capacity: usize) {
        self.with(|b| b.set_capacity(capacity))
    }

    pub fn set_columns(&self, columns: usize) {
        self.with(|b| b.set_columns(columns))
    }

    pub fn reshape_columns(&self, columns: usize) {
        self.with(|b| b.reshape_columns(columns))
    }

    pub fn reshape_and_zero(&self, shape: impl Into<Shape>) {
        let shape = shape.into();
        self.with(|b| b.reshape_and_zero(shape))
    }

    pub fn recast<U: Sample>(&self) -> Synchronized<RingBuffer<U>> {
        Synchronized::new(self.with(|b| b.recast()))
    }

    pub fn write<'a>(&self, data: impl Into<BlockView<'a, T>>, error: bool) -> Result<(), BufferError> {
        let data = data.into();
        self.with(|b| b.write(data, error))
    }

    pub fn expanding_write<'a>(
        &self,
        data: impl Into<BlockView<'a, T>>,
        error: bool,
    ) -> Result<(), BufferError> {
        let data = data.into();
        self.with(|b| b.expanding_write(data, error))
    }

    pub fn growing_write<'a>(&self, data: impl Into<BlockView<'a, T>>) -> Result<(), BufferError> {
        let data = data.into();
        self.with(|b| b.growing_write(data))
    }

    pub fn set_data<'a>(&self, data: impl Into<BlockView<'a, T>>) -> Result<(), BufferError> {
        let data = data.into();
        self.with(|b| b.set_data(data))
    }

    pub fn get_data(&self) -> Block<T> {
        self.with(|b| b.get_data())
    }

    pub fn read(&self, amount: Option<usize>) -> Block<T> {
        self.with(|b| b.read(amount))
    }

    pub fn read_remaining(&self, amount: Option<usize>) -> Block<T> {
        self.with(|b| b.read_remaining(amount))
    }

    pub fn read_overlap(&self, amount: Option<usize>, increment: Option<usize>) -> Block<T> {
        self.with(|b| b.read_overlap(amount, increment))
    }

    pub fn read_last(&self, amount: Option<usize>, update_rate: Option<usize>) -> Option<(Block<T>, usize)> {
        self.with(|b| b.read_last(amount, update_rate))
    }
}

impl<T: Sample> From<RingBuffer<T>> for Synchronized<RingBuffer<T>> {
    fn from(buffer: RingBuffer<T>) -> Self {
        Self::new(buffer)
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
