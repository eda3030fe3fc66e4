// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What an owner needs to park a buffer and bring it back.
//!
//! An inactive consumer can shrink its buffer to zero rows (keeping the
//! record layout) to release the storage, then restore the remembered shape
//! when it becomes active again. Lenient writes to a parked buffer are
//! dropped; strict ones fail with an overflow.

use crate::block::{Block, BlockView};
use crate::error::BufferError;
use crate::framing::FramingBuffer;
use crate::sample::Sample;
use crate::shape::Shape;
use crate::sync::SynchronizedRingBuffer;

pub trait Managed: Send + Sync {
    type Sample: Sample;

    fn shape(&self) -> Shape;

    fn set_shape(&self, shape: Shape);

    fn write(&self, data: BlockView<'_, Self::Sample>, error: bool) -> Result<(), BufferError>;

    fn read(&self, amount: Option<usize>) -> Result<Block<Self::Sample>, BufferError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release the storage: zero rows, same record layout.
    fn park(&self) {
        let shape = self.shape().with_rows(0);
        self.set_shape(shape);
    }
}

impl<T: Sample> Managed for SynchronizedRingBuffer<T> {
    type Sample = T;

    fn shape(&self) -> Shape {
        SynchronizedRingBuffer::shape(self)
    }

    fn set_shape(&self, shape: Shape) {
        SynchronizedRingBuffer::set_shape(self, shape)
    }

    fn write(&self, data: BlockView<'_, T>, error: bool) -> Result<(), BufferError> {
        SynchronizedRingBuffer::write(self, data, error)
    }

    fn read(&self, amount: Option<usize>) -> Result<Block<T>, BufferError> {
        Ok(SynchronizedRingBuffer::read(self, amount))
    }

    fn len(&self) -> usize {
        SynchronizedRingBuffer::len(self)
    }
}

impl<T: Sample> Managed for FramingBuffer<T> {
    type Sample = T;

    fn shape(&self) -> Shape {
        FramingBuffer::shape(self)
    }

    fn set_shape(&self, shape: Shape) {
        FramingBuffer::set_shape(self, shape)
    }

    fn write(&self, data: BlockView<'_, T>, error: bool) -> Result<(), BufferError> {
        FramingBuffer::write(self, data, error)
    }

    fn read(&self, amount: Option<usize>) -> Result<Block<T>, BufferError> {
        FramingBuffer::read(self, amount, false)
    }

    fn len(&self) -> usize {
        FramingBuffer::len(self)
    }
}

#[cfg(test)]
#[path = "managed_tests.rs"]
mod tests;
