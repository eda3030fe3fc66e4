// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delay-gated framing buffer for real-time streams.
//!
//! The read cursor advances by exactly what was asked for, whether or not the
//! writer has produced that much, so the signed length goes negative when the
//! reader runs ahead. Consumed rows are zeroed; a reader that overtakes the
//! writer reads silence instead of stale samples. Writes always land where the
//! last write stopped, keeping producer and consumer in step.
//!
//! Reads return zeros until `sample_rate * buffer_delay` rows have been
//! buffered. Once open, the gate stays open until [`FramingRing::clear`].
//!
//! A reader that laps the ring a second time before the writer catches up
//! reads whatever the slots hold at that point; no ordering is guaranteed.

use tracing::debug;

use crate::block::{Block, BlockView};
use crate::cursor::LengthMode;
use crate::error::BufferError;
use crate::ring::RingBuffer;
use crate::sample::Sample;
use crate::shape::Shape;
use crate::sync::Synchronized;

fn rows_for(sample_rate: f64, seconds: f64) -> usize {
    let rows = (sample_rate * seconds).ceil();
    if rows.is_finite() && rows > 0.0 {
        rows as usize
    } else {
        0
    }
}

#[derive(Debug, Clone)]
pub struct FramingRing<T> {
    ring: RingBuffer<T>,
    sample_rate: f64,
    seconds: f64,
    buffer_delay: f64,
    can_read: bool,
}

impl<T: Sample> FramingRing<T> {
    /// Buffer holding `seconds` of `channels`-wide frames at `sample_rate` Hz,
    /// readable once `buffer_delay` seconds have been written.
    pub fn new(
        sample_rate: f64,
        channels: usize,
        seconds: f64,
        buffer_delay: f64,
    ) -> Result<Self, BufferError> {
        if buffer_delay > seconds {
            return Err(BufferError::InvalidDelay { delay: buffer_delay, seconds });
        }
        let shape = Shape::new(rows_for(sample_rate, seconds), channels);
        Ok(Self {
            ring: RingBuffer::with_mode(shape, LengthMode::Signed),
            sample_rate,
            seconds,
            buffer_delay,
            can_read: buffer_delay <= 0.0,
        })
    }

    /// Buffer of exactly `rows` frames spanning `seconds`; the sample rate is
    /// derived as `rows / seconds`. No delay.
    pub fn from_shape(rows: usize, channels: usize, seconds: f64) -> Self {
        Self {
            ring: RingBuffer::with_mode(Shape::new(rows, channels), LengthMode::Signed),
            sample_rate: rows as f64 / seconds,
            seconds,
            buffer_delay: 0.0,
            can_read: true,
        }
    }

    // -- Metadata -----------------------------------------------------------

    /// Buffered rows, clamped to `[0, capacity]`.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signed length; negative while the reader is ahead of the writer.
    pub fn length(&self) -> isize {
        self.ring.length()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn channels(&self) -> usize {
        self.ring.columns()
    }

    pub fn shape(&self) -> &Shape {
        self.ring.shape()
    }

    pub fn start(&self) -> usize {
        self.ring.start()
    }

    pub fn end(&self) -> usize {
        self.ring.end()
    }

    pub fn can_read(&self) -> bool {
        self.can_read
    }

    pub fn ring(&self) -> &RingBuffer<T> {
        &self.ring
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn buffer_delay(&self) -> f64 {
        self.buffer_delay
    }

    // -- Settings -----------------------------------------------------------

    /// Change the sample rate. Capacity follows and the buffer is cleared.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.resize_to_duration();
    }

    /// Change how many seconds the buffer holds. Capacity follows and the
    /// buffer is cleared; a delay longer than the new duration is lowered to
    /// it.
    pub fn set_seconds(&mut self, seconds: f64) {
        self.seconds = seconds;
        if self.buffer_delay > seconds {
            self.buffer_delay = seconds;
        }
        self.resize_to_duration();
    }

    /// Change how many seconds must be buffered before reads return data.
    pub fn set_buffer_delay(&mut self, buffer_delay: f64) -> Result<(), BufferError> {
        if buffer_delay > self.seconds {
            return Err(BufferError::InvalidDelay { delay: buffer_delay, seconds: self.seconds });
        }
        self.buffer_delay = buffer_delay;
        self.latch();
        Ok(())
    }

    /// Resize to `shape` directly. The duration is re-derived from the new
    /// row count and the buffer is cleared.
    pub fn set_shape(&mut self, shape: impl Into<Shape>) {
        self.ring.set_shape(shape);
        self.seconds = if self.sample_rate > 0.0 {
            self.capacity() as f64 / self.sample_rate
        } else {
            0.0
        };
        if self.buffer_delay > self.seconds {
            self.buffer_delay = self.seconds;
        }
        self.clear();
    }

    fn resize_to_duration(&mut self) {
        self.ring.set_capacity(rows_for(self.sample_rate, self.seconds));
        self.clear();
    }

    /// Reset both cursors, zero every slot, and close the gate again.
    pub fn clear(&mut self) {
        self.ring.clear();
        self.ring.zero_storage();
        self.can_read = self.buffer_delay <= 0.0;
    }

    // -- Data ---------------------------------------------------------------

    /// Write frames at the write cursor, overwriting the oldest rows when the
    /// ring is full. Opens the read gate once enough has been buffered.
    pub fn write<'a>(&mut self, data: impl Into<BlockView<'a, T>>, error: bool) -> Result<(), BufferError> {
        self.ring.write(data, error)?;
        self.latch();
        Ok(())
    }

    /// Read `amount` frames (the buffered length for `None`).
    ///
    /// Before the gate opens this returns zeros and leaves the cursors alone.
    /// After, the read cursor moves by the full `amount` even past the
    /// writer; slots not yet written read as zero. With `error` set, asking
    /// for more than is buffered fails with [`BufferError::Underflow`].
    pub fn read(&mut self, amount: Option<usize>, error: bool) -> Result<Block<T>, BufferError> {
        let amount = amount.unwrap_or_else(|| self.len());
        if !self.can_read || self.capacity() == 0 {
            debug!(amount, buffered = self.length(), "read gated, returning silence");
            return Ok(Block::zeros(self.shape().with_rows(amount)));
        }
        let requested = amount as isize;
        if error && requested > self.length() {
            return Err(BufferError::Underflow { requested, available: self.length() });
        }

        let mut data = Vec::with_capacity(amount * self.shape().record_len());
        let mut remaining = amount;
        while remaining > 0 {
            let lap = remaining.min(self.capacity());
            let range = self.ring.get_indexes(self.start(), lap as isize);
            self.ring.cursor_mut().advance_start(lap as isize, false);
            data.extend(self.ring.gather(&range));
            self.ring.zero(&range);
            remaining -= lap;
        }
        Ok(Block::from_parts(self.shape().with_rows(amount), data))
    }

    fn latch(&mut self) {
        if self.can_read {
            return;
        }
        if self.buffer_delay <= 0.0 || self.length() as f64 >= self.sample_rate * self.buffer_delay {
            self.can_read = true;
            debug!(length = self.length(), delay = self.buffer_delay, "buffer delay reached, reads open");
        }
    }
}

/// [`FramingRing`] shared between a producer and a consumer.
pub type FramingBuffer<T> = Synchronized<FramingRing<T>>;

impl<T: Sample> Synchronized<FramingRing<T>> {
    pub fn with_rate(
        sample_rate: f64,
        channels: usize,
        seconds: f64,
        buffer_delay: f64,
    ) -> Result<Self, BufferError> {
        Ok(Self::new(FramingRing::new(sample_rate, channels, seconds, buffer_delay)?))
    }

    pub fn from_shape(rows: usize, channels: usize, seconds: f64) -> Self {
        Self::new(FramingRing::from_shape(rows, channels, seconds))
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

    pub fn channels(&self) -> usize {
        self.with(|b| b.channels())
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

    pub fn can_read(&self) -> bool {
        self.with(|b| b.can_read())
    }

    pub fn sample_rate(&self) -> f64 {
        self.with(|b| b.sample_rate())
    }

    pub fn set_sample_rate(&self, sample_rate: f64) {
        self.with(|b| b.set_sample_rate(sample_rate))
    }

    pub fn seconds(&self) -> f64 {
        self.with(|b| b.seconds())
    }

    pub fn set_seconds(&self, seconds: f64) {
        self.with(|b| b.set_seconds(seconds))
    }

    pub fn buffer_delay(&self) -> f64 {
        self.with(|b| b.buffer_delay())
    }

    pub fn set_buffer_delay(&self, buffer_delay: f64) -> Result<(), BufferError> {
        self.with(|b| b.set_buffer_delay(buffer_delay))
    }

    pub fn set_shape(&self, shape: impl Into<Shape>) {
        let shape = shape.into();
        self.with(|b| b.set_shape(shape))
    }

    pub fn clear(&self) {
        self.with(|b| b.clear())
    }

    pub fn write<'a>(&self, data: impl Into<BlockView<'a, T>>, error: bool) -> Result<(), BufferError> {
        let data = data.into();
        self.with(|b| b.write(data, error))
    }

    pub fn read(&self, amount: Option<usize>, error: bool) -> Result<Block<T>, BufferError> {
        self.with(|b| b.read(amount, error))
    }
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
