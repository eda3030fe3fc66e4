// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start/end cursor bookkeeping for a ring of `capacity` rows.
//!
//! `start` and `end` alone cannot tell a full ring from an empty one, since
//! both have `start == end`. Every length recomputation therefore carries the
//! direction of the move that caused it: after a write a zero distance means
//! full, after a read it means empty.

use tracing::{debug, trace};

use crate::error::BufferError;

/// How `length` follows cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthMode {
    /// Recomputed from `(end - start) mod capacity` after every move, so it
    /// stays in `[0, capacity]`. An unclamped consume past the buffered rows
    /// drives it negative; it then follows move amounts until writes catch up.
    #[default]
    Synced,
    /// Adjusted by each move's amount. May go negative when reads outrun
    /// writes; clamped so it never drifts past `2 * capacity` either way.
    Signed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    start: usize,
    end: usize,
    length: isize,
    capacity: usize,
    mode: LengthMode,
}

impl CursorState {
    pub fn new(capacity: usize) -> Self {
        Self::with_mode(capacity, LengthMode::Synced)
    }

    pub fn signed(capacity: usize) -> Self {
        Self::with_mode(capacity, LengthMode::Signed)
    }

    pub fn with_mode(capacity: usize, mode: LengthMode) -> Self {
        Self { start: 0, end: 0, length: 0, capacity, mode }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Signed buffered length.
    pub fn length(&self) -> isize {
        self.length
    }

    /// Buffered length clamped to `[0, capacity]`.
    pub fn buffered(&self) -> usize {
        self.length.clamp(0, self.capacity as isize) as usize
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mode(&self) -> LengthMode {
        self.mode
    }

    /// `capacity - length`; larger than capacity when length is negative.
    pub fn available(&self) -> isize {
        self.capacity as isize - self.length
    }

    /// `capacity - max(length, 0)`.
    pub fn available_space(&self) -> usize {
        self.capacity - self.buffered()
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
        self.length = 0;
    }

    /// Change capacity. Cursors are cleared.
    pub fn resize(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.clear();
    }

    /// Change capacity while keeping the cursors, if they still fit.
    /// Returns false (and clears) when they do not.
    pub(crate) fn retarget(&mut self, capacity: usize) -> bool {
        let fits = self.start < capacity
            && self.end < capacity
            && self.length <= capacity as isize
            && self.length >= -2 * capacity as isize;
        self.capacity = capacity;
        if !fits {
            self.clear();
        }
        fits
    }

    /// Consume `amount` rows (negative moves backward). A zero move changes
    /// nothing, so it cannot flip a full ring to empty.
    ///
    /// If `amount` exceeds the buffered length: `error` fails with
    /// [`BufferError::Underflow`]; otherwise `limit_amount` clamps to the
    /// buffered length, and without it the full amount is consumed and
    /// length goes negative.
    pub fn move_start(
        &mut self,
        amount: isize,
        error: bool,
        limit_amount: bool,
    ) -> Result<(), BufferError> {
        if amount == 0 {
            return Ok(());
        }
        if amount > self.length && error {
            return Err(BufferError::Underflow { requested: amount, available: self.length });
        }
        self.advance_start(amount, limit_amount);
        Ok(())
    }

    /// Produce `amount` rows (negative moves backward).
    ///
    /// If `amount` exceeds the free space: `error` fails with
    /// [`BufferError::Overflow`]; otherwise `move_start_on_overflow` discards
    /// the oldest rows so the newest `capacity` rows survive, and without it
    /// the end simply overruns the start.
    pub fn move_end(
        &mut self,
        amount: isize,
        error: bool,
        move_start_on_overflow: bool,
    ) -> Result<(), BufferError> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.available();
        if amount > 0 && amount > available {
            if error {
                return Err(BufferError::Overflow { requested: amount, available });
            }
            if move_start_on_overflow {
                self.discard_oldest(amount, available);
            }
        }

        self.end = self.wrap(self.end as isize + amount);
        match self.mode {
            LengthMode::Synced if self.length >= 0 => self.sync_length(amount >= 0),
            _ => {
                self.length += amount;
                self.settle();
            }
        }
        trace!(amount, start = self.start, end = self.end, length = self.length, "move end");
        Ok(())
    }

    /// `length = (end - start) mod capacity`; a zero distance means full when
    /// `is_write`, empty otherwise.
    pub fn sync_length(&mut self, is_write: bool) {
        if self.capacity == 0 {
            self.length = 0;
            return;
        }
        self.length = self.distance() as isize;
        if self.length == 0 && is_write {
            self.length = self.capacity as isize;
        }
    }

    /// Infallible consume used once a caller has already checked the amount.
    pub(crate) fn advance_start(&mut self, amount: isize, limit_amount: bool) {
        let amount = if amount > self.length && limit_amount { self.length } else { amount };
        if amount == 0 {
            return;
        }
        self.shift_start(amount);
        self.settle();
        trace!(amount, start = self.start, end = self.end, length = self.length, "move start");
    }

    fn shift_start(&mut self, amount: isize) {
        self.start = self.wrap(self.start as isize + amount);
        match self.mode {
            LengthMode::Synced if self.length >= 0 && amount <= self.length => {
                self.sync_length(amount < 0)
            }
            _ => self.length -= amount,
        }
    }

    /// Make room for `amount` incoming rows when only `available` are free.
    fn discard_oldest(&mut self, amount: isize, available: isize) {
        let cap = self.capacity as isize;
        if amount > cap {
            // Everything buffered goes, then start jumps to where the new end
            // will be minus one capacity, leaving the ring exactly full.
            self.shift_start(self.length);
            self.shift_start(amount - cap);
        } else {
            let discard = amount - available;
            let discard = if discard > self.length { self.length } else { discard };
            self.shift_start(discard);
        }
        debug!(amount, available, start = self.start, "overflow discarded oldest rows");
    }

    fn settle(&mut self) {
        if self.mode == LengthMode::Synced && self.length > self.capacity as isize {
            self.sync_length(true);
        } else {
            self.clamp_runaway();
        }
    }

    fn clamp_runaway(&mut self) {
        if self.capacity == 0 {
            return;
        }
        let cap = self.capacity as isize;
        if self.length <= -2 * cap {
            self.length = self.distance() as isize - cap;
        } else if self.length >= 2 * cap {
            self.sync_length(true);
        }
    }

    fn distance(&self) -> usize {
        self.wrap(self.end as isize - self.start as isize)
    }

    fn wrap(&self, position: isize) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        position.rem_euclid(self.capacity as isize) as usize
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
