// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circular index mapping.
//!
//! Translates a logical window (`start`, signed `amount`) over a ring of
//! `capacity` rows into the concrete storage rows it covers. This is the only
//! place wrap arithmetic on storage positions happens.
//!
//! Two strategies exist. [`segmented`] computes at most two contiguous runs
//! and is what buffers use by default. [`reference`] enumerates every row with
//! modular arithmetic. Building with the `reference-indexes` feature makes
//! [`map`] use the reference strategy. Both clamp `|amount|` to `capacity`:
//! a window longer than the ring covers each row once.

/// A run of consecutive storage rows, walked upward or downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    first: usize,
    len: usize,
    descending: bool,
}

impl Segment {
    pub fn ascending(first: usize, len: usize) -> Self {
        Self { first, len, descending: false }
    }

    /// Rows `first, first - 1, ...`; `len` must not exceed `first + 1`.
    pub fn descending(first: usize, len: usize) -> Self {
        debug_assert!(len <= first + 1);
        Self { first, len, descending: true }
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_ascending(&self) -> bool {
        !self.descending
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> {
        let Segment { first, len, descending } = *self;
        (0..len).map(move |i| if descending { first - i } else { first + i })
    }
}

/// Storage rows covered by a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IndexRange {
    #[default]
    Empty,
    /// One strided run (the window does not cross either edge).
    Single(Segment),
    /// Two runs: the window crossed `capacity` (forward) or `0` (backward).
    Wrapped(Segment, Segment),
    /// Explicit rows, as produced by the reference strategy.
    Positions(Vec<usize>),
}

impl IndexRange {
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(a) => a.len(),
            Self::Wrapped(a, b) => a.len() + b.len(),
            Self::Positions(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the window crossed an edge of the ring.
    pub fn is_wrapped(&self) -> bool {
        match self {
            Self::Wrapped(_, b) => !b.is_empty(),
            _ => false,
        }
    }

    pub fn segments(&self) -> Segments<'_> {
        Segments { range: self, next: 0 }
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments().flat_map(|segment| segment.positions())
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.positions().collect()
    }
}

/// Iterator over the runs of an [`IndexRange`]. Explicit rows come out as
/// one-row runs.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    range: &'a IndexRange,
    next: usize,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let segment = match self.range {
            IndexRange::Empty => None,
            IndexRange::Single(a) => (self.next == 0).then_some(*a),
            IndexRange::Wrapped(a, b) => match self.next {
                0 => Some(*a),
                1 => Some(*b),
                _ => None,
            },
            IndexRange::Positions(rows) => {
                rows.get(self.next).map(|&row| Segment::ascending(row, 1))
            }
        };
        self.next += 1;
        segment
    }
}

/// Map a window with the strategy selected at build time.
#[inline]
pub fn map(start: usize, amount: isize, capacity: usize) -> IndexRange {
    #[cfg(feature = "reference-indexes")]
    {
        reference(start, amount, capacity)
    }
    #[cfg(not(feature = "reference-indexes"))]
    {
        segmented(start, amount, capacity)
    }
}

/// Arithmetic strategy: one or two contiguous runs.
///
/// - `start + amount > capacity`: `[start, capacity)` then
///   `[0, (start + amount) mod capacity)`.
/// - `start + amount < 0`: `start` down to `0`, then `capacity - 1` down to
///   `capacity + start + amount`.
/// - otherwise a single run of `|amount|` rows stepping by `sign(amount)`.
///
/// Zero `amount` or zero `capacity` maps to nothing.
pub fn segmented(start: usize, amount: isize, capacity: usize) -> IndexRange {
    if amount == 0 || capacity == 0 {
        return IndexRange::Empty;
    }
    let start = start % capacity;
    let cap = capacity as isize;
    let amount = amount.clamp(-cap, cap);
    let stop = start as isize + amount;

    if stop > cap {
        IndexRange::Wrapped(
            Segment::ascending(start, capacity - start),
            Segment::ascending(0, stop.rem_euclid(cap) as usize),
        )
    } else if stop < 0 {
        IndexRange::Wrapped(
            Segment::descending(start, start + 1),
            Segment::descending(capacity - 1, (-stop - 1) as usize),
        )
    } else if amount > 0 {
        IndexRange::Single(Segment::ascending(start, amount as usize))
    } else {
        IndexRange::Single(Segment::descending(start, amount.unsigned_abs()))
    }
}

/// Element-wise strategy: `(start + i·sign(amount)) mod capacity` for each
/// of the `min(|amount|, capacity)` rows.
pub fn reference(start: usize, amount: isize, capacity: usize) -> IndexRange {
    if amount == 0 || capacity == 0 {
        return IndexRange::Empty;
    }
    let cap = capacity as isize;
    let amount = amount.clamp(-cap, cap);
    let step = amount.signum();
    let rows = (0..amount.abs())
        .map(|i| (start as isize + step * i).rem_euclid(cap) as usize)
        .collect();
    IndexRange::Positions(rows)
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
