// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dimensions of a sample block: `(rows, columns, trailing...)`.
///
/// Only the first two dimensions take part in cursor arithmetic. Everything
/// after the first dimension belongs to a single record (one row).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { dims: vec![rows, columns] }
    }

    /// Rank-1 shape with no column dimension.
    pub fn flat(rows: usize) -> Self {
        Self { dims: vec![rows] }
    }

    pub fn with_trailing(rows: usize, columns: usize, trailing: &[usize]) -> Self {
        let mut dims = Vec::with_capacity(2 + trailing.len());
        dims.push(rows);
        dims.push(columns);
        dims.extend_from_slice(trailing);
        Self { dims }
    }

    pub fn from_dims(dims: &[usize]) -> Self {
        Self { dims: dims.to_vec() }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn rows(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    /// Column count, or `0` for a rank-1 shape.
    pub fn columns(&self) -> usize {
        self.dims.get(1).copied().unwrap_or(0)
    }

    /// Dimensions of a single record.
    pub fn record_dims(&self) -> &[usize] {
        self.dims.get(1..).unwrap_or(&[])
    }

    /// Elements per row.
    pub fn record_len(&self) -> usize {
        self.record_dims().iter().product()
    }

    pub fn element_count(&self) -> usize {
        self.rows() * self.record_len()
    }

    /// Same record layout with a different row count.
    pub fn with_rows(&self, rows: usize) -> Self {
        let mut dims = self.dims.clone();
        match dims.first_mut() {
            Some(first) => *first = rows,
            None => dims.push(rows),
        }
        Self { dims }
    }

    /// Same row count with a different column count.
    pub fn with_columns(&self, columns: usize) -> Self {
        let mut dims = self.dims.clone();
        match dims.len() {
            0 => dims.extend([0, columns]),
            1 => dims.push(columns),
            _ => dims[1] = columns,
        }
        Self { dims }
    }

    /// Force at least one column, so rank-1 and zero-column shapes become
    /// `(rows, 1, ...)`.
    pub fn normalized(&self) -> Self {
        if self.columns() == 0 {
            self.with_columns(1)
        } else {
            self.clone()
        }
    }
}

impl From<usize> for Shape {
    fn from(rows: usize) -> Self {
        Self::flat(rows)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, columns): (usize, usize)) -> Self {
        Self::new(rows, columns)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::from_dims(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dim}")?;
        }
        if self.dims.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[path = "shape_tests.rs"]
mod tests;
