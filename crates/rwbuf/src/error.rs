// SPDX-License-Identifier: BUSL-1.1
// Copyright 2025 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shape::Shape;

/// Stable machine-readable codes for [`BufferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    ShapeMismatch,
    Overflow,
    Underflow,
    InvalidDelay,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShapeMismatch => "SHAPE_MISMATCH",
            Self::Overflow => "OVERFLOW",
            Self::Underflow => "UNDERFLOW",
            Self::InvalidDelay => "INVALID_DELAY",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by buffer operations.
///
/// Nothing is retried internally. A strict write or consume that fails leaves
/// the buffer exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferError {
    /// Incoming record shape does not match the buffer's trailing dimensions.
    ShapeMismatch { expected: Shape, actual: Shape },
    /// Strict write of `requested` rows with only `available` free.
    Overflow { requested: isize, available: isize },
    /// Strict consume of `requested` rows with only `available` buffered.
    Underflow { requested: isize, available: isize },
    /// Framing delay longer than the buffer can hold.
    InvalidDelay { delay: f64, seconds: f64 },
}

impl BufferError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ShapeMismatch { .. } => ErrorCode::ShapeMismatch,
            Self::Overflow { .. } => ErrorCode::Overflow,
            Self::Underflow { .. } => ErrorCode::Underflow,
            Self::InvalidDelay { .. } => ErrorCode::InvalidDelay,
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "could not broadcast input block from shape {actual} into shape {expected}")
            }
            Self::Overflow { requested, available } => {
                write!(f, "not enough space in the buffer: {requested} requested, {available} available")
            }
            Self::Underflow { requested, available } => {
                write!(f, "not enough data in the buffer: {requested} requested, {available} buffered")
            }
            Self::InvalidDelay { delay, seconds } => write!(
                f,
                "buffer delay of {delay}s cannot exceed the {seconds}s the buffer can hold"
            ),
        }
    }
}

impl std::error::Error for BufferError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
