// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circular read/write buffers over multi-column sample blocks.
//!
//! [`RingBuffer`] is the single-threaded core. [`SynchronizedRingBuffer`]
//! serializes every operation behind one re-entrant lock. [`FramingBuffer`]
//! decouples a real-time reader from its writer with a start-up delay.

pub mod block;
pub mod config;
pub mod cursor;
pub mod error;
pub mod framing;
pub mod index;
pub mod managed;
pub mod ring;
pub mod run;
pub mod sample;
pub mod shape;
mod storage;
pub mod sync;
pub mod test_support;

pub use block::{Block, BlockView};
pub use cursor::{CursorState, LengthMode};
pub use error::{BufferError, ErrorCode};
pub use framing::{FramingBuffer, FramingRing};
pub use managed::Managed;
pub use ring::RingBuffer;
pub use sample::Sample;
pub use shape::Shape;
pub use sync::{Synchronized, SynchronizedRingBuffer};
