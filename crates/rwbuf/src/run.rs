// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream simulator: a paced producer and consumer sharing one framing
//! buffer. Shared by `main` and integration tests.

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use tracing_subscriber::EnvFilter;

use crate::block::Block;
use crate::config::{Config, LogFormat};
use crate::error::BufferError;
use crate::framing::FramingBuffer;
use crate::shape::Shape;

/// Test tone frequency in Hz.
const TONE_HZ: f32 = 440.0;

/// What a completed run moved through the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub frames_written: u64,
    pub frames_read: u64,
    /// Reads answered with silence because the buffer delay had not elapsed.
    pub gated_reads: u64,
    pub final_length: isize,
    pub capacity: usize,
}

/// A buffer and its pacing, ready to stream.
///
/// Returned by [`prepare`] so callers can reach the buffer and the shutdown
/// token before the tasks start.
pub struct PreparedStream {
    pub buffer: Arc<FramingBuffer<f32>>,
    pub shutdown: CancellationToken,
    sample_rate: f64,
    write_block: usize,
    read_block: usize,
    write_interval: Duration,
    read_interval: Duration,
    duration: Duration,
}

impl PreparedStream {
    /// Run producer and consumer until the configured duration elapses, the
    /// shutdown token is cancelled, or Ctrl-C arrives.
    pub async fn run(self) -> anyhow::Result<Summary> {
        let producer = tokio::spawn(produce(
            Arc::clone(&self.buffer),
            self.sample_rate,
            self.write_block,
            self.write_interval,
            self.shutdown.clone(),
        ));
        let consumer = tokio::spawn(consume(
            Arc::clone(&self.buffer),
            self.read_block,
            self.read_interval,
            self.shutdown.clone(),
        ));

        tokio::select! {
            _ = tokio::time::sleep(self.duration) => {
                debug!("stream duration elapsed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, stopping stream");
            }
            _ = self.shutdown.cancelled() => {}
        }
        self.shutdown.cancel();

        let frames_written = producer.await??;
        let (frames_read, gated_reads) = consumer.await?;
        let summary = Summary {
            frames_written,
            frames_read,
            gated_reads,
            final_length: self.buffer.length(),
            capacity: self.buffer.capacity(),
        };
        info!(
            frames_written,
            frames_read,
            gated_reads,
            final_length = summary.final_length,
            "stream finished"
        );
        Ok(summary)
    }
}

/// Run a stream to completion.
pub async fn run(config: Config) -> anyhow::Result<Summary> {
    prepare(&config)?.run().await
}

/// Initialize tracing/logging from config.
///
/// Uses `try_init` so it's safe to call multiple times (e.g. from tests).
pub fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match config.log_format().unwrap_or_default() {
        LogFormat::Json => fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr).json().try_init(),
        LogFormat::Text => fmt::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init(),
    };
    drop(result);
}

/// Build the shared buffer and pacing from a validated config.
pub fn prepare(config: &Config) -> anyhow::Result<PreparedStream> {
    init_tracing(config);

    let buffer = FramingBuffer::with_rate(
        config.sample_rate,
        config.channels,
        config.seconds,
        config.buffer_delay,
    )?;
    info!(
        sample_rate = config.sample_rate,
        channels = config.channels,
        capacity = buffer.capacity(),
        buffer_delay = config.buffer_delay,
        "framing buffer ready"
    );

    Ok(PreparedStream {
        buffer: Arc::new(buffer),
        shutdown: CancellationToken::new(),
        sample_rate: config.sample_rate,
        write_block: config.write_block,
        read_block: config.read_block,
        write_interval: config.write_interval()?,
        read_interval: config.read_interval()?,
        duration: config.duration(),
    })
}

/// `frames` frames of a sine tone starting at frame `offset`, the same value
/// on every channel.
pub fn tone(offset: u64, frames: usize, channels: usize, sample_rate: f64) -> Result<Block<f32>, BufferError> {
    let step = TAU * TONE_HZ / sample_rate as f32;
    let data = (0..frames)
        .flat_map(|i| {
            let value = ((offset + i as u64) as f32 * step).sin();
            std::iter::repeat(value).take(channels)
        })
        .collect();
    Block::new(Shape::new(frames, channels), data)
}

async fn produce(
    buffer: Arc<FramingBuffer<f32>>,
    sample_rate: f64,
    block: usize,
    interval: Duration,
    shutdown: CancellationToken,
) -> Result<u64, BufferError> {
    let channels = buffer.channels();
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut written = 0u64;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let frames = tone(written, block, channels, sample_rate)?;
                buffer.write(&frames, false)?;
                written += block as u64;
            }
        }
    }
    Ok(written)
}

async fn consume(
    buffer: Arc<FramingBuffer<f32>>,
    block: usize,
    interval: Duration,
    shutdown: CancellationToken,
) -> (u64, u64) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let (mut read, mut gated) = (0u64, 0u64);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                match read_frame(&buffer, block) {
                    Some(frames) => read += frames.rows() as u64,
                    None => gated += 1,
                }
            }
        }
    }
    (read, gated)
}

/// One consumer read. `None` if the gate was still closed.
fn read_frame(buffer: &FramingBuffer<f32>, block: usize) -> Option<Block<f32>> {
    let _lock = buffer.lock();
    if !buffer.can_read() {
        return None;
    }
    buffer.read(Some(block), false).ok()
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
