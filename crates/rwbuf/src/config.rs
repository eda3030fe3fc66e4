// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Text => f.write_str("text"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => anyhow::bail!("invalid log format: {other}"),
        }
    }
}

/// Stream a synthetic signal through a delay-gated framing buffer.
#[derive(Debug, Parser)]
#[command(name = "rwbuf", version, about)]
pub struct Config {
    /// Frames per second.
    #[arg(long, env = "RWBUF_SAMPLE_RATE", default_value = "44100")]
    pub sample_rate: f64,

    /// Samples per frame.
    #[arg(long, env = "RWBUF_CHANNELS", default_value = "1")]
    pub channels: usize,

    /// Seconds of audio the buffer holds.
    #[arg(long, env = "RWBUF_SECONDS", default_value = "2")]
    pub seconds: f64,

    /// Seconds that must be buffered before reads return data.
    #[arg(long, env = "RWBUF_BUFFER_DELAY", default_value = "0.1")]
    pub buffer_delay: f64,

    /// Frames per producer write.
    #[arg(long, env = "RWBUF_WRITE_BLOCK", default_value = "441")]
    pub write_block: usize,

    /// Frames per consumer read.
    #[arg(long, env = "RWBUF_READ_BLOCK", default_value = "441")]
    pub read_block: usize,

    /// How long to stream before stopping, in milliseconds.
    #[arg(long, env = "RWBUF_DURATION_MS", default_value = "1000")]
    pub duration_ms: u64,

    /// JSON file whose fields override the options above.
    #[arg(long, env = "RWBUF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format (json or text).
    #[arg(long, env = "RWBUF_LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "RWBUF_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Validate the configuration after parsing and file overrides.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            anyhow::bail!("--sample-rate must be a positive number, got {}", self.sample_rate);
        }
        if !(self.seconds.is_finite() && self.seconds > 0.0) {
            anyhow::bail!("--seconds must be a positive number, got {}", self.seconds);
        }
        if self.channels == 0 {
            anyhow::bail!("--channels must be at least 1");
        }
        if self.write_block == 0 || self.read_block == 0 {
            anyhow::bail!("--write-block and --read-block must be at least 1 frame");
        }
        if self.write_block > self.capacity() {
            anyhow::bail!(
                "--write-block of {} frames exceeds the {}-frame buffer",
                self.write_block,
                self.capacity()
            );
        }
        if !(self.buffer_delay.is_finite() && self.buffer_delay >= 0.0) {
            anyhow::bail!("--buffer-delay must not be negative, got {}", self.buffer_delay);
        }
        if self.buffer_delay > self.seconds {
            anyhow::bail!(
                "--buffer-delay of {}s cannot exceed --seconds of {}s",
                self.buffer_delay,
                self.seconds
            );
        }
        if self.duration_ms == 0 {
            anyhow::bail!("--duration-ms must be positive");
        }
        self.log_format()?;
        Ok(())
    }

    /// Apply the `--config` file, if any. Fields present in the file win.
    pub fn resolve(mut self) -> anyhow::Result<Self> {
        if let Some(ref path) = self.config {
            let file = load_framing_config(path)?;
            self.apply(file);
        }
        Ok(self)
    }

    pub fn apply(&mut self, file: FramingFileConfig) {
        if let Some(v) = file.sample_rate {
            self.sample_rate = v;
        }
        if let Some(v) = file.channels {
            self.channels = v;
        }
        if let Some(v) = file.seconds {
            self.seconds = v;
        }
        if let Some(v) = file.buffer_delay {
            self.buffer_delay = v;
        }
        if let Some(v) = file.write_block {
            self.write_block = v;
        }
        if let Some(v) = file.read_block {
            self.read_block = v;
        }
        if let Some(v) = file.duration_ms {
            self.duration_ms = v;
        }
    }

    /// Buffer rows implied by the rate and duration.
    pub fn capacity(&self) -> usize {
        (self.sample_rate * self.seconds).ceil().max(0.0) as usize
    }

    pub fn write_interval(&self) -> anyhow::Result<Duration> {
        self.block_interval(self.write_block)
    }

    pub fn read_interval(&self) -> anyhow::Result<Duration> {
        self.block_interval(self.read_block)
    }

    fn block_interval(&self, frames: usize) -> anyhow::Result<Duration> {
        Ok(Duration::try_from_secs_f64(frames as f64 / self.sample_rate)?)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn log_format(&self) -> anyhow::Result<LogFormat> {
        self.log_format.parse()
    }

    /// Build a small `Config` for tests (100 Hz, 50 ms run).
    #[doc(hidden)]
    pub fn test() -> Self {
        Self {
            sample_rate: 100.0,
            channels: 1,
            seconds: 1.0,
            buffer_delay: 0.0,
            write_block: 1,
            read_block: 1,
            duration_ms: 50,
            config: None,
            log_format: "text".into(),
            log_level: "debug".into(),
        }
    }
}

/// Contents of the `--config` JSON file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramingFileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_block: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_block: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Load and parse the framing config file at `path`.
pub fn load_framing_config(path: &Path) -> anyhow::Result<FramingFileConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: FramingFileConfig = serde_json::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
