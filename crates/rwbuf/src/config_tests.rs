// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::time::Duration;

use clap::Parser;

use super::{load_framing_config, Config, FramingFileConfig, LogFormat};

fn parse(args: &[&str]) -> Config {
    Config::parse_from(args)
}

#[test]
fn defaults_are_valid() -> anyhow::Result<()> {
    let config = parse(&["rwbuf"]);
    config.validate()?;
    assert_eq!(config.sample_rate, 44100.0);
    assert_eq!(config.channels, 1);
    assert_eq!(config.capacity(), 88200);
    assert_eq!(config.log_format()?, LogFormat::Json);
    Ok(())
}

#[test]
fn explicit_options() -> anyhow::Result<()> {
    let config = parse(&[
        "rwbuf",
        "--sample-rate",
        "8000",
        "--channels",
        "2",
        "--seconds",
        "0.5",
        "--buffer-delay",
        "0.25",
        "--write-block",
        "80",
        "--read-block",
        "160",
        "--duration-ms",
        "200",
        "--log-format",
        "text",
    ]);
    config.validate()?;
    assert_eq!(config.capacity(), 4000);
    assert_eq!(config.write_interval()?, Duration::from_millis(10));
    assert_eq!(config.read_interval()?, Duration::from_millis(20));
    assert_eq!(config.duration(), Duration::from_millis(200));
    assert_eq!(config.log_format()?, LogFormat::Text);
    Ok(())
}

#[yare::parameterized(
    zero_rate      = { &["rwbuf", "--sample-rate", "0"], "--sample-rate" },
    negative_secs  = { &["rwbuf", "--seconds=-1"], "--seconds" },
    no_channels    = { &["rwbuf", "--channels", "0"], "--channels" },
    empty_read     = { &["rwbuf", "--read-block", "0"], "--read-block" },
    huge_write     = { &["rwbuf", "--seconds", "0.001", "--buffer-delay", "0"], "exceeds" },
    long_delay     = { &["rwbuf", "--seconds", "1", "--buffer-delay", "2"], "cannot exceed" },
    negative_delay = { &["rwbuf", "--buffer-delay=-0.5"], "must not be negative" },
    no_duration    = { &["rwbuf", "--duration-ms", "0"], "--duration-ms" },
    bad_format     = { &["rwbuf", "--log-format", "yaml"], "invalid log format" },
)]
fn invalid_config(args: &[&str], expected_substr: &str) {
    let config = parse(args);
    crate::assert_err_contains!(config.validate(), expected_substr);
}

#[yare::parameterized(
    json  = { "json", LogFormat::Json },
    text  = { "text", LogFormat::Text },
    upper = { "JSON", LogFormat::Json },
)]
fn log_format_parse(input: &str, expected: LogFormat) -> anyhow::Result<()> {
    assert_eq!(input.parse::<LogFormat>()?, expected);
    assert_eq!(expected.to_string(), input.to_lowercase());
    Ok(())
}

#[test]
fn file_overrides_present_fields() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"sample_rate": 16000, "buffer_delay": 0.5, "read_block": 320}}"#)?;

    let path = file.path().to_string_lossy().to_string();
    let config = parse(&["rwbuf", "--channels", "2", "--config", &path]).resolve()?;
    config.validate()?;
    assert_eq!(config.sample_rate, 16000.0);
    assert_eq!(config.buffer_delay, 0.5);
    assert_eq!(config.read_block, 320);
    assert_eq!(config.channels, 2);
    assert_eq!(config.seconds, 2.0);
    Ok(())
}

#[test]
fn empty_file_changes_nothing() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "{{}}")?;
    assert_eq!(load_framing_config(file.path())?, FramingFileConfig::default());
    Ok(())
}

#[test]
fn malformed_file_is_an_error() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "not json")?;
    assert!(load_framing_config(file.path()).is_err());

    let missing = file.path().with_extension("missing");
    assert!(load_framing_config(&missing).is_err());
    Ok(())
}

#[test]
fn test_config_is_valid() -> anyhow::Result<()> {
    Config::test().validate()
}
