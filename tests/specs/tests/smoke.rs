// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `rwbuf` binary.

use std::io::Write;
use std::time::Duration;

use rwbuf_specs::RwbufProcess;

const TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn short_run_prints_summary() -> anyhow::Result<()> {
    let mut rwbuf = RwbufProcess::build()
        .arg("--sample-rate", 1000)
        .arg("--seconds", 1)
        .arg("--buffer-delay", 0)
        .arg("--write-block", 10)
        .arg("--read-block", 10)
        .arg("--duration-ms", 100)
        .spawn()?;
    let output = rwbuf.wait_output(TIMEOUT).await?;
    assert!(output.status.success(), "stderr: {}", output.stderr);

    let summary = output.summary()?;
    assert_eq!(summary.capacity, 1000);
    assert!(summary.frames_written > 0);
    assert_eq!(summary.frames_written % 10, 0);
    assert_eq!(summary.gated_reads, 0);
    Ok(())
}

#[tokio::test]
async fn delay_gates_reads() -> anyhow::Result<()> {
    let mut rwbuf = RwbufProcess::build()
        .arg("--sample-rate", 1000)
        .arg("--seconds", 2)
        .arg("--buffer-delay", 2)
        .arg("--write-block", 10)
        .arg("--duration-ms", 100)
        .spawn()?;
    let output = rwbuf.wait_output(TIMEOUT).await?;
    assert!(output.status.success(), "stderr: {}", output.stderr);

    let summary = output.summary()?;
    assert_eq!(summary.frames_read, 0);
    assert!(summary.gated_reads > 0);
    Ok(())
}

#[tokio::test]
async fn environment_configures_buffer() -> anyhow::Result<()> {
    let mut rwbuf = RwbufProcess::build()
        .env("RWBUF_SAMPLE_RATE", 500)
        .env("RWBUF_SECONDS", 3)
        .env("RWBUF_WRITE_BLOCK", 5)
        .env("RWBUF_DURATION_MS", 50)
        .spawn()?;
    let output = rwbuf.wait_output(TIMEOUT).await?;
    assert!(output.status.success(), "stderr: {}", output.stderr);
    assert_eq!(output.summary()?.capacity, 1500);
    Ok(())
}

#[tokio::test]
async fn config_file_overrides_flags() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"sample_rate": 200, "seconds": 0.5, "write_block": 2, "read_block": 2}}"#)?;

    let mut rwbuf = RwbufProcess::build()
        .arg("--sample-rate", 48000)
        .arg("--duration-ms", 50)
        .arg("--config", file.path().display())
        .spawn()?;
    let output = rwbuf.wait_output(TIMEOUT).await?;
    assert!(output.status.success(), "stderr: {}", output.stderr);
    assert_eq!(output.summary()?.capacity, 100);
    Ok(())
}

#[tokio::test]
async fn invalid_options_exit_with_usage_error() -> anyhow::Result<()> {
    let mut rwbuf = RwbufProcess::build().arg("--seconds", 1).arg("--buffer-delay", 5).spawn()?;
    let output = rwbuf.wait_output(TIMEOUT).await?;
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stderr.contains("--buffer-delay"), "stderr: {}", output.stderr);
    assert!(output.stdout.is_empty());
    Ok(())
}
