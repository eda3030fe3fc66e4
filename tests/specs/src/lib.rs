// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Spawns the real `rwbuf` binary as a subprocess and checks the summary it
//! prints on exit.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use rwbuf::run::Summary;

/// Resolve the path to the compiled `rwbuf` binary.
pub fn rwbuf_binary() -> PathBuf {
    if let Some(dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(dir).join("debug").join("rwbuf");
    }
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("rwbuf")
}

/// Builder for an `rwbuf` invocation.
#[derive(Debug, Default)]
pub struct RwbufBuilder {
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl RwbufBuilder {
    pub fn arg(mut self, flag: &str, value: impl ToString) -> Self {
        self.args.extend([flag.to_owned(), value.to_string()]);
        self
    }

    pub fn env(mut self, key: &str, value: impl ToString) -> Self {
        self.env.push((key.to_owned(), value.to_string()));
        self
    }

    /// Spawn with text logs at warn so stdout carries only the summary.
    pub fn spawn(self) -> anyhow::Result<RwbufProcess> {
        let binary = rwbuf_binary();
        anyhow::ensure!(binary.exists(), "rwbuf binary not found at {}", binary.display());

        let child = Command::new(&binary)
            .args(["--log-format", "text", "--log-level", "warn"])
            .args(&self.args)
            .envs(self.env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        Ok(RwbufProcess { child })
    }
}

/// A running `rwbuf` process that is killed on drop.
pub struct RwbufProcess {
    child: Child,
}

/// Exit status and captured output of a finished run.
#[derive(Debug)]
pub struct RwbufOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RwbufOutput {
    /// Parse the JSON summary line.
    pub fn summary(&self) -> anyhow::Result<Summary> {
        let line = self.stdout.lines().last().unwrap_or_default();
        Ok(serde_json::from_str(line)?)
    }
}

impl RwbufProcess {
    pub fn build() -> RwbufBuilder {
        RwbufBuilder::default()
    }

    /// Wait for the process to exit within `timeout` and collect its output.
    pub async fn wait_output(&mut self, timeout: Duration) -> anyhow::Result<RwbufOutput> {
        let deadline = tokio::time::Instant::now() + timeout;
        let status = loop {
            if tokio::time::Instant::now() > deadline {
                anyhow::bail!("rwbuf did not exit within {timeout:?}");
            }
            if let Some(status) = self.child.try_wait()? {
                break status;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        };

        let mut stdout = String::new();
        if let Some(mut pipe) = self.child.stdout.take() {
            pipe.read_to_string(&mut stdout)?;
        }
        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            pipe.read_to_string(&mut stderr)?;
        }
        Ok(RwbufOutput { status, stdout, stderr })
    }
}

impl Drop for RwbufProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
