//! Invocation of the packaging CLI status query
//!
//! The poller only ever sees [`QueryOutput`]; spawning the real process is
//! kept behind the [`StatusQuery`] trait so decision logic can run against
//! scripted output.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::app::config::QueryConfig;

/// Captured output of one status query run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exited with status 0
    pub exit_ok: bool,
}

impl QueryOutput {
    pub fn has_stdout(&self) -> bool {
        !self.stdout.trim().is_empty()
    }
}

/// Source of package version creation status
#[async_trait]
pub trait StatusQuery: Send + Sync {
    /// Run the query once and capture its output
    ///
    /// An `Err` means the process could not be run at all.
    async fn run(&self) -> Result<QueryOutput>;

    /// Human readable command line (for logs)
    fn describe(&self) -> String;
}

/// Runs `sf package:version:create:list --json` (or the configured command)
pub struct CliStatusQuery {
    program: String,
    args: Vec<String>,
}

impl CliStatusQuery {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }
}

#[async_trait]
impl StatusQuery for CliStatusQuery {
    async fn run(&self) -> Result<QueryOutput> {
        debug!("Running status query: {}", self.describe());

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.program))?;

        Ok(QueryOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_ok: output.status.success(),
        })
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}
