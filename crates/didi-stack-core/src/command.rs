//! External command invocation.
//!
//! Commands are described as a program plus an argument vector and are never
//! routed through a shell.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, ScaffoldError};

/// Number of trailing stderr lines kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// A single external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute.
    pub program: String,
    /// Arguments, each passed as one argv element.
    pub args: Vec<String>,
    /// Stage label shown while the command runs.
    pub stage: String,
}

impl CommandSpec {
    /// Create a command for `program` labelled with `stage`.
    pub fn new(stage: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stage: stage.into(),
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs external commands for the pipeline.
pub trait CommandRunner: Send + Sync {
    /// Run `spec` in `cwd`, succeeding only on a zero exit status.
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Runs commands as child processes.
///
/// Standard input and output are detached from the terminal. Standard error is
/// captured so a failure can be explained without echoing tool chatter.
///
/// Dropping the returned future (for example on timeout) kills the direct child
/// only. Processes it spawned itself, such as npm's install scripts, are not
/// signalled and may outlive the run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    async fn spawn(spec: &CommandSpec, cwd: &Path) -> Result<()> {
        debug!(
            stage = %spec.stage,
            command = %spec,
            cwd = %cwd.display(),
            "spawning command"
        );

        let start = Instant::now();
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScaffoldError::StepFailed {
                stage: spec.stage.clone(),
                detail: format!("failed to start `{}`: {}", spec.program, e),
            })?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ScaffoldError::StepFailed {
                stage: spec.stage.clone(),
                detail: format!("failed waiting for `{}`: {}", spec.program, e),
            })?;
        let elapsed_ms = start.elapsed().as_millis();

        info!(
            stage = %spec.stage,
            elapsed_ms,
            status = ?output.status.code(),
            "command complete"
        );

        if output.status.success() {
            return Ok(());
        }

        let mut detail = format!("`{}` exited with {}", spec, output.status);
        let tail = stderr_tail(&output.stderr);
        if !tail.is_empty() {
            detail.push('\n');
            detail.push_str(&tail);
        }
        Err(ScaffoldError::StepFailed {
            stage: spec.stage.clone(),
            detail,
        })
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        spec: &'a CommandSpec,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(Self::spawn(spec, cwd))
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
