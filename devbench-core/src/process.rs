//! # Subprocess Execution
//!
//! Every external program the installer touches (`git`, `bash`, `bench`) is
//! described as an [`Invocation`] and executed through a [`CommandRunner`].
//! The system implementation runs children on a current-thread tokio runtime
//! so that timeouts can be enforced and the child killed on expiry.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, instrument};

use crate::output::Logger;

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory; the parent's when unset
  pub cwd: Option<PathBuf>,
  /// Variables layered over the inherited environment of the child only
  pub env: Vec<(String, String)>,
  pub timeout: Option<Duration>,
  /// Capture stdout/stderr instead of inheriting the terminal
  pub capture: bool,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: Vec::new(),
      timeout: None,
      capture: false,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
    self.cwd = Some(dir.as_ref().to_path_buf());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  pub const fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  pub const fn captured(mut self) -> Self {
    self.capture = true;
    self
  }

  /// Look up a variable set on this invocation
  pub fn env_value(&self, key: &str) -> Option<&str> {
    self.env.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.program)?;
    for arg in &self.args {
      write!(f, " {arg}")?;
    }
    Ok(())
  }
}

/// Result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code; `None` when the child was terminated by a signal
  pub status: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  /// A successful run with empty output
  pub const fn ok() -> Self {
    Self {
      status: Some(0),
      stdout: String::new(),
      stderr: String::new(),
    }
  }

  /// A run that exited with `code`
  pub const fn exited(code: i32) -> Self {
    Self {
      status: Some(code),
      stdout: String::new(),
      stderr: String::new(),
    }
  }

  pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
    self.stdout = stdout.into();
    self
  }

  pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
    self.stderr = stderr.into();
    self
  }

  pub const fn success(&self) -> bool {
    matches!(self.status, Some(0))
  }

  /// Human readable exit status
  pub fn status_label(&self) -> String {
    match self.status {
      Some(code) => format!("exit status {code}"),
      None => "termination by signal".to_string(),
    }
  }
}

/// Failures to run a child at all
#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to launch `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("`{program}` did not finish within {}s", timeout.as_secs())]
  TimedOut { program: String, timeout: Duration },

  #[error("failed waiting for `{program}`: {source}")]
  Wait {
    program: String,
    #[source]
    source: io::Error,
  },
}

/// Executes invocations
pub trait CommandRunner {
  fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError>;
}

/// Runs invocations as real child processes
pub struct SystemRunner {
  runtime: Runtime,
}

impl SystemRunner {
  pub fn new() -> anyhow::Result<Self> {
    let runtime = Builder::new_current_thread()
      .enable_all()
      .build()
      .context("Failed to create async runtime")?;
    Ok(Self { runtime })
  }
}

impl CommandRunner for SystemRunner {
  #[instrument(skip(self, invocation), fields(command = %invocation), level = "debug")]
  fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    let output = self.runtime.block_on(execute(invocation))?;
    debug!("Finished with {}", output.status_label());
    Ok(output)
  }
}

/// Run a command whose outcome does not change the control flow
///
/// Launch failures and nonzero exits are reported as red status lines naming
/// `label` (not the full command line, which may carry passwords). The return
/// value says whether the command succeeded.
pub fn run_reported(runner: &dyn CommandRunner, invocation: &Invocation, label: &str, log: &mut Logger) -> bool {
  match runner.run(invocation) {
    Ok(output) if output.success() => true,
    Ok(output) => {
      log.error(&format!("`{label}` failed with {}", output.status_label()));
      false
    }
    Err(err) => {
      log.error(&format!("`{label}` could not be run: {err}"));
      false
    }
  }
}

async fn execute(invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
  let program = invocation.program.clone();

  let mut command = tokio::process::Command::new(&invocation.program);
  command
    .args(&invocation.args)
    .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    .kill_on_drop(true);

  if let Some(cwd) = &invocation.cwd {
    command.current_dir(cwd);
  }

  if invocation.capture {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
  } else {
    command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
  }

  let child = command.spawn().map_err(|source| ProcessError::Spawn {
    program: program.clone(),
    source,
  })?;

  // Dropping the pending future on timeout drops the child, which kills it
  let waited = match invocation.timeout {
    Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
      .await
      .map_err(|_elapsed| ProcessError::TimedOut {
        program: program.clone(),
        timeout: limit,
      })?,
    None => child.wait_with_output().await,
  };

  let output = waited.map_err(|source| ProcessError::Wait { program, source })?;

  Ok(CommandOutput {
    status: output.status.code(),
    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
  })
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_invocation_display() {
    let invocation = Invocation::new("bench").args(["set-config", "-g", "db_host", "mariadb"]);
    assert_eq!(invocation.to_string(), "bench set-config -g db_host mariadb");
  }

  #[test]
  fn test_invocation_env_value() {
    let invocation = Invocation::new("bash")
      .env("PYENV_VERSION", "3.10")
      .env("PYENV_VERSION", "3.11");
    assert_eq!(invocation.env_value("PYENV_VERSION"), Some("3.11"));
    assert_eq!(invocation.env_value("PATH"), None);
  }

  #[test]
  fn test_command_output_status() {
    assert!(CommandOutput::ok().success());
    assert!(!CommandOutput::exited(1).success());
    assert!(!CommandOutput::default().success());
    assert_eq!(CommandOutput::exited(2).status_label(), "exit status 2");
  }

  #[cfg(unix)]
  #[test]
  fn test_system_runner_captures_output() -> anyhow::Result<()> {
    let runner = SystemRunner::new()?;
    let invocation = Invocation::new("sh")
      .args(["-c", "echo out; echo err >&2; exit 3"])
      .captured();

    let output = runner.run(&invocation)?;

    assert_eq!(output.status, Some(3));
    assert_eq!(output.stdout.trim(), "out");
    assert_eq!(output.stderr.trim(), "err");
    Ok(())
  }

  #[cfg(unix)]
  #[test]
  fn test_system_runner_env_and_cwd() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let runner = SystemRunner::new()?;
    let invocation = Invocation::new("sh")
      .args(["-c", "printf '%s' \"$DEVBENCH_MARKER\"; pwd"])
      .env("DEVBENCH_MARKER", "set-on-child")
      .current_dir(dir.path())
      .captured();

    let output = runner.run(&invocation)?;

    assert!(output.stdout.starts_with("set-on-child"));
    let reported = PathBuf::from(output.stdout.trim_start_matches("set-on-child").trim());
    assert_eq!(reported.canonicalize()?, dir.path().canonicalize()?);
    // The parent environment is left untouched
    assert!(std::env::var("DEVBENCH_MARKER").is_err());
    Ok(())
  }

  #[cfg(unix)]
  #[test]
  fn test_system_runner_timeout() -> anyhow::Result<()> {
    let runner = SystemRunner::new()?;
    let invocation = Invocation::new("sleep")
      .arg("5")
      .timeout(Duration::from_millis(100))
      .captured();

    let err = runner.run(&invocation).unwrap_err();

    assert!(matches!(err, ProcessError::TimedOut { .. }));
    Ok(())
  }

  #[test]
  fn test_system_runner_missing_program() -> anyhow::Result<()> {
    let runner = SystemRunner::new()?;
    let invocation = Invocation::new("devbench-definitely-not-installed").captured();

    let err = runner.run(&invocation).unwrap_err();

    assert!(matches!(err, ProcessError::Spawn { .. }));
    Ok(())
  }
}
