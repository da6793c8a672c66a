//! # Bench Initialization
//!
//! Creates the bench directory with `bench init` (run through an interactive
//! bash so that nvm/pyenv shims from the profile are active) and writes the
//! global configuration keys the dev container's services need.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::consts::{
  BENCH_EXECUTABLE, ENV_PYENV_VERSION, INVALID_REMOTE_MARKER, REDIS_CACHE_URL, REDIS_QUEUE_URL, SHELL_EXECUTABLE,
};
use crate::options::{DbType, InstallOptions};
use crate::output::Logger;
use crate::process::{CommandRunner, Invocation, run_reported};

/// What happened to the bench directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
  /// The directory was already there; nothing was run
  AlreadyExists,
  /// `bench init` succeeded and the global config was written
  Initialized,
  /// `bench init` could not be run or exited nonzero
  Failed,
}

/// One shell word of the `bench init` command line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Word {
  /// Emitted verbatim
  Literal(&'static str),
  /// A positional value, quoted if needed
  Value(String),
  /// `--name=value`, with only the value quoted if needed
  Flag(&'static str, String),
}

impl Word {
  fn render(&self) -> Result<String> {
    Ok(match self {
      Self::Literal(text) => (*text).to_string(),
      Self::Value(value) => quote(value)?,
      Self::Flag(name, value) => format!("{name}={}", quote(value)?),
    })
  }
}

fn quote(value: &str) -> Result<String> {
  shlex::try_quote(value)
    .map(|quoted| quoted.into_owned())
    .with_context(|| format!("Cannot pass {value:?} to the shell"))
}

/// The `bench init` command, kept as an activation prelude, inline
/// environment assignments, and an argument vector until it is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitCommand {
  node_version: Option<String>,
  assignments: Vec<(&'static str, String)>,
  argv: Vec<Word>,
}

impl InitCommand {
  pub fn from_options(options: &InstallOptions) -> Self {
    let mut assignments = Vec::new();
    if let Some(py_version) = &options.py_version {
      assignments.push((ENV_PYENV_VERSION, py_version.clone()));
    }

    let mut argv = vec![
      Word::Literal(BENCH_EXECUTABLE),
      Word::Literal("init"),
      Word::Literal("--skip-redis-config-generation"),
    ];
    if options.verbose {
      argv.push(Word::Literal("--verbose"));
    }
    argv.push(Word::Flag("--frappe-path", options.frappe_repo.clone()));
    argv.push(Word::Flag("--frappe-branch", options.frappe_branch.clone()));
    let apps_path = options.apps_json.to_string_lossy().into_owned();
    argv.push(Word::Flag("--apps_path", apps_path));
    argv.push(Word::Value(options.bench_name.clone()));

    Self {
      node_version: options.node_version.clone(),
      assignments,
      argv,
    }
  }

  /// Render the single command string handed to `bash -c`
  pub fn to_shell_string(&self) -> Result<String> {
    let mut words = Vec::new();

    if let Some(node_version) = &self.node_version {
      words.push(format!("nvm use {};", quote(node_version)?));
    }
    for (key, value) in &self.assignments {
      words.push(format!("{key}={}", quote(value)?));
    }
    for word in &self.argv {
      words.push(word.render()?);
    }

    Ok(words.join(" "))
  }

  /// `/bin/bash -i -c <command>` in `workdir`, with the inline assignments
  /// also exported to the child environment
  pub fn invocation(&self, workdir: &Path) -> Result<Invocation> {
    let mut invocation = Invocation::new(SHELL_EXECUTABLE)
      .args(["-i", "-c"])
      .arg(self.to_shell_string()?)
      .current_dir(workdir)
      .captured();

    for (key, value) in &self.assignments {
      invocation = invocation.env(*key, value.clone());
    }

    Ok(invocation)
  }
}

/// A `bench set-config` write against the global config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWrite {
  pub key: &'static str,
  pub value: String,
  /// Use `-gp` so bench parses the value (numbers, booleans)
  pub parsed: bool,
  /// Status line printed before the write
  pub announcement: String,
}

impl ConfigWrite {
  fn new(key: &'static str, value: impl Into<String>, announcement: impl Into<String>) -> Self {
    Self {
      key,
      value: value.into(),
      parsed: false,
      announcement: announcement.into(),
    }
  }

  /// `db_host` pointing at the database container for `db_type`
  pub fn db_host(db_type: DbType) -> Self {
    Self::new("db_host", db_type.host(), "Set db_host")
  }

  pub fn invocation(&self, bench_dir: &Path) -> Invocation {
    let scope = if self.parsed { "-gp" } else { "-g" };
    Invocation::new(BENCH_EXECUTABLE)
      .args(["set-config", scope, self.key])
      .arg(self.value.clone())
      .current_dir(bench_dir)
  }

  /// Run the write; failures are reported but do not stop the installer
  pub fn apply(&self, bench_dir: &Path, runner: &dyn CommandRunner, log: &mut Logger) -> bool {
    log.warn(&self.announcement);
    let label = format!("{BENCH_EXECUTABLE} set-config {}", self.key);
    run_reported(runner, &self.invocation(bench_dir), &label, log)
  }
}

/// Global config written right after `bench init`, in this exact order
pub fn global_config_writes(options: &InstallOptions) -> Vec<ConfigWrite> {
  vec![
    ConfigWrite::new(
      "db_type",
      options.db_type.as_str(),
      format!("Setting db_type to {}", options.db_type),
    ),
    ConfigWrite::new(
      "redis_cache",
      REDIS_CACHE_URL,
      format!("Set redis_cache to {REDIS_CACHE_URL}"),
    ),
    ConfigWrite::new(
      "redis_queue",
      REDIS_QUEUE_URL,
      format!("Set redis_queue to {REDIS_QUEUE_URL}"),
    ),
    // socketio shares the queue instance for backward compatibility
    ConfigWrite::new(
      "redis_socketio",
      REDIS_QUEUE_URL,
      format!("Set redis_socketio to {REDIS_QUEUE_URL} for backward compatibility"),
    ),
    ConfigWrite {
      parsed: true,
      ..ConfigWrite::new("developer_mode", "1", "Set developer_mode")
    },
  ]
}

/// Run `bench init` unless `<workdir>/<bench_name>` already exists
///
/// Failures of `bench init` are reported and yield [`InitOutcome::Failed`];
/// only an unrenderable command line is an error.
#[instrument(skip_all, fields(bench = %options.bench_name), level = "debug")]
pub fn init_bench_if_missing(
  options: &InstallOptions,
  workdir: &Path,
  runner: &dyn CommandRunner,
  log: &mut Logger,
) -> Result<InitOutcome> {
  let bench_dir = workdir.join(&options.bench_name);
  if bench_dir.exists() {
    log.warn("Bench already exists. Only site will be created");
    return Ok(InitOutcome::AlreadyExists);
  }

  let invocation = InitCommand::from_options(options).invocation(workdir)?;
  let command = invocation.args.last().map(String::as_str).unwrap_or_default();
  debug!("Init command: {command}");

  log.success(&format!(
    "Initializing bench with Frappe branch: {}",
    options.frappe_branch
  ));

  let output = match runner.run(&invocation) {
    Ok(output) => output,
    Err(err) => {
      log.error("Error during bench initialization:");
      log.error(&err.to_string());
      return Ok(InitOutcome::Failed);
    }
  };

  if !output.success() {
    log.error("Error during bench initialization:");
    log.error(&output.stderr);
    if output.stderr.contains(INVALID_REMOTE_MARKER) {
      log.error("This error usually means the specified branch doesn't exist.");
      log.warn("Use --list-branches to see available branches.");
    }
    return Ok(InitOutcome::Failed);
  }

  debug!("bench init output:\n{}", output.stdout);

  log.success("Configuring Bench ...");
  for write in global_config_writes(options) {
    write.apply(&bench_dir, runner, log);
  }

  Ok(InitOutcome::Initialized)
}
