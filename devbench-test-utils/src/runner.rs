//! Scripted collaborators for driving the installer without `bench`, `git`,
//! or the network

use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use devbench_core::{BranchLister, CommandOutput, CommandRunner, Invocation, Logger, ProcessError};

use crate::workspace::create_bench_at;

/// Canned answer for a matched invocation
#[derive(Debug, Clone)]
pub enum Reply {
  Output(CommandOutput),
  /// The child outlived its timeout
  TimedOut,
  /// The program could not be launched
  NotFound,
}

impl Reply {
  fn produce(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    match self {
      Self::Output(output) => Ok(output.clone()),
      Self::TimedOut => Err(ProcessError::TimedOut {
        program: invocation.program.clone(),
        timeout: invocation.timeout.unwrap_or(Duration::from_secs(30)),
      }),
      Self::NotFound => Err(ProcessError::Spawn {
        program: invocation.program.clone(),
        source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
      }),
    }
  }
}

type Matcher = Box<dyn Fn(&Invocation) -> bool>;
type Hook = Box<dyn Fn(&Invocation)>;

struct Rule {
  matcher: Matcher,
  reply: Reply,
  hook: Option<Hook>,
}

/// Records every invocation and answers from a list of rules
///
/// The first matching rule wins; unmatched invocations succeed with empty
/// output.
#[derive(Default)]
pub struct RecordingRunner {
  rules: Vec<Rule>,
  calls: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Answer invocations matching `matcher` with `reply`
  pub fn reply_when(mut self, matcher: impl Fn(&Invocation) -> bool + 'static, reply: Reply) -> Self {
    self.rules.push(Rule {
      matcher: Box::new(matcher),
      reply,
      hook: None,
    });
    self
  }

  /// Like [`RecordingRunner::reply_when`], also running `hook` for its side
  /// effects before replying
  pub fn reply_with_hook(
    mut self,
    matcher: impl Fn(&Invocation) -> bool + 'static,
    reply: Reply,
    hook: impl Fn(&Invocation) + 'static,
  ) -> Self {
    self.rules.push(Rule {
      matcher: Box::new(matcher),
      reply,
      hook: Some(Box::new(hook)),
    });
    self
  }

  /// Make `bench init` succeed and leave a bench with `apps` at `bench_dir`
  pub fn with_successful_init(self, bench_dir: PathBuf, apps: &[&str]) -> Self {
    let apps: Vec<String> = apps.iter().map(|app| (*app).to_string()).collect();
    self.reply_with_hook(is_bench_init, Reply::Output(CommandOutput::ok()), move |_| {
      let names: Vec<&str> = apps.iter().map(String::as_str).collect();
      create_bench_at(&bench_dir, &names);
    })
  }

  /// Make `bench init` exit nonzero with `stderr`
  pub fn with_failed_init(self, stderr: &str) -> Self {
    let output = CommandOutput::exited(1).with_stderr(stderr);
    self.reply_when(is_bench_init, Reply::Output(output))
  }

  /// Every invocation so far, in order
  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.borrow().clone()
  }

  /// Every invocation rendered as a command line
  pub fn command_lines(&self) -> Vec<String> {
    self.calls.borrow().iter().map(ToString::to_string).collect()
  }

  /// `bench set-config` invocations as `(flag, key, value)`
  pub fn config_writes(&self) -> Vec<(String, String, String)> {
    self
      .calls
      .borrow()
      .iter()
      .filter(|invocation| is_bench_subcommand(invocation, "set-config"))
      .filter_map(|invocation| match invocation.args.as_slice() {
        [_, flag, key, value] => Some((flag.clone(), key.clone(), value.clone())),
        _ => None,
      })
      .collect()
  }
}

impl CommandRunner for RecordingRunner {
  fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    self.calls.borrow_mut().push(invocation.clone());

    match self.rules.iter().find(|rule| (rule.matcher)(invocation)) {
      Some(rule) => {
        if let Some(hook) = &rule.hook {
          hook(invocation);
        }
        rule.reply.produce(invocation)
      }
      None => Ok(CommandOutput::ok()),
    }
  }
}

/// `bash -i -c "... bench init ..."`
pub fn is_bench_init(invocation: &Invocation) -> bool {
  invocation.program.ends_with("bash") && invocation.args.last().is_some_and(|command| command.contains("bench init"))
}

/// `bench <subcommand> ...`
pub fn is_bench_subcommand(invocation: &Invocation, subcommand: &str) -> bool {
  invocation.program == "bench" && invocation.args.first().is_some_and(|arg| arg == subcommand)
}

/// `git ls-remote ...`
pub fn is_ls_remote(invocation: &Invocation) -> bool {
  invocation.program.starts_with("git") && invocation.args.first().is_some_and(|arg| arg == "ls-remote")
}

/// A branch lister with a fixed answer that counts how often it was asked
#[derive(Default)]
pub struct FixedBranches {
  branches: Vec<String>,
  calls: Cell<usize>,
}

impl FixedBranches {
  pub fn new(branches: &[&str]) -> Self {
    Self {
      branches: branches.iter().map(|branch| (*branch).to_string()).collect(),
      calls: Cell::new(0),
    }
  }

  /// Discovery that found nothing
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn calls(&self) -> usize {
    self.calls.get()
  }
}

impl BranchLister for FixedBranches {
  fn list_branches(&self, _repo_url: &str, _log: &mut Logger) -> Vec<String> {
    self.calls.set(self.calls.get() + 1);
    self.branches.clone()
  }
}
