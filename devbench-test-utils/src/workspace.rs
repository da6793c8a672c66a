//! Scratch working directories
//!
//! The installer takes its working directory explicitly, so tests never need
//! to change the process-wide current directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory standing in for the dev container workspace
pub struct WorkspaceGuard {
  pub temp_dir: TempDir,
}

impl Default for WorkspaceGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl WorkspaceGuard {
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    Self { temp_dir }
  }

  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }

  /// Path of a bench directory inside the workspace
  pub fn bench_dir(&self, bench_name: &str) -> PathBuf {
    self.temp_dir.path().join(bench_name)
  }

  /// Lay out `<bench_name>/apps/<app>` for each app, as `bench init` would
  pub fn create_bench(&self, bench_name: &str, apps: &[&str]) -> PathBuf {
    create_bench_at(&self.bench_dir(bench_name), apps);
    self.bench_dir(bench_name)
  }
}

/// Create a bench layout at `bench_dir`
pub fn create_bench_at(bench_dir: &Path, apps: &[&str]) {
  let apps_dir = bench_dir.join("apps");
  fs::create_dir_all(&apps_dir).expect("Failed to create apps directory");
  for app in apps {
    fs::create_dir_all(apps_dir.join(app)).expect("Failed to create app directory");
  }
}
