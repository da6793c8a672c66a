//! # Site Creation
//!
//! Builds `bench new-site` for the selected database backend and installs
//! every auxiliary app already fetched into `<bench>/apps`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, instrument};

use crate::bench::ConfigWrite;
use crate::consts::{BENCH_EXECUTABLE, FRAPPE_APP};
use crate::options::{DbType, InstallOptions};
use crate::output::Logger;
use crate::process::{CommandRunner, Invocation, run_reported};

/// Names of the apps under `<bench_dir>/apps`, minus `frappe`, sorted
///
/// Fails if the directory cannot be read or `frappe` is missing from it,
/// since a successfully initialized bench always contains it.
pub fn discover_apps(bench_dir: &Path) -> Result<Vec<String>> {
  let apps_dir = bench_dir.join("apps");
  let entries = fs::read_dir(&apps_dir).with_context(|| format!("Failed to read {}", apps_dir.display()))?;

  let mut apps = Vec::new();
  for entry in entries {
    let entry = entry.with_context(|| format!("Failed to read an entry of {}", apps_dir.display()))?;
    if !entry.path().is_dir() {
      continue;
    }
    apps.push(entry.file_name().to_string_lossy().into_owned());
  }

  let Some(frappe) = apps.iter().position(|app| app == FRAPPE_APP) else {
    bail!("'{FRAPPE_APP}' is not installed in {}", apps_dir.display());
  };
  apps.swap_remove(frappe);
  apps.sort();

  Ok(apps)
}

/// The full `bench new-site` invocation for `options`, installing `apps`
pub fn new_site_invocation(options: &InstallOptions, apps: &[String], bench_dir: &Path) -> Invocation {
  let db_type = options.db_type;

  let mut invocation = Invocation::new(BENCH_EXECUTABLE)
    .arg("new-site")
    .arg(format!("--db-root-username={}", db_type.root_username()))
    .arg(format!("--db-host={}", db_type.host()))
    .arg(format!("--db-type={db_type}"));

  if db_type == DbType::Mariadb {
    invocation = invocation.arg("--mariadb-user-host-login-scope=%");
  }

  invocation
    .arg(format!("--db-root-password={}", options.db_root_password))
    .arg(format!("--admin-password={}", options.admin_password))
    .args(apps.iter().map(|app| format!("--install-app={app}")))
    .arg(options.site_name.clone())
    .current_dir(bench_dir)
}

/// Point the bench at the database container and create the site
///
/// The exit status of `bench new-site` is reported but not treated as an
/// error.
#[instrument(skip_all, fields(site = %options.site_name, db_type = %options.db_type), level = "debug")]
pub fn create_site(
  options: &InstallOptions,
  workdir: &Path,
  runner: &dyn CommandRunner,
  log: &mut Logger,
) -> Result<bool> {
  let bench_dir = workdir.join(&options.bench_name);

  ConfigWrite::db_host(options.db_type).apply(&bench_dir, runner, log);

  let apps = discover_apps(&bench_dir)?;
  debug!("Installing apps: {apps:?}");

  let invocation = new_site_invocation(options, &apps, &bench_dir);

  log.success(&format!("Creating Site {} ...", options.site_name));
  Ok(run_reported(
    runner,
    &invocation,
    &format!("{BENCH_EXECUTABLE} new-site"),
    log,
  ))
}
