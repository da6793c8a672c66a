//! # Installer Options
//!
//! The resolved, immutable option record the installer runs with, and the
//! partially-filled layers (command line, config file) it is resolved from.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
  DEFAULT_ADMIN_PASSWORD, DEFAULT_APPS_JSON, DEFAULT_BENCH_NAME, DEFAULT_DB_ROOT_PASSWORD, DEFAULT_FRAPPE_BRANCH,
  DEFAULT_FRAPPE_REPO, DEFAULT_SITE_NAME, MARIADB_HOST, POSTGRES_HOST,
};

/// Database backend a new site is bound to
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
  Mariadb,
  #[default]
  Postgres,
}

impl DbType {
  /// Value passed to `--db-type` and written as `db_type`
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Mariadb => "mariadb",
      Self::Postgres => "postgres",
    }
  }

  /// Service hostname of the database container
  pub const fn host(self) -> &'static str {
    match self {
      Self::Mariadb => MARIADB_HOST,
      Self::Postgres => POSTGRES_HOST,
    }
  }

  /// Superuser account used to create the site database
  pub const fn root_username(self) -> &'static str {
    match self {
      Self::Mariadb => "root",
      Self::Postgres => "postgres",
    }
  }
}

impl fmt::Display for DbType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Fully resolved installer options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
  pub apps_json: PathBuf,
  pub bench_name: String,
  pub site_name: String,
  pub frappe_repo: String,
  pub frappe_branch: String,
  pub py_version: Option<String>,
  pub node_version: Option<String>,
  pub verbose: bool,
  pub admin_password: String,
  pub db_root_password: String,
  pub db_type: DbType,
  pub list_branches: bool,
}

impl Default for InstallOptions {
  fn default() -> Self {
    Self {
      apps_json: PathBuf::from(DEFAULT_APPS_JSON),
      bench_name: DEFAULT_BENCH_NAME.to_string(),
      site_name: DEFAULT_SITE_NAME.to_string(),
      frappe_repo: DEFAULT_FRAPPE_REPO.to_string(),
      frappe_branch: DEFAULT_FRAPPE_BRANCH.to_string(),
      py_version: None,
      node_version: None,
      verbose: false,
      admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
      db_root_password: DEFAULT_DB_ROOT_PASSWORD.to_string(),
      db_type: DbType::default(),
      list_branches: false,
    }
  }
}

/// A partially specified set of options
///
/// The command line and the config file each produce one layer; layers are
/// stacked with [`OptionLayer::or`] and the result is filled in with the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionLayer {
  pub apps_json: Option<PathBuf>,
  pub bench_name: Option<String>,
  pub site_name: Option<String>,
  pub frappe_repo: Option<String>,
  pub frappe_branch: Option<String>,
  pub py_version: Option<String>,
  pub node_version: Option<String>,
  pub admin_password: Option<String>,
  pub db_root_password: Option<String>,
  pub db_type: Option<DbType>,
}

impl OptionLayer {
  /// Keep every value set in `self`, taking the rest from `fallback`
  pub fn or(self, fallback: OptionLayer) -> Self {
    Self {
      apps_json: self.apps_json.or(fallback.apps_json),
      bench_name: self.bench_name.or(fallback.bench_name),
      site_name: self.site_name.or(fallback.site_name),
      frappe_repo: self.frappe_repo.or(fallback.frappe_repo),
      frappe_branch: self.frappe_branch.or(fallback.frappe_branch),
      py_version: self.py_version.or(fallback.py_version),
      node_version: self.node_version.or(fallback.node_version),
      admin_password: self.admin_password.or(fallback.admin_password),
      db_root_password: self.db_root_password.or(fallback.db_root_password),
      db_type: self.db_type.or(fallback.db_type),
    }
  }
}

impl InstallOptions {
  /// Resolve a layer against the built-in defaults
  ///
  /// `verbose` and `list_branches` only exist as command-line flags.
  pub fn resolve(layer: OptionLayer, verbose: bool, list_branches: bool) -> Self {
    let defaults = Self::default();
    Self {
      apps_json: layer.apps_json.unwrap_or(defaults.apps_json),
      bench_name: layer.bench_name.unwrap_or(defaults.bench_name),
      site_name: layer.site_name.unwrap_or(defaults.site_name),
      frappe_repo: layer.frappe_repo.unwrap_or(defaults.frappe_repo),
      frappe_branch: layer.frappe_branch.unwrap_or(defaults.frappe_branch),
      py_version: layer.py_version.filter(|v| !v.is_empty()),
      node_version: layer.node_version.filter(|v| !v.is_empty()),
      verbose,
      admin_password: layer.admin_password.unwrap_or(defaults.admin_password),
      db_root_password: layer.db_root_password.unwrap_or(defaults.db_root_password),
      db_type: layer.db_type.unwrap_or(defaults.db_type),
      list_branches,
    }
  }
}
