//! # Command Line Interface
//!
//! Defines the installer's flags and wires the parsed values to the real
//! subprocess runner, GitHub client, and installer driver.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser};
use devbench_core::config::load_config_layer;
use devbench_core::{BranchDiscovery, ColorMode, DbType, InstallOptions, Installer, Logger, OptionLayer, SystemRunner};
use devbench_gh::GitHubClient;
use tracing::{debug, info};

const LONG_VERSION: &str = concat!(
  env!("CARGO_PKG_VERSION"),
  " (",
  env!("GIT_HASH"),
  " ",
  env!("TARGET"),
  ")"
);

/// Install a Frappe bench and create a development site
#[derive(Parser, Debug)]
#[command(name = "devbench")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Bootstrap a Frappe bench and development site")]
#[command(
  long_about = "Initializes a Frappe bench inside the dev container (unless it already exists),\n\
        points it at the container's redis and database services, and creates a\n\
        development site with every fetched app installed.\n\n\
        Defaults can be overridden in config.toml under the devbench config directory\n\
        or in a file given with --config; flags always win."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = LONG_VERSION)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Path to apps.json, passed to bench init [default: apps-example.json]
  #[arg(short = 'j', long = "apps-json", value_name = "PATH")]
  pub apps_json: Option<PathBuf>,

  /// Bench directory to create or reuse [default: frappe-bench]
  #[arg(short = 'b', long = "bench-name", value_name = "NAME")]
  pub bench_name: Option<String>,

  /// Site to create [default: development.localhost]
  #[arg(short = 's', long = "site-name", value_name = "NAME")]
  pub site_name: Option<String>,

  /// Repository to fetch frappe from [default: https://github.com/sin-ev/backend]
  #[arg(short = 'r', long = "frappe-repo", value_name = "URL")]
  pub frappe_repo: Option<String>,

  /// Branch of the frappe repository to check out [default: version-12]
  #[arg(short = 't', long = "frappe-branch", value_name = "BRANCH")]
  pub frappe_branch: Option<String>,

  /// Python version exported as PYENV_VERSION for bench init
  #[arg(short = 'p', long = "py-version", value_name = "VERSION")]
  pub py_version: Option<String>,

  /// Node version activated with nvm before bench init
  #[arg(short = 'n', long = "node-version", value_name = "VERSION")]
  pub node_version: Option<String>,

  /// Pass --verbose to bench init
  #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
  pub verbose: bool,

  /// Administrator password of the new site [default: 123]
  #[arg(short = 'a', long = "admin-password", value_name = "PASSWORD")]
  pub admin_password: Option<String>,

  /// Database backend of the new site [default: postgres]
  #[arg(short = 'd', long = "db-type", value_enum, ignore_case = true)]
  pub db_type: Option<DbType>,

  /// Root password of the database server [default: 123]
  #[arg(long = "db-root-password", value_name = "PASSWORD")]
  pub db_root_password: Option<String>,

  /// Print the branches of the frappe repository and exit
  #[arg(long = "list-branches", action = ArgAction::SetTrue)]
  pub list_branches: bool,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Read option defaults from this file instead of the default location
  #[arg(long, value_name = "PATH")]
  pub config: Option<PathBuf>,
}

impl Cli {
  /// The option values given on the command line
  pub fn to_layer(&self) -> OptionLayer {
    OptionLayer {
      apps_json: self.apps_json.clone(),
      bench_name: self.bench_name.clone(),
      site_name: self.site_name.clone(),
      frappe_repo: self.frappe_repo.clone(),
      frappe_branch: self.frappe_branch.clone(),
      py_version: self.py_version.clone(),
      node_version: self.node_version.clone(),
      admin_password: self.admin_password.clone(),
      db_root_password: self.db_root_password.clone(),
      db_type: self.db_type,
    }
  }

  /// Merge the command line over the config file and the built-in defaults
  pub fn resolve_options(&self) -> Result<InstallOptions> {
    let file_layer = load_config_layer(self.config.as_deref())?;
    Ok(InstallOptions::resolve(
      self.to_layer().or(file_layer),
      self.verbose,
      self.list_branches,
    ))
  }
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  let options = cli.resolve_options()?;
  debug!(
    bench = %options.bench_name,
    site = %options.site_name,
    branch = %options.frappe_branch,
    db_type = %options.db_type,
    "Resolved options"
  );

  let workdir = env::current_dir().context("Failed to determine the working directory")?;
  let runner = SystemRunner::new()?;
  let github = GitHubClient::from_env().context("Failed to create GitHub client")?;
  let discovery = BranchDiscovery::new(github, &runner)?;
  let mut log = Logger::stdout(cli.colors);

  let outcome = Installer::new(&options, workdir, &runner, &discovery).run(&mut log)?;
  info!("Run finished: {outcome:?}");

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use clap::CommandFactory;
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_short_flags() {
    let cli = Cli::try_parse_from([
      "devbench",
      "-j",
      "apps.json",
      "-b",
      "erp-bench",
      "-s",
      "erp.localhost",
      "-r",
      "https://github.com/frappe/frappe",
      "-t",
      "version-15",
      "-p",
      "3.11",
      "-n",
      "18",
      "-v",
      "-a",
      "admin",
      "-d",
      "mariadb",
    ])
    .unwrap();

    let layer = cli.to_layer();
    assert_eq!(layer.apps_json, Some(PathBuf::from("apps.json")));
    assert_eq!(layer.bench_name.as_deref(), Some("erp-bench"));
    assert_eq!(layer.site_name.as_deref(), Some("erp.localhost"));
    assert_eq!(layer.frappe_repo.as_deref(), Some("https://github.com/frappe/frappe"));
    assert_eq!(layer.frappe_branch.as_deref(), Some("version-15"));
    assert_eq!(layer.py_version.as_deref(), Some("3.11"));
    assert_eq!(layer.node_version.as_deref(), Some("18"));
    assert_eq!(layer.admin_password.as_deref(), Some("admin"));
    assert_eq!(layer.db_type, Some(DbType::Mariadb));
    assert!(cli.verbose);
    assert!(!cli.list_branches);
  }

  #[test]
  fn test_no_flags_leave_layer_empty() {
    let cli = Cli::try_parse_from(["devbench"]).unwrap();

    let layer = cli.to_layer();
    assert!(layer.bench_name.is_none());
    assert!(layer.db_type.is_none());
    assert!(layer.db_root_password.is_none());
    assert_eq!(cli.colors, ColorMode::Auto);
  }

  #[test]
  fn test_db_type_is_restricted() {
    assert!(Cli::try_parse_from(["devbench", "--db-type", "sqlite"]).is_err());
    let cli = Cli::try_parse_from(["devbench", "--db-type", "Postgres"]).unwrap();
    assert_eq!(cli.db_type, Some(DbType::Postgres));
  }

  #[test]
  fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(
      &config,
      "bench_name = \"from-file\"\nsite_name = \"file.localhost\"\ndb_type = \"mariadb\"\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
      "devbench",
      "--config",
      config.to_str().unwrap(),
      "--bench-name",
      "from-flag",
      "--list-branches",
    ])
    .unwrap();
    let options = cli.resolve_options().unwrap();

    assert_eq!(options.bench_name, "from-flag");
    assert_eq!(options.site_name, "file.localhost");
    assert_eq!(options.db_type, DbType::Mariadb);
    assert_eq!(options.frappe_branch, "version-12");
    assert!(options.list_branches);
  }

  #[test]
  fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "bench_name = [").unwrap();

    let cli = Cli::try_parse_from(["devbench", "--config", config.to_str().unwrap()]).unwrap();

    assert!(cli.resolve_options().is_err());
  }
}
