//! # Configuration File
//!
//! Optional `config.toml` holding defaults for installer options. Looked up in
//! the platform config directory (`$XDG_CONFIG_HOME/devbench/config.toml` on
//! Linux) unless an explicit path is given.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use crate::options::OptionLayer;

/// File name of the defaults file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the defaults file in the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
  ProjectDirs::from("", "", "devbench").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Parse option defaults from TOML text
pub fn parse_config(content: &str) -> Result<OptionLayer> {
  toml::from_str(content).context("Invalid devbench configuration")
}

/// Load option defaults from `path`
///
/// A missing file yields an empty layer; an unreadable or malformed file is
/// an error.
pub fn load_config(path: &Path) -> Result<OptionLayer> {
  if !path.exists() {
    debug!("No config file at {}", path.display());
    return Ok(OptionLayer::default());
  }

  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

  debug!("Loaded config from {}", path.display());
  parse_config(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
}

/// Load option defaults from `explicit` or, if not given, the default location
pub fn load_config_layer(explicit: Option<&Path>) -> Result<OptionLayer> {
  match explicit {
    Some(path) => load_config(path),
    None => match default_config_path() {
      Some(path) => load_config(&path),
      None => Ok(OptionLayer::default()),
    },
  }
}
