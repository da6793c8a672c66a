//! # devbench CLI Entry Point
//!
//! Installs a Frappe bench and a development site in the current directory.

use std::io;

use anyhow::Result;
use clap::Parser;
use devbench_cli::cli::{Cli, handle_cli};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
  let cmd = Cli::parse();

  // Diagnostics go to stderr so they never mix with the status lines
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(io::stderr))
    .with(filter)
    .init();

  debug!("Tracing initialized");

  handle_cli(cmd)
}
