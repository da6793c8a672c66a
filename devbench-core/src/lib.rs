//! # devbench core
//!
//! Everything the installer does between parsing arguments and exiting:
//! colorized status output, option resolution, subprocess execution, remote
//! branch discovery and validation, bench initialization, and site creation.

pub mod bench;
pub mod branches;
pub mod config;
pub mod consts;
pub mod git;
pub mod installer;
pub mod options;
pub mod output;
pub mod process;
pub mod site;

pub use branches::{BranchDiscovery, BranchLister, validate_branch};
pub use installer::{Installer, RunOutcome};
pub use options::{DbType, InstallOptions, OptionLayer};
pub use output::{ColorMode, Level, Logger};
pub use process::{CommandOutput, CommandRunner, Invocation, ProcessError, SystemRunner};
