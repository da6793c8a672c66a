//! Test utilities shared across the devbench workspace
//!
//! This crate provides common testing infrastructure including:
//! - A scripted, recording command runner ([`RecordingRunner`])
//! - A branch lister with a fixed answer ([`FixedBranches`])
//! - A logger whose output can be inspected ([`captured_logger`])
//! - Scratch workspaces with optional pre-built benches ([`WorkspaceGuard`])
//! - Local git repositories with named branches ([`GitRepoTestGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod git;
pub mod output;
pub mod runner;
pub mod workspace;

// Re-export commonly used items
pub use git::GitRepoTestGuard;
pub use output::{CaptureBuffer, captured_color_logger, captured_logger};
pub use runner::{FixedBranches, RecordingRunner, Reply};
pub use workspace::WorkspaceGuard;
