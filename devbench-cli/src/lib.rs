//! # devbench CLI Library
//!
//! Argument surface and wiring for the devbench installer binary.

pub mod cli;
