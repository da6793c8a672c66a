//! # GitHub API Endpoints
//!
//! Endpoint implementations, one module per GitHub API resource type.

pub mod branches;
