//! Core engine for port-rail
//!
//! - **config**: `port-rail.toml` parsing and validation
//! - **context**: repository root + effective config, built once in main.rs
//! - **error**: error taxonomy with contextual help and exit codes
//! - **sync**: the version synchronizer
//! - **vcs**: version-control capability and the system git/hg backends

pub mod config;
pub mod context;
pub mod error;
pub mod sync;
pub mod vcs;
