//! CLI commands for port-rail
//!
//! - **sync**: rewrite the derived metadata with the next build number
//! - **resolve**: print the resolved versions without writing anything
//!
//! All commands accept `&RepoContext` so config is loaded once.

pub mod resolve;
pub mod sync;

pub use resolve::run_resolve;
pub use sync::run_sync;
