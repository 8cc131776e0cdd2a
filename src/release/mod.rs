//! Version values and the text formats they live in
//!
//! - **version**: upstream `major.minor[-SNAPSHOT]` and derived `a.b.c.d` values
//! - **descriptor**: reading the upstream `<version>` element
//! - **metadata**: reading and rewriting the derived version attributes
//! - **plan**: the resolved result of a sync run

pub mod descriptor;
pub mod metadata;
pub mod plan;
pub mod version;

pub use plan::{ResolvedUpstream, SyncPlan};
pub use version::DerivedVersion;
