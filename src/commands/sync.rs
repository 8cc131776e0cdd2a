//! `port-rail sync`: bump the derived version against upstream history

use crate::core::context::RepoContext;
use crate::core::error::PortResult;
use crate::core::sync::{SyncOutcome, VersionSynchronizer};

/// Run the sync command
pub fn run_sync(ctx: &RepoContext) -> PortResult<()> {
  let vcs = ctx.open_vcs()?;
  let synchronizer = VersionSynchronizer::new(vcs.as_ref(), ctx.sync_settings());

  match synchronizer.synchronize()? {
    // Silent on a clean checkout; the log line is enough
    SyncOutcome::CleanWorkingCopy => {}
    SyncOutcome::Unchanged(version) => println!("Already at {}", version),
    SyncOutcome::Updated(version) => println!("Updating to {}", version),
  }

  Ok(())
}
