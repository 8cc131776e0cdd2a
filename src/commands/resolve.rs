//! `port-rail resolve`: show what a sync would compute, never writes

use crate::core::context::RepoContext;
use crate::core::error::PortResult;
use crate::core::sync::VersionSynchronizer;
use crate::release::SyncPlan;

/// Run the resolve command
pub fn run_resolve(ctx: &RepoContext, json: bool) -> PortResult<()> {
  let vcs = ctx.open_vcs()?;
  let synchronizer = VersionSynchronizer::new(vcs.as_ref(), ctx.sync_settings());
  let plan = synchronizer.plan()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
  } else {
    print_plan(ctx, &plan);
  }

  Ok(())
}

fn print_plan(ctx: &RepoContext, plan: &SyncPlan) {
  println!("Upstream:       {} (at {})", plan.upstream, plan.upstream_revision);
  if plan.skipped_snapshots > 0 {
    println!("                skipped {} snapshot revision(s)", plan.skipped_snapshots);
  }
  println!(
    "Previous build: {} (committed in {})",
    plan.previous_build,
    ctx.config.derived.metadata.display()
  );
  println!("Next version:   {}", plan.next_version);
  if plan.dirty {
    println!("Working copy has local changes: `port-rail sync` will apply this version");
  } else {
    println!("Working copy is clean: `port-rail sync` will leave the metadata untouched");
  }
}
