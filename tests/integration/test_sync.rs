//! Integration tests for `port-rail sync`

use crate::helpers::{METADATA, TestProject, assembly_info, git, run_port_rail, run_port_rail_failing};
use anyhow::Result;

#[test]
fn test_sync_bumps_build_on_dirty_copy() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  project.make_dirty()?;

  let output = run_port_rail(&project.path, &["sync"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("4.7.0.119"), "should report new version, got: {}", stdout);
  assert_eq!(project.metadata()?, assembly_info("4.7.0.119"));

  Ok(())
}

#[test]
fn test_sync_is_noop_on_clean_copy() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  let before = project.metadata()?;

  let output = run_port_rail(&project.path, &["sync"])?;

  assert!(output.stdout.is_empty(), "clean copy should print nothing");
  assert_eq!(project.metadata()?, before);

  Ok(())
}

#[test]
fn test_untracked_files_do_not_count_as_changes() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  project.write_file("scratch.txt", "not tracked")?;

  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(project.metadata()?, assembly_info("4.6.0.118"));

  Ok(())
}

#[test]
fn test_sync_ignores_uncommitted_metadata_edits() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  // The metadata edit itself makes the copy dirty
  project.write_file(METADATA, &assembly_info("4.6.0.500"))?;

  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(project.metadata()?, assembly_info("4.7.0.119"));

  Ok(())
}

#[test]
fn test_repeated_sync_is_byte_stable() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  project.make_dirty()?;

  run_port_rail(&project.path, &["sync"])?;
  let first = std::fs::read(project.path.join(METADATA))?;

  let output = run_port_rail(&project.path, &["sync"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Already at 4.7.0.119"), "got: {}", stdout);
  assert_eq!(std::fs::read(project.path.join(METADATA))?, first);

  Ok(())
}

#[test]
fn test_build_advances_once_per_commit() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  project.make_dirty()?;
  run_port_rail(&project.path, &["sync"])?;
  project.commit("Release 4.7.0.119")?;

  project.make_dirty()?;
  project.write_file("README.md", "# phonenumbers port\n\nnext merge\n")?;
  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(project.metadata()?, assembly_info("4.7.0.120"));

  Ok(())
}

#[test]
fn test_sync_skips_snapshot_revisions() -> Result<()> {
  let project = TestProject::new("2.1", "2.1.0.30")?;
  project.commit_upstream_version("2.2")?;
  project.commit_upstream_version("2.3-SNAPSHOT")?;
  project.commit("More work on 2.3")?;
  project.make_dirty()?;

  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(project.metadata()?, assembly_info("2.2.0.31"));

  Ok(())
}

#[test]
fn test_sync_follows_first_parent_only() -> Result<()> {
  let project = TestProject::new("3.0", "3.0.0.5")?;
  project.commit_upstream_version("3.1-SNAPSHOT")?;

  // Side branch that released 3.1 and was merged back while main stayed on the snapshot
  git(&project.path, &["checkout", "-b", "side", "HEAD~1"])?;
  project.commit_upstream_version("9.9")?;
  git(&project.path, &["checkout", "main"])?;
  git(&project.path, &["merge", "--no-ff", "-s", "ours", "-m", "Merge side", "side"])?;
  project.make_dirty()?;

  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(project.metadata()?, assembly_info("3.0.0.6"));

  Ok(())
}

#[test]
fn test_traversal_cap_fails_without_writing() -> Result<()> {
  let project = TestProject::new("5.0", "5.0.0.1")?;
  project.commit_upstream_version("5.1-SNAPSHOT")?;
  project.commit("Work")?;
  project.commit("More work")?;
  project.make_dirty()?;

  let output = run_port_rail_failing(&project.path, &["sync", "--max-depth", "1"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr.contains("Upstream release not found"), "got: {}", stderr);
  assert_eq!(project.metadata()?, assembly_info("5.0.0.1"));

  Ok(())
}

#[test]
fn test_malformed_descriptor_fails_without_writing() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  project.write_file("java/pom.xml", "<project><artifactId>x</artifactId></project>\n")?;
  project.commit("Break the pom")?;
  project.make_dirty()?;

  let output = run_port_rail_failing(&project.path, &["sync"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr.contains("java/pom.xml"), "error should name the file: {}", stderr);
  assert_eq!(project.metadata()?, assembly_info("4.6.0.118"));

  Ok(())
}

#[test]
fn test_missing_repository_is_infrastructure_error() -> Result<()> {
  let dir = tempfile::TempDir::new()?;

  let output = run_port_rail_failing(dir.path(), &["sync", "--vcs", "git"])?;

  assert_eq!(output.status.code(), Some(2));

  Ok(())
}

#[test]
fn test_sync_with_custom_layout() -> Result<()> {
  let project = TestProject::new("1.4", "1.3.0.9")?;
  project.write_file("upstream/pom.xml", &crate::helpers::pom("1.5"))?;
  project.write_file("port/Version.cs", "[assembly: AssemblyVersion(\"1.3.0.9\")]\n")?;
  project.write_file(
    "port-rail.toml",
    r#"
[upstream]
descriptor = "upstream/pom.xml"

[derived]
metadata = "port/Version.cs"
attributes = ["AssemblyVersion"]
"#,
  )?;
  project.commit("Move trees")?;
  project.make_dirty()?;

  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(project.read_file("port/Version.cs")?, "[assembly: AssemblyVersion(\"1.5.0.10\")]\n");
  // Default location left alone
  assert_eq!(project.metadata()?, assembly_info("1.3.0.9"));

  Ok(())
}

#[test]
fn test_sync_from_subdirectory_with_root_flag() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  project.make_dirty()?;
  let root = project.path.to_string_lossy().to_string();

  run_port_rail(&project.path.join("csharp"), &["sync", "--root", &root])?;

  assert_eq!(project.metadata()?, assembly_info("4.7.0.119"));

  Ok(())
}

#[test]
fn test_history_of_only_snapshots_is_exhausted() -> Result<()> {
  let project = TestProject::new("1.0-SNAPSHOT", "0.9.0.1")?;
  project.make_dirty()?;

  let output = run_port_rail_failing(&project.path, &["sync"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr);
  assert!(stderr.contains("Upstream release not found"), "got: {}", stderr);
  assert_eq!(project.metadata()?, assembly_info("0.9.0.1"));

  Ok(())
}

#[test]
fn test_sync_preserves_latin1_metadata() -> Result<()> {
  let project = TestProject::new("4.7", "4.6.0.118")?;
  let latin1 = |version: &str| -> Vec<u8> {
    let mut bytes = b"[assembly: AssemblyCopyright(\"Copyright \xA9 2011\")]\r\n".to_vec();
    bytes.extend_from_slice(format!("[assembly: AssemblyVersion(\"{}\")]\r\n", version).as_bytes());
    bytes
  };
  std::fs::write(project.path.join(METADATA), latin1("4.6.0.118"))?;
  project.commit("Latin-1 metadata")?;
  project.make_dirty()?;

  run_port_rail(&project.path, &["sync"])?;

  assert_eq!(std::fs::read(project.path.join(METADATA))?, latin1("4.7.0.119"));

  Ok(())
}
