//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const DESCRIPTOR: &str = "java/pom.xml";
pub const METADATA: &str = "csharp/PhoneNumbers/Properties/AssemblyInfo.cs";

/// A two-tree project (Java upstream, C# port) with git history
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create a project whose first commit has the given versions
  pub fn new(upstream_version: &str, assembly_version: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;

    let project = Self { _root: root, path };
    project.write_file("README.md", "# phonenumbers port\n")?;
    project.set_upstream_version(upstream_version)?;
    project.write_file(METADATA, &assembly_info(assembly_version))?;
    project.commit("Initial import")?;

    Ok(project)
  }

  /// Rewrite the upstream descriptor with `<version>{version}</version>`
  pub fn set_upstream_version(&self, version: &str) -> Result<()> {
    self.write_file(DESCRIPTOR, &pom(version))
  }

  /// Commit a new upstream version
  pub fn commit_upstream_version(&self, version: &str) -> Result<String> {
    self.set_upstream_version(version)?;
    self.commit(&format!("Upstream {}", version))
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "--allow-empty", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Leave an uncommitted modification to a tracked file
  pub fn make_dirty(&self) -> Result<()> {
    self.write_file("README.md", "# phonenumbers port\n\nlocal merge in progress\n")
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file = self.path.join(path);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file, content)?;
    Ok(())
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn metadata(&self) -> Result<String> {
    self.read_file(METADATA)
  }
}

pub fn pom(version: &str) -> String {
  format!(
    r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.googlecode.libphonenumber</groupId>
  <artifactId>libphonenumber-parent</artifactId>
  <version>{}</version>
</project>
"#,
    version
  )
}

pub fn assembly_info(version: &str) -> String {
  format!(
    r#"using System.Reflection;
using System.Runtime.InteropServices;

[assembly: AssemblyTitle("PhoneNumbers")]
[assembly: ComVisible(false)]
[assembly: AssemblyVersion("{v}")]
[assembly: AssemblyFileVersion("{v}")]
"#,
    v = version
  )
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

fn port_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_port-rail");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("PORT_RAIL_LOG")
    .output()
    .context("Failed to run port-rail")
}

/// Run port-rail CLI command, failing the test on non-zero exit
pub fn run_port_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = port_rail(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "port-rail command failed: port-rail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run port-rail CLI command that is expected to fail
pub fn run_port_rail_failing(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = port_rail(cwd, args)?;

  if output.status.success() {
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!("port-rail {} unexpectedly succeeded\nstdout: {}", args.join(" "), stdout);
  }

  Ok(output)
}
