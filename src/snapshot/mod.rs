//! Export of the target ref into an isolated temporary directory.
//!
//! Modified files are diffed against their prior version, which only exists
//! inside the target ref's tree. The export copies the repository's `.git`
//! into a temp directory and force-checks-out the ref there, leaving the
//! caller's working tree untouched.

use anyhow::Context;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use walkdir::WalkDir;

/// A checkout of a given ref in a temporary directory.
///
/// The directory lives as long as this value; it is removed on drop,
/// including when the run aborts with an error.
#[derive(Debug)]
pub struct SnapshotExport {
    directory: TempDir,
}

impl SnapshotExport {
    /// Exports `target_ref` from the repository at `repo_root`.
    ///
    /// A failed checkout is fatal: without the snapshot no modified file
    /// can be paired with its prior version.
    pub fn export(repo_root: &Path, target_ref: &str) -> anyhow::Result<Self> {
        let directory = TempDir::new().context("failed to create snapshot directory")?;

        copy_directory(&repo_root.join(".git"), &directory.path().join(".git"))?;

        let status = Command::new("git")
            .current_dir(directory.path())
            .args(["checkout", "-f", target_ref])
            .status()
            .context("failed to run git checkout for the snapshot export")?;

        if !status.success() {
            anyhow::bail!(
                "git checkout of '{}' into the snapshot directory failed with {}",
                target_ref,
                status
            );
        }

        Ok(Self { directory })
    }

    pub fn path(&self) -> &Path {
        self.directory.path()
    }
}

fn copy_directory(source: &Path, destination: &Path) -> anyhow::Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.with_context(|| format!("failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .context("walked entry outside the copied directory")?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
        } else {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(())
}
