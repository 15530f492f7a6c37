//! Pairing of old/new VI paths for the external diff tool.

use crate::changes::{ChangeRecord, ChangeStatus};
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Prefix added to the snapshot copy of a modified file. LabVIEW refuses to
/// hold two VIs with the same filename in memory at once, so the prior
/// version has to be renamed before both can be opened.
pub const OLD_COPY_PREFIX: &str = "_COPY_";

/// One invocation of the external diff tool. `old_vi` is absent for files
/// that were added rather than modified.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DiffJob {
    pub old_vi: Option<PathBuf>,
    pub new_vi: PathBuf,
}

/// Builds the diff job for a single change record.
///
/// For a modified file the prior version is copied beside itself inside the
/// snapshot under the renamed path. The copy is not perfect - the VIs it
/// references still resolve to the new versions of its dependencies - but it
/// is better than nothing. A failed copy is fatal since the pairing cannot
/// be produced without it.
pub fn build_job(
    record: &ChangeRecord,
    repo_root: &Path,
    snapshot_root: &Path,
) -> anyhow::Result<DiffJob> {
    let new_vi = repo_root.join(&record.path);

    match record.status {
        ChangeStatus::Added => Ok(DiffJob::new(None, new_vi)),
        ChangeStatus::Modified => {
            let old_vi = snapshot_root.join(&record.path);
            let file_name = old_vi
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("changed path has no filename: {}", record.path))?;

            let renamed = old_vi.with_file_name(format!("{OLD_COPY_PREFIX}{file_name}"));
            std::fs::copy(&old_vi, &renamed).with_context(|| {
                format!(
                    "failed to copy the prior version of {} to {}",
                    old_vi.display(),
                    renamed.display()
                )
            })?;

            Ok(DiffJob::new(Some(renamed), new_vi))
        }
    }
}
