//! Invocation of g-cli running the DiffVI operation, plus the run-scoped
//! failure log.
//!
//! One VI failing to diff must not abort the batch: invocation errors are
//! returned to the caller for recording, never propagated as fatal.

use crate::jobs::DiffJob;
use anyhow::Context;
use derive_new::new;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const GCLI_EXECUTABLE: &str = "g-cli";
pub const DIFF_OPERATION_VI: &str = "DiffVI.vi";
pub const FAILURE_LOG_NAME: &str = "diff_failures.txt";

/// Runs the DiffVI operation under a chosen LabVIEW version, one subprocess
/// per job, blocking until each exits.
#[derive(Debug, new)]
pub struct DiffInvoker {
    labview_version: String,
    opdir: PathBuf,
    output_dir: PathBuf,
    kill_labview: bool,
}

impl DiffInvoker {
    /// Diffs one old/new pair. An error here means this VI could not be
    /// diffed; the run as a whole is unaffected.
    pub fn invoke(&self, job: &DiffJob) -> anyhow::Result<()> {
        let mut command = self.command(job);

        let status = command
            .status()
            .with_context(|| format!("failed to spawn {GCLI_EXECUTABLE}"))?;

        if !status.success() {
            anyhow::bail!(
                "{} exited with {} for {}",
                GCLI_EXECUTABLE,
                status,
                job.new_vi.display()
            );
        }

        Ok(())
    }

    fn command(&self, job: &DiffJob) -> Command {
        let mut command = Command::new(GCLI_EXECUTABLE);
        command
            .arg("--lv-ver")
            .arg(&self.labview_version)
            .arg("--x64");

        // Whether LabVIEW must be torn down between diffs is still unclear;
        // killing it makes diff generation very slow, so it is opt-in.
        if self.kill_labview {
            command.arg("--kill");
        }

        command
            .arg(self.opdir.join(DIFF_OPERATION_VI))
            .arg("--")
            .arg("-NewVI")
            .arg(&job.new_vi)
            .arg("-OutputDir")
            .arg(&self.output_dir);

        if let Some(old_vi) = &job.old_vi {
            command.arg("-OldVI").arg(old_vi);
        }

        command
    }
}

/// Append-only record of VIs that failed to diff, one path per line,
/// persisted across runs in the output directory.
#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(FAILURE_LOG_NAME),
        }
    }

    pub fn record(&self, new_vi: &Path) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open failure log: {}", self.path.display()))?;

        writeln!(file, "{}", new_vi.display())
            .with_context(|| format!("failed to append to failure log: {}", self.path.display()))
    }
}
