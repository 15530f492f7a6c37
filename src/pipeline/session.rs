//! The run itself: enumerate, filter, export, pair, invoke.

use crate::changes::vi_filter::{IgnorePatterns, ViFilter};
use crate::changes::{self, ChangeStatus};
use crate::jobs;
use crate::snapshot::SnapshotExport;
use crate::tool::gcli::{DiffInvoker, FailureLog};
use crate::tool::labview;
use anyhow::Context;
use colored::Colorize;
use derive_new::new;
use log::{error, info};
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything a run needs, passed explicitly rather than read from process
/// globals.
#[derive(Debug, Clone, new)]
pub struct DiffConfig {
    /// Year version of LabVIEW to drive, e.g. "2020".
    pub labview_version: String,
    /// Directory containing the DiffVI operation.
    pub opdir: PathBuf,
    /// Directory receiving rendered diffs and the failure log.
    pub diffdir: PathBuf,
    /// Git ref the diff is generated against.
    pub target_ref: String,
    /// Optional file of substring patterns to exclude.
    pub ignorefile: Option<PathBuf>,
    /// Tear LabVIEW down between diffs.
    pub kill_labview: bool,
}

pub struct Session {
    root: Box<Path>,
    config: DiffConfig,
    writer: RefCell<Box<dyn std::io::Write>>,
}

impl Session {
    pub fn new(
        root: &str,
        config: DiffConfig,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let root = Path::new(root)
            .canonicalize()
            .with_context(|| format!("repository root does not exist: {root}"))?;

        Ok(Session {
            root: root.into_boxed_path(),
            config,
            writer: RefCell::new(writer),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn writer(&self) -> RefMut<Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    /// Runs the whole pipeline. Setup failures (git diff, snapshot checkout,
    /// unresolvable LabVIEW install) are fatal; individual diff failures are
    /// recorded in the failure log and the run carries on.
    pub fn run(&self) -> anyhow::Result<()> {
        let filter = self.build_filter()?;
        let records = filter.retain(changes::changed_files(&self.root, &self.config.target_ref)?);

        let labview_exe = labview::labview_path_from_year(&self.config.labview_version)?;
        info!(
            "diffing {} file(s) against '{}' with LabVIEW at {}",
            records.len(),
            self.config.target_ref,
            labview_exe.display()
        );

        let snapshot = SnapshotExport::export(&self.root, &self.config.target_ref)?;

        std::fs::create_dir_all(&self.config.diffdir).with_context(|| {
            format!(
                "failed to create output directory: {}",
                self.config.diffdir.display()
            )
        })?;
        let output_dir = self
            .config
            .diffdir
            .canonicalize()
            .context("failed to resolve the output directory")?;

        let invoker = DiffInvoker::new(
            self.config.labview_version.clone(),
            self.config.opdir.clone(),
            output_dir.clone(),
            self.config.kill_labview,
        );
        let failure_log = FailureLog::new(&output_dir);

        for record in &records {
            match record.status {
                ChangeStatus::Added => {
                    writeln!(self.writer(), "Diffing added file: {}", record.path)?;
                }
                ChangeStatus::Modified => {
                    writeln!(self.writer(), "Diffing modified file: {}", record.path)?;
                }
            }

            let job = jobs::build_job(record, &self.root, snapshot.path())?;
            if let Err(err) = invoker.invoke(&job) {
                writeln!(
                    self.writer(),
                    "{}",
                    format!("Failed to diff {}.", job.new_vi.display()).red()
                )?;
                error!("{err:#}");
                failure_log.record(&job.new_vi)?;
            }
        }

        Ok(())
    }

    fn build_filter(&self) -> anyhow::Result<ViFilter> {
        match &self.config.ignorefile {
            Some(ignorefile) => {
                let patterns = IgnorePatterns::load(ignorefile)?;
                info!(
                    "ignore file {} with patterns: {:?}",
                    ignorefile.display(),
                    patterns.patterns()
                );
                ViFilter::new(Some(&patterns))
            }
            None => ViFilter::new(None),
        }
    }
}
