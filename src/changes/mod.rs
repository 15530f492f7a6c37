//! Enumeration of files changed relative to a target git ref.
//!
//! Git itself is not reimplemented here; the enumerator shells out to the
//! `git` CLI and parses its `--name-status` output.

pub mod vi_filter;

use anyhow::Context;
use log::warn;
use std::path::Path;
use std::process::Command;

// https://regex101.com/r/EFVDVV/2
const NAME_STATUS_REGEX: &str = r"^([AM])\s+(.*)$";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
}

impl ChangeStatus {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "A" => Some(ChangeStatus::Added),
            "M" => Some(ChangeStatus::Modified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub status: ChangeStatus,
    pub path: String,
}

/// Files which have been added or modified compared to `target_ref`,
/// as reported by `git diff --name-status --diff-filter=AM <target_ref>...`.
///
/// A non-zero git exit is fatal: without the change list there is nothing
/// to diff.
pub fn changed_files(repo_root: &Path, target_ref: &str) -> anyhow::Result<Vec<ChangeRecord>> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["diff", "--name-status", "--diff-filter=AM"])
        .arg(format!("{target_ref}..."))
        .output()
        .context("failed to run git; is it on the PATH?")?;

    if !output.status.success() {
        anyhow::bail!(
            "git diff against '{}' failed with {}: {}",
            target_ref,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    parse_name_status(&String::from_utf8_lossy(&output.stdout))
}

/// Parses `--name-status` output into one record per line, preserving order.
///
/// Lines carrying a status letter other than A or M are skipped with a
/// warning; the diff filter should have kept them out in the first place.
pub fn parse_name_status(output: &str) -> anyhow::Result<Vec<ChangeRecord>> {
    let line_regex = regex::Regex::new(NAME_STATUS_REGEX)
        .with_context(|| format!("invalid name-status regex: {NAME_STATUS_REGEX}"))?;

    let mut records = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        match line_regex.captures(line) {
            Some(caps) => {
                // The capture group is restricted to [AM], so the letter
                // always maps to a known status.
                if let Some(status) = ChangeStatus::from_letter(&caps[1]) {
                    records.push(ChangeRecord {
                        status,
                        path: caps[2].to_string(),
                    });
                }
            }
            None => warn!("unknown change status, skipping line: {line}"),
        }
    }

    Ok(records)
}
