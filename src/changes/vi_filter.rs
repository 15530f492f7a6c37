//! Narrows a change list down to the VI-family files worth diffing.

use crate::changes::ChangeRecord;
use anyhow::Context;
use std::path::Path;

// https://regex101.com/r/W3riqw/1
const VI_EXTENSION_REGEX: &str = r"^.*\.vi[tm]?$";

/// Substring patterns excluded from diffing, e.g. files generated by the
/// DQMH scripter. Read from a newline-separated file, one pattern per line.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns(Vec<String>);

impl IgnorePatterns {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ignore file: {}", path.display()))?;

        Ok(Self(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.0
    }
}

/// Retains paths with a `.vi`, `.vit` or `.vim` extension (case-sensitive),
/// excluding any path that contains an ignore pattern as a substring.
#[derive(Debug)]
pub struct ViFilter {
    extension: regex::Regex,
    ignore: Option<regex::Regex>,
}

impl ViFilter {
    pub fn new(patterns: Option<&IgnorePatterns>) -> anyhow::Result<Self> {
        let extension = regex::Regex::new(VI_EXTENSION_REGEX)
            .with_context(|| format!("invalid extension regex: {VI_EXTENSION_REGEX}"))?;

        // The regex crate has no lookahead, so instead of the combined
        // negative-lookahead form the exclusion is a separate alternation
        // of escaped patterns matched anywhere in the path.
        let ignore = match patterns {
            Some(patterns) if !patterns.is_empty() => {
                let alternation = patterns
                    .patterns()
                    .iter()
                    .map(|pattern| regex::escape(pattern))
                    .collect::<Vec<_>>()
                    .join("|");

                Some(
                    regex::Regex::new(&alternation)
                        .with_context(|| format!("invalid ignore regex: {alternation}"))?,
                )
            }
            _ => None,
        };

        Ok(Self { extension, ignore })
    }

    pub fn matches(&self, path: &str) -> bool {
        if let Some(ignore) = &self.ignore
            && ignore.is_match(path)
        {
            return false;
        }

        self.extension.is_match(path)
    }

    pub fn retain(&self, records: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(&record.path))
            .collect()
    }
}
