//! Staging options

use std::path::Path;

use clonit_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Behaviour switches for a staging context.
///
/// Every field defaults to the conservative choice: nothing ignored,
/// staging discarded after commit, refuse non-empty targets, really
/// execute mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingOptions {
    /// Entry names skipped when copying (at any depth).
    pub ignore_patterns: Vec<String>,
    /// Keep the staging directory after a successful commit.
    pub keep_staging_on_commit: bool,
    /// Commit into a target directory even if it already has entries.
    pub overwrite_non_empty_target: bool,
    /// Validate everything, write nothing.
    pub dry_run: bool,
}

impl StagingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a `.toml`, `.json` or `.yaml` file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn keep_staging(mut self, keep: bool) -> Self {
        self.keep_staging_on_commit = keep;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_non_empty_target = overwrite;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
