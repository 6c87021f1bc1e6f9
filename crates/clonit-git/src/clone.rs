//! Clone options and the `git clone` invocation

use std::ffi::OsString;
use std::num::NonZeroU32;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Git, Result};

/// Branch used when no branch, tag or commit is requested.
pub const DEFAULT_BRANCH: &str = "main";

/// Depth used when none is requested.
pub const DEFAULT_DEPTH: NonZeroU32 = NonZeroU32::MIN;

/// How a repository should be cloned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneOptions {
    /// Branch to check out.
    pub branch: Option<String>,
    /// Tag to check out; takes precedence over `branch`.
    pub tag: Option<String>,
    /// Commit to check out after cloning (ignored when `tag` is set).
    pub commit: Option<String>,
    /// Shallow clone depth, 1 when absent.
    pub depth: Option<NonZeroU32>,
    /// Repository-relative directories for a cone-mode sparse checkout.
    pub sparse: Vec<String>,
    /// Branch selected when nothing else is requested.
    pub default_branch: String,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            branch: None,
            tag: None,
            commit: None,
            depth: None,
            sparse: Vec::new(),
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl CloneOptions {
    /// Ref passed to `clone -b`, if any.
    ///
    /// Tag wins over branch. With neither, the default branch is used
    /// unless a bare commit was requested, in which case the remote HEAD
    /// is cloned and the commit is checked out afterwards.
    pub fn selector(&self) -> Option<&str> {
        match (&self.tag, &self.branch, &self.commit) {
            (Some(tag), _, _) => Some(tag.as_str()),
            (None, Some(branch), _) => Some(branch.as_str()),
            (None, None, Some(_)) => None,
            (None, None, None) => Some(self.default_branch.as_str()),
        }
    }

    pub fn effective_depth(&self) -> NonZeroU32 {
        self.depth.unwrap_or(DEFAULT_DEPTH)
    }

    pub fn is_sparse(&self) -> bool {
        !self.sparse.is_empty()
    }

    /// Commit to check out after cloning.
    pub fn checkout_commit(&self) -> Option<&str> {
        match (&self.commit, &self.tag) {
            (Some(commit), None) => Some(commit.as_str()),
            _ => None,
        }
    }

    /// Arguments for `git clone`, without the program name.
    pub fn clone_args(&self, repo: &str, dest: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["clone".into()];

        if let Some(selector) = self.selector() {
            args.push("-b".into());
            args.push(selector.into());
        }

        args.push("--depth".into());
        args.push(self.effective_depth().to_string().into());

        if self.is_sparse() {
            args.push("--filter=blob:none".into());
            args.push("--sparse".into());
        }

        args.push(repo.into());
        args.push(dest.as_os_str().to_os_string());
        args
    }
}

/// Clone `repo` into `dest`.
pub async fn clone(git: &Git, repo: &str, dest: &Path, options: &CloneOptions) -> Result<()> {
    tracing::info!(%repo, dest = ?dest, "Cloning repository");
    git.run(options.clone_args(repo, dest)).await?;
    Ok(())
}

/// Check out a specific commit in the work tree at `dir`.
pub async fn checkout(git: &Git, dir: &Path, commit: &str) -> Result<()> {
    tracing::debug!(%commit, dir = ?dir, "Checking out commit");
    git.in_dir(dir).run(["checkout", commit]).await?;
    Ok(())
}
