//! Git repository source

use std::num::NonZeroU32;
use std::path::Path;

use async_trait::async_trait;
use clonit_git::{CloneOptions, Git, clone, sparse};

use crate::provider::SourceProvider;
use crate::{Error, Result};

/// Clones a template from a git repository (remote URL or local path).
///
/// Steps run strictly one after another: clone, sparse-checkout setup,
/// commit checkout, then hoisting the sparse directory to the root.
#[derive(Debug, Clone)]
pub struct GitSource {
    repo: String,
    options: CloneOptions,
    git: Git,
}

impl GitSource {
    pub fn new(repo: impl Into<String>) -> Self {
        Self::with_options(repo, CloneOptions::default())
    }

    pub fn with_options(repo: impl Into<String>, options: CloneOptions) -> Self {
        Self {
            repo: repo.into(),
            options,
            git: Git::new(),
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.options.branch = Some(branch.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.options.tag = Some(tag.into());
        self
    }

    pub fn commit(mut self, commit: impl Into<String>) -> Self {
        self.options.commit = Some(commit.into());
        self
    }

    pub fn depth(mut self, depth: NonZeroU32) -> Self {
        self.options.depth = Some(depth);
        self
    }

    pub fn sparse<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.sparse = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Git executable used for every step.
    pub fn with_git(mut self, git: Git) -> Self {
        self.git = git;
        self
    }

    pub fn options(&self) -> &CloneOptions {
        &self.options
    }
}

#[async_trait]
impl SourceProvider for GitSource {
    fn describe(&self) -> String {
        self.repo.clone()
    }

    async fn populate(&self, dest: &Path) -> Result<()> {
        let sparse_paths = &self.options.sparse;
        if sparse_paths.len() > 1 {
            return Err(Error::MultipleSparsePaths {
                count: sparse_paths.len(),
                paths: sparse_paths.clone(),
            });
        }

        clone::clone(&self.git, &self.repo, dest, &self.options).await?;

        if self.options.is_sparse() {
            sparse::init_cone(&self.git, dest).await?;
            sparse::set_paths(&self.git, dest, sparse_paths).await?;
        }

        // Before relocation, which discards .git
        if let Some(commit) = self.options.checkout_commit() {
            clone::checkout(&self.git, dest, commit).await?;
        }

        if let Some(subdir) = sparse_paths.first() {
            sparse::relocate(dest, subdir).await?;
        }

        tracing::info!(repo = %self.repo, dest = ?dest, "Repository ready");
        Ok(())
    }
}
