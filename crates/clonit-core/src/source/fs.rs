//! Local directory source

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clonit_fs::{IgnoreRules, io};
use clonit_git::{Git, show_toplevel};

use crate::provider::SourceProvider;
use crate::{Error, Result};

const FILE_SCHEME: &str = "file://";

/// Copies a template from a local path or `file://` URL.
///
/// With explicit ignore patterns, entries are pruned by exact name. Without
/// them, `.gitignore` files between the source and its git top-level are
/// honored instead.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    source: String,
    ignore: Vec<String>,
    git: Git,
}

impl FilesystemSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ignore: Vec::new(),
            git: Git::new(),
        }
    }

    /// Prune entries with these exact names instead of consulting ignore files.
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Git executable used for top-level discovery.
    pub fn with_git(mut self, git: Git) -> Self {
        self.git = git;
        self
    }

    /// The source as a filesystem path, decoding `file://` URLs.
    pub fn source_path(&self) -> Result<PathBuf> {
        to_path(&self.source)
    }

    async fn copy_filtered(&self, source: &Path, dest: &Path) -> Result<()> {
        let root = dunce::canonicalize(source).map_err(|e| clonit_fs::Error::io(source, e))?;
        let stop = show_toplevel(&self.git, &root)
            .await
            .map(|top| dunce::canonicalize(&top).unwrap_or(top));
        let rules = IgnoreRules::discover(&root, stop.as_deref()).await?;

        if rules.sources().is_empty() {
            tracing::debug!(source = ?root, "No ignore files found, copying everything");
            return Ok(io::copy_dir(&root, dest, &[]).await?);
        }

        let files = io::list_files(&root).await?;
        let total = files.len();
        let kept = rules.filter(files);
        tracing::debug!(
            source = ?root,
            total,
            kept = kept.len(),
            ignore_files = rules.sources().len(),
            "Filtered template files"
        );

        io::create_dir_all(dest).await?;
        for relative in kept {
            io::copy_file(&root.join(&relative), &dest.join(&relative)).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SourceProvider for FilesystemSource {
    fn describe(&self) -> String {
        self.source.clone()
    }

    async fn populate(&self, dest: &Path) -> Result<()> {
        let source = self.source_path()?;
        if !io::exists(&source).await? {
            return Err(Error::SourceNotFound { path: source });
        }
        tracing::info!(source = ?source, dest = ?dest, "Copying template from filesystem");

        if self.ignore.is_empty() {
            self.copy_filtered(&source, dest).await
        } else {
            Ok(io::copy_dir(&source, dest, &self.ignore).await?)
        }
    }
}

fn to_path(source: &str) -> Result<PathBuf> {
    if !source.starts_with(FILE_SCHEME) {
        return Ok(PathBuf::from(source));
    }
    let invalid = |message: String| Error::InvalidSourceUrl {
        url: source.to_string(),
        message,
    };
    let url = url::Url::parse(source).map_err(|e| invalid(e.to_string()))?;
    url.to_file_path()
        .map_err(|()| invalid("not a local file path".to_string()))
}
