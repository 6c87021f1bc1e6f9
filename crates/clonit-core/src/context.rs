//! Sandboxed staging context
//!
//! Wraps a populated staging directory. Every path argument is resolved
//! against the staging root and rejected if it escapes it; the check is
//! lexical, so it runs before any filesystem access.

use std::future::Future;
use std::path::{Path, PathBuf};

use clonit_fs::{NormalizedPath, io};
use serde_json::{Map, Value};

use crate::options::StagingOptions;
use crate::{Error, Result};

/// JSON object handed to [`StagingContext::update_json`] transforms.
pub type JsonDocument = Map<String, Value>;

/// Lifecycle of a staging context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Mutations allowed.
    Open,
    /// `out` ran; terminal.
    Committed,
    /// `cleanup` ran; terminal.
    CleanedUp,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Committed => "committed",
            Self::CleanedUp => "cleaned up",
        };
        f.write_str(label)
    }
}

/// A private staging directory plus the operations allowed on it.
///
/// Mutators take `&self` and are meant to be awaited one at a time;
/// overlapping updates of the same file race, last write wins.
/// [`out`](Self::out) and [`cleanup`](Self::cleanup) end the lifecycle.
#[derive(Debug)]
pub struct StagingContext {
    root: PathBuf,
    normalized_root: NormalizedPath,
    options: StagingOptions,
    state: ContextState,
}

impl StagingContext {
    /// Bind a context to an already populated staging directory.
    pub fn new(staging_root: impl AsRef<Path>, options: StagingOptions) -> Result<Self> {
        let staging_root = staging_root.as_ref();
        if staging_root.as_os_str().is_empty() {
            return Err(Error::EmptyPath {
                what: "Staging directory",
            });
        }
        let absolute = std::path::absolute(staging_root)
            .map_err(|e| clonit_fs::Error::io(staging_root, e))?;
        let normalized_root = NormalizedPath::new(&absolute);

        Ok(Self {
            root: normalized_root.to_native(),
            normalized_root,
            options,
            state: ContextState::Open,
        })
    }

    /// Absolute staging directory.
    pub fn staging_root(&self) -> &Path {
        &self.root
    }

    /// Working directory for [`resolve`](Self::resolve); same as the staging root.
    pub fn cwd(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &StagingOptions {
        &self.options
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            ContextState::Open => Ok(()),
            state => Err(Error::ContextClosed { state }),
        }
    }

    /// Resolve `relative` against the staging root, refusing escapes.
    ///
    /// The result is the root itself or one of its descendants. Absolute
    /// inputs are accepted only if they already point inside the root.
    pub fn resolve_within_staging(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let candidate = self.normalized_root.join(relative);
        if !candidate.is_within(&self.normalized_root) {
            return Err(Error::PathOutsideStaging {
                path: relative.display().to_string(),
                root: self.root.clone(),
            });
        }
        Ok(candidate.to_native())
    }

    /// Join `relative` onto the working directory without any containment
    /// check. For display and logging only.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.normalized_root.join(relative).to_native()
    }

    /// Read a staged file as text.
    pub async fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        self.ensure_open()?;
        let path = self.resolve_within_staging(relative)?;
        Ok(io::read_text(&path).await?)
    }

    /// Create a file with `content`, or a directory tree when `as_directory`.
    ///
    /// Files require content; parent directories are created as needed.
    pub async fn create(
        &self,
        relative: impl AsRef<Path>,
        content: Option<&str>,
        as_directory: bool,
    ) -> Result<()> {
        self.ensure_open()?;
        let relative = relative.as_ref();
        let path = self.resolve_within_staging(relative)?;
        if !as_directory && content.is_none() {
            return Err(Error::ContentRequired {
                path: relative.display().to_string(),
            });
        }
        if self.options.dry_run {
            tracing::info!(path = ?relative, "[dry-run] Would create");
            return Ok(());
        }

        match content {
            Some(content) if !as_directory => io::write_text(&path, content).await?,
            _ => io::create_dir_all(&path).await?,
        }
        Ok(())
    }

    /// Delete a staged file or directory.
    pub async fn delete(&self, relative: impl AsRef<Path>) -> Result<()> {
        self.ensure_open()?;
        let relative = relative.as_ref();
        let path = self.resolve_within_staging(relative)?;
        if self.options.dry_run {
            tracing::info!(path = ?relative, "[dry-run] Would delete");
            return Ok(());
        }
        Ok(io::remove(&path).await?)
    }

    /// Rename a staged file or directory. Both paths must stay inside.
    pub async fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
        self.ensure_open()?;
        let from_path = self.resolve_within_staging(from.as_ref())?;
        let to_path = self.resolve_within_staging(to.as_ref())?;
        if self.options.dry_run {
            tracing::info!(from = ?from.as_ref(), to = ?to.as_ref(), "[dry-run] Would rename");
            return Ok(());
        }
        Ok(io::rename(&from_path, &to_path).await?)
    }

    /// Rewrite a text file. A `None` from `transform` leaves the file untouched.
    pub async fn update<F, Fut>(&self, relative: impl AsRef<Path>, transform: F) -> Result<()>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Option<String>>,
    {
        self.apply_transform(relative.as_ref(), Ok, Ok, transform)
            .await
    }

    /// Rewrite a JSON object file.
    ///
    /// The document is re-serialized with two-space indentation and its
    /// key order preserved. A `None` from `transform` leaves the file
    /// untouched. Content that is not a JSON object is an error.
    pub async fn update_json<F, Fut>(&self, relative: impl AsRef<Path>, transform: F) -> Result<()>
    where
        F: FnOnce(JsonDocument) -> Fut,
        Fut: Future<Output = Option<JsonDocument>>,
    {
        let relative = relative.as_ref();
        let label = relative.display().to_string();
        self.apply_transform(
            relative,
            |content| {
                serde_json::from_str::<JsonDocument>(&content).map_err(|source| {
                    Error::InvalidDocument {
                        path: label.clone(),
                        source,
                    }
                })
            },
            |document| Ok(serde_json::to_string_pretty(&document)?),
            transform,
        )
        .await
    }

    async fn apply_transform<T, P, R, F, Fut>(
        &self,
        relative: &Path,
        parse: P,
        render: R,
        transform: F,
    ) -> Result<()>
    where
        P: FnOnce(String) -> Result<T>,
        R: FnOnce(T) -> Result<String>,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        self.ensure_open()?;
        let path = self.resolve_within_staging(relative)?;
        let current = parse(io::read_text(&path).await?)?;

        let Some(updated) = transform(current).await else {
            tracing::debug!(path = ?relative, "Transform returned no change");
            return Ok(());
        };
        let content = render(updated)?;

        if self.options.dry_run {
            tracing::info!(path = ?relative, "[dry-run] Would update");
            return Ok(());
        }
        Ok(io::write_text(&path, &content).await?)
    }

    /// Remove the staging directory. Safe to call repeatedly.
    pub async fn cleanup(&mut self) -> Result<()> {
        match io::remove(&self.root).await {
            Ok(()) => tracing::debug!(path = ?self.root, "Removed staging directory"),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
        self.state = ContextState::CleanedUp;
        Ok(())
    }

    /// Commit the staging tree into `target`.
    ///
    /// Refuses a non-empty target unless overwrite is enabled, before any
    /// I/O. Copies everything except entries named in the ignore patterns,
    /// then removes the staging directory unless asked to keep it. The
    /// emptiness check and the copy are not atomic with respect to other
    /// writers of `target`.
    pub async fn out(&mut self, target: impl AsRef<Path>) -> Result<()> {
        self.ensure_open()?;
        let target = target.as_ref();
        if target.as_os_str().is_empty() {
            return Err(Error::EmptyPath {
                what: "Target directory",
            });
        }

        if !io::is_empty_dir(target).await? && !self.options.overwrite_non_empty_target {
            return Err(Error::TargetNotEmpty {
                path: target.to_path_buf(),
            });
        }

        if self.options.dry_run {
            tracing::info!(target = ?target, "[dry-run] Would copy staging directory");
            self.state = ContextState::Committed;
            return Ok(());
        }

        io::copy_dir(&self.root, target, &self.options.ignore_patterns).await?;
        tracing::info!(staging = ?self.root, target = ?target, "Committed staging directory");

        if !self.options.keep_staging_on_commit {
            io::remove(&self.root).await?;
        }
        self.state = ContextState::Committed;
        Ok(())
    }
}
