//! Ignore-file discovery and matching
//!
//! Collects `.gitignore` files from a source directory up to an enclosing
//! stop directory (normally the git top-level) and unions every pattern
//! into one matcher anchored at the source directory.

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::{Error, Result};

/// Conventional ignore-file name.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// `start` followed by each ancestor, ending at `stop` (inclusive).
///
/// When `stop` is `None` or is not an ancestor of `start`, the walk runs
/// to the filesystem root.
pub fn ancestors_until(start: &Path, stop: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for dir in start.ancestors() {
        dirs.push(dir.to_path_buf());
        if stop.is_some_and(|stop| dir == stop) {
            break;
        }
    }
    dirs
}

/// Compiled union of ignore patterns.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    matcher: Gitignore,
    sources: Vec<PathBuf>,
}

impl IgnoreRules {
    /// Rules that exclude nothing.
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            sources: Vec::new(),
        }
    }

    /// Build rules from raw pattern lines, anchored at `root`.
    pub fn from_patterns<I, S>(root: &Path, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new(root);
        for line in lines {
            add_line(&mut builder, line.as_ref(), "<inline>")?;
        }
        Ok(Self {
            matcher: build(builder)?,
            sources: Vec::new(),
        })
    }

    /// Discover and compile the ignore files between `start` and `stop`.
    ///
    /// Every ignore file found on the walk contributes its patterns, and
    /// all are interpreted relative to `start`. Where two files disagree
    /// the one nearer `start` wins, so its lines are added last.
    pub async fn discover(start: &Path, stop: Option<&Path>) -> Result<Self> {
        let mut found = Vec::new();
        for dir in ancestors_until(start, stop) {
            let candidate = dir.join(IGNORE_FILE_NAME);
            let content = match tokio::fs::read_to_string(&candidate).await {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                // A directory named like the ignore file is not an ignore file
                Err(_) if candidate.is_dir() => continue,
                Err(e) => return Err(Error::io(&candidate, e)),
            };
            found.push((candidate, content));
        }

        let mut builder = GitignoreBuilder::new(start);
        for (candidate, content) in found.iter().rev() {
            let origin = candidate.display().to_string();
            for line in content.lines() {
                add_line(&mut builder, line, &origin)?;
            }
            tracing::debug!(file = %origin, "Loaded ignore file");
        }

        Ok(Self {
            matcher: build(builder)?,
            sources: found.into_iter().map(|(candidate, _)| candidate).collect(),
        })
    }

    /// Ignore files that contributed to these rules, nearest first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Whether no pattern was loaded at all.
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Whether `relative` (or any of its parent directories) is excluded.
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        if relative.as_os_str().is_empty() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(relative, is_dir)
            .is_ignore()
    }

    /// Keep only the files that are not excluded.
    pub fn filter<I, P>(&self, files: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        files
            .into_iter()
            .filter(|file| !self.is_excluded(file.as_ref(), false))
            .map(|file| file.as_ref().to_path_buf())
            .collect()
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::empty()
    }
}

fn add_line(builder: &mut GitignoreBuilder, line: &str, origin: &str) -> Result<()> {
    builder
        .add_line(None, line)
        .map_err(|e| Error::IgnorePattern {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
    Ok(())
}

fn build(builder: GitignoreBuilder) -> Result<Gitignore> {
    builder.build().map_err(|e| Error::IgnorePattern {
        origin: "<compiled>".to_string(),
        message: e.to_string(),
    })
}
