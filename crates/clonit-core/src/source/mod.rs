//! Template sources

pub mod fs;
pub mod git;

use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::Result;
use crate::provider::SourceProvider;

pub use fs::FilesystemSource;
pub use git::GitSource;

/// scp-like ssh syntax: `user@host:path`
static SCP_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+:[^/\\]").expect("valid regex")
});

const REMOTE_SCHEMES: &[&str] = &["http://", "https://", "ssh://", "git://", "git+ssh://"];

/// Whether `source` names a remote git repository rather than a local path.
pub fn is_git_remote(source: &str) -> bool {
    REMOTE_SCHEMES.iter().any(|scheme| source.starts_with(scheme)) || SCP_LIKE.is_match(source)
}

/// The built-in source strategies.
#[derive(Debug, Clone)]
pub enum Source {
    Filesystem(FilesystemSource),
    Git(GitSource),
}

impl Source {
    /// Pick a strategy from a user-supplied string.
    ///
    /// Remote URLs (http, https, ssh, git, scp-like) become [`GitSource`]
    /// with default clone options; anything else, `file://` URLs included,
    /// is a [`FilesystemSource`].
    pub fn detect(source: &str) -> Self {
        if is_git_remote(source) {
            Self::Git(GitSource::new(source))
        } else {
            Self::Filesystem(FilesystemSource::new(source))
        }
    }
}

#[async_trait]
impl SourceProvider for Source {
    fn describe(&self) -> String {
        match self {
            Self::Filesystem(source) => source.describe(),
            Self::Git(source) => source.describe(),
        }
    }

    async fn populate(&self, dest: &Path) -> Result<()> {
        match self {
            Self::Filesystem(source) => source.populate(dest).await,
            Self::Git(source) => source.populate(dest).await,
        }
    }
}

impl From<FilesystemSource> for Source {
    fn from(source: FilesystemSource) -> Self {
        Self::Filesystem(source)
    }
}

impl From<GitSource> for Source {
    fn from(source: GitSource) -> Self {
        Self::Git(source)
    }
}
