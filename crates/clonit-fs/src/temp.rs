//! Staging directory allocation

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default name prefix for staging directories.
pub const DEFAULT_PREFIX: &str = "clonit-";

/// Create a uniquely named, empty directory under the platform temp root.
///
/// Uniqueness comes from an atomic create-if-absent loop in `tempfile`,
/// so concurrent callers never receive the same directory. The directory
/// is persisted: dropping nothing removes it, the caller owns its lifetime.
pub async fn create_temp_dir(prefix: &str) -> Result<PathBuf> {
    create_temp_dir_in(&std::env::temp_dir(), prefix).await
}

/// Like [`create_temp_dir`], but under an explicit parent directory.
pub async fn create_temp_dir_in(parent: &Path, prefix: &str) -> Result<PathBuf> {
    let parent = parent.to_path_buf();
    let prefix = prefix.to_string();

    let dir = tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(&parent)
            .map(tempfile::TempDir::keep)
            .map_err(|e| Error::io(&parent, e))
    })
    .await??;

    tracing::debug!(path = ?dir, "Created staging directory");
    Ok(dir)
}
