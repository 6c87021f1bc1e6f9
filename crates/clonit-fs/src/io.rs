//! Filesystem primitives
//!
//! Thin async wrappers over `tokio::fs` that attach the offending path to
//! every error. No sandboxing happens here; containment is enforced by the
//! staging context that composes these.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

fn ensure_not_empty(path: &Path, what: &'static str) -> Result<()> {
    if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
        return Err(Error::EmptyPath { what });
    }
    Ok(())
}

/// Check whether a file or directory exists.
///
/// "Not found" yields `Ok(false)`; any other error (permission denied on a
/// parent, for instance) is returned as-is.
pub async fn exists(path: &Path) -> Result<bool> {
    ensure_not_empty(path, "Existence check")?;
    match tokio::fs::metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Create a directory and all of its missing ancestors.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| Error::io(path, e))
}

async fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent).await,
        _ => Ok(()),
    }
}

/// Copy a single file, creating the destination's parent directories.
///
/// Overwrites `dest` if it already exists.
pub async fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    create_parent(dest).await?;
    tokio::fs::copy(src, dest)
        .await
        .map_err(|e| Error::io(src, e))?;
    Ok(())
}

/// Recursively mirror `src` into `dest`.
///
/// Any entry whose file name equals one of `ignore` is skipped together
/// with its subtree. Entries that disappear between listing and copying
/// are skipped; every other error aborts the copy.
pub async fn copy_dir(src: &Path, dest: &Path, ignore: &[String]) -> Result<()> {
    create_dir_all(dest).await?;

    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dest.to_path_buf())];
    let mut is_root = true;

    while let Some((from_dir, to_dir)) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&from_dir).await {
            Ok(entries) => entries,
            // The root must exist; nested directories may vanish under us
            Err(e) if e.kind() == ErrorKind::NotFound && !is_root => continue,
            Err(e) => return Err(Error::io(&from_dir, e)),
        };
        is_root = false;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io(&from_dir, e))?
        {
            let name = entry.file_name();
            if ignore.iter().any(|pattern| name.to_str() == Some(pattern.as_str())) {
                tracing::trace!(entry = ?entry.path(), "Skipping ignored entry");
                continue;
            }

            let from = entry.path();
            let to = to_dir.join(&name);

            let metadata = match tokio::fs::metadata(&from).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(Error::io(&from, e)),
            };

            if metadata.is_dir() {
                create_dir_all(&to).await?;
                pending.push((from, to));
            } else {
                match copy_file(&from, &to).await {
                    Err(e) if e.is_not_found() => continue,
                    other => other?,
                }
            }
        }
    }

    Ok(())
}

/// List every file under `root`, relative to `root`, in sorted order.
///
/// Directories are descended into but not listed themselves.
pub async fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Error::io(&dir, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(&dir, e))? {
            let path = entry.path();
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| Error::io(&path, e))?;
            if metadata.is_dir() {
                pending.push(path);
            } else if let Ok(relative) = path.strip_prefix(root) {
                files.push(relative.to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Read text content from a file.
pub async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))
}

/// Write text content to a file, creating parent directories as needed.
pub async fn write_text(path: &Path, content: &str) -> Result<()> {
    create_parent(path).await?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| Error::io(path, e))
}

/// Remove a file, or a directory together with everything inside it.
///
/// Symlinks are removed themselves, never followed.
pub async fn remove(path: &Path) -> Result<()> {
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
    .map_err(|e| Error::io(path, e))
}

/// Rename a file or directory.
pub async fn rename(from: &Path, to: &Path) -> Result<()> {
    tokio::fs::rename(from, to)
        .await
        .map_err(|e| Error::io(from, e))
}

/// Check whether a directory has no entries.
///
/// A directory that does not exist counts as empty.
pub async fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = match tokio::fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(Error::io(path, e)),
    };
    let first = entries.next_entry().await.map_err(|e| Error::io(path, e))?;
    Ok(first.is_none())
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}
