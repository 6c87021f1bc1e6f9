//! Sparse checkout and subdirectory relocation

use std::path::{Path, PathBuf};

use clonit_fs::{NormalizedPath, io, temp};

use crate::{Git, Result};

const HOLD_PREFIX: &str = ".clonit-sparse-";

/// Enable cone-mode sparse checkout in the work tree at `dir`.
pub async fn init_cone(git: &Git, dir: &Path) -> Result<()> {
    git.in_dir(dir)
        .run(["sparse-checkout", "init", "--cone"])
        .await?;
    Ok(())
}

/// Restrict the work tree at `dir` to `paths`.
pub async fn set_paths(git: &Git, dir: &Path, paths: &[String]) -> Result<()> {
    let mut args = vec!["sparse-checkout".to_string(), "set".to_string()];
    args.extend(paths.iter().cloned());
    git.in_dir(dir).run(args).await?;
    Ok(())
}

/// Hoist the contents of `dir/subdir` to `dir`, discarding everything else.
///
/// Returns `Ok(false)` without touching anything when `dir/subdir` does not
/// exist or is not strictly below `dir` (`.`, `a/..`, `../x`). Otherwise the subdirectory is parked in a hold directory inside
/// `dir`, every other entry of `dir` (including `.git`) is removed, and the
/// parked entries are moved up.
pub async fn relocate(dir: &Path, subdir: &str) -> Result<bool> {
    let root = NormalizedPath::new(dir);
    let target = root.join(subdir);
    if target == root || !target.is_within(&root) {
        tracing::warn!(
            subdir = %subdir,
            dir = ?dir,
            "Sparse directory is not below the clone root, keeping the full sparse tree"
        );
        return Ok(false);
    }

    let source = target.to_native();
    if !io::exists(&source).await? {
        tracing::warn!(
            subdir = %subdir,
            dir = ?dir,
            "Sparse directory not found, keeping the full sparse tree"
        );
        return Ok(false);
    }

    let hold = temp::create_temp_dir_in(dir, HOLD_PREFIX).await?;
    let parked = hold.join("content");
    io::rename(&source, &parked).await?;

    for path in entries_of(dir).await? {
        if path != hold {
            io::remove(&path).await?;
        }
    }

    for path in entries_of(&parked).await? {
        if let Some(name) = path.file_name() {
            io::rename(&path, &dir.join(name)).await?;
        }
    }

    io::remove(&hold).await?;
    tracing::debug!(subdir = %subdir, dir = ?dir, "Relocated sparse directory");
    Ok(true)
}

async fn entries_of(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| clonit_fs::Error::io(dir, e))?;
    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| clonit_fs::Error::io(dir, e))?
    {
        paths.push(entry.path());
    }
    Ok(paths)
}
