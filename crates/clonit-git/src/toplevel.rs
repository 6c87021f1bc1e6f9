//! Version-control root discovery

use std::path::{Path, PathBuf};

use crate::Git;

/// Ask git for the top-level directory of the work tree containing `dir`.
///
/// Returns `None` when `dir` is not inside a work tree or git itself is
/// unavailable; callers then walk to the filesystem root instead.
pub async fn show_toplevel(git: &Git, dir: &Path) -> Option<PathBuf> {
    match git.in_dir(dir).run(["rev-parse", "--show-toplevel"]).await {
        Ok(stdout) if !stdout.is_empty() => Some(PathBuf::from(stdout)),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(dir = ?dir, error = %e, "No git top-level found");
            None
        }
    }
}
