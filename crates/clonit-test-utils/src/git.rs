//! Git repository fixtures.
//!
//! Everything here shells out to the `git` CLI, the same executable the
//! code under test uses.

use std::path::Path;
use std::process::Command;

/// Whether a usable `git` executable is on `PATH`.
///
/// Tests that need real git should return early when this is false.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run `git <args>` in `path`, panicking with stderr on failure.
///
/// Returns trimmed stdout.
pub fn run_git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("run_git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "run_git: `git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Initialise a git repository with identity configured and branch `main`.
///
/// No commit is made; follow with [`commit_all`].
pub fn init_repo(path: &Path) {
    run_git(path, &["init"]);
    run_git(path, &["config", "user.email", "test@test.com"]);
    run_git(path, &["config", "user.name", "Test User"]);
    run_git(path, &["config", "commit.gpgsign", "false"]);
    // Unborn HEAD: point it at main regardless of init.defaultBranch
    run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

/// Stage everything and commit. Returns the new commit id.
pub fn commit_all(path: &Path, message: &str) -> String {
    run_git(path, &["add", "-A"]);
    run_git(path, &["commit", "-m", message]);
    run_git(path, &["rev-parse", "HEAD"])
}

/// Create a lightweight tag at HEAD.
pub fn tag(path: &Path, name: &str) {
    run_git(path, &["tag", name]);
}

/// `file://` URL for a local repository, so shallow and filtered clones
/// go through the regular transport instead of the local-copy shortcut.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
