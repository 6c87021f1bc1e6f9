//! [`TemplateDir`] builder for template source trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory populated with template files.
///
/// # Example
///
/// ```rust,no_run
/// use clonit_test_utils::TemplateDir;
///
/// let template = TemplateDir::new()
///     .file("a.txt", "a")
///     .file(".gitignore", "b.txt\n");
/// assert!(template.path().join("a.txt").exists());
/// ```
pub struct TemplateDir {
    temp_dir: TempDir,
}

impl Default for TemplateDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root path of the template.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the template.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.path().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TemplateDir::file: failed to write {}: {e}", path.display()));
        self
    }

    /// Create an (empty) directory.
    pub fn dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.join(relative)).unwrap();
        self
    }
}

/// Sorted list of every file under `root`, relative and slash-separated.
///
/// # Panics
/// Panics if the tree cannot be read.
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                out.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    out.sort();
    out
}
