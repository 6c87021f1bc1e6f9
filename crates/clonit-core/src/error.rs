//! Error types for clonit-core

use std::path::PathBuf;

use crate::context::ContextState;

/// Result type for clonit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in clonit-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A staging-relative path resolved outside the staging root
    #[error("Path \"{path}\" is outside of staging directory {root}")]
    PathOutsideStaging { path: String, root: PathBuf },

    /// File creation requested without content
    #[error("Content is required for file creation: {path}")]
    ContentRequired { path: String },

    /// A required path argument was empty
    #[error("{what} path is required")]
    EmptyPath { what: &'static str },

    /// Commit target already has entries and overwrite is off
    #[error("Target directory \"{}\" is not empty. Use the overwrite option to proceed.", .path.display())]
    TargetNotEmpty { path: PathBuf },

    /// Operation attempted after commit or cleanup
    #[error("Staging context is {state} and no longer accepts operations")]
    ContextClosed { state: ContextState },

    /// Filesystem source does not exist
    #[error("Source directory not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// Source string could not be turned into a path
    #[error("Invalid source URL {url}: {message}")]
    InvalidSourceUrl { url: String, message: String },

    /// Only a single sparse directory can be hoisted to the staging root
    #[error("Expected at most one sparse path, got {count}: {}", .paths.join(", "))]
    MultipleSparsePaths { count: usize, paths: Vec<String> },

    /// Content is not a well-formed JSON object
    #[error("Invalid JSON document at {path}: {source}")]
    InvalidDocument {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A source provider failed after the staging directory was created
    #[error("Failed to populate staging directory {}: {source}", .staging.display())]
    Populate {
        staging: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Logging subscriber could not be installed
    #[error("Logging initialisation failed: {message}")]
    Logging { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from clonit-fs
    #[error(transparent)]
    Fs(#[from] clonit_fs::Error),

    /// Git error from clonit-git
    #[error(transparent)]
    Git(#[from] clonit_git::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is a containment violation.
    pub fn is_containment(&self) -> bool {
        matches!(self, Self::PathOutsideStaging { .. })
    }
}
