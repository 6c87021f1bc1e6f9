//! Error types for clonit-git

/// Result type for clonit-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in clonit-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to run `{program} {args}`: {source}")]
    Spawn {
        program: String,
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {args}` exited with {}: {stderr}", exit_code_label(.code))]
    CommandFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Filesystem error: {0}")]
    Fs(#[from] clonit_fs::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}
