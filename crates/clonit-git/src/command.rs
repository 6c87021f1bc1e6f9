//! Git subprocess runner

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::{Error, Result};

/// Handle for invoking the host `git` executable.
///
/// Every invocation is awaited to completion; nothing runs in the
/// background. Output is captured, never inherited.
#[derive(Debug, Clone)]
pub struct Git {
    program: OsString,
    dir: Option<PathBuf>,
}

impl Git {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific executable instead of `git` from `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            dir: None,
        }
    }

    /// Run subsequent commands against `dir` (passed as `-C <dir>`).
    pub fn in_dir(&self, dir: impl AsRef<Path>) -> Self {
        Self {
            program: self.program.clone(),
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    /// Full argument vector for `args`, including any `-C` prefix.
    pub fn command_args<I, S>(&self, args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut full = Vec::new();
        if let Some(dir) = &self.dir {
            full.push(OsString::from("-C"));
            full.push(dir.as_os_str().to_os_string());
        }
        full.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        full
    }

    /// Run a git command and return its trimmed stdout.
    pub async fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = self.command_args(args);
        let rendered = render(&args);
        tracing::debug!(args = %rendered, "Running git");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                args: rendered.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::debug!(args = %rendered, code = ?output.status.code(), %stderr, "git failed");
            Err(Error::CommandFailed {
                args: rendered,
                code: output.status.code(),
                stderr,
            })
        }
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}

fn render(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
