//! Staging, transform and commit engine for clonit
//!
//! Typical flow:
//!
//! ```rust,no_run
//! use clonit_core::{GitSource, StagingOptions, create};
//!
//! # async fn run() -> clonit_core::Result<()> {
//! let source = GitSource::new("https://github.com/user/templates.git").sparse(["react-ts"]);
//! let mut ctx = create(source, StagingOptions::default()).await?;
//! ctx.update("README.md", |text| async move { Some(text.replace("{{name}}", "my-app")) })
//!     .await?;
//! ctx.delete("LICENSE").await?;
//! ctx.out("/home/me/my-app").await?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod create;
pub mod error;
pub mod logging;
pub mod options;
pub mod provider;
pub mod source;

pub use context::{ContextState, JsonDocument, StagingContext};
pub use create::{create, create_from_path};
pub use error::{Error, Result};
pub use options::StagingOptions;
pub use provider::SourceProvider;
pub use source::{FilesystemSource, GitSource, Source, is_git_remote};

pub use clonit_git::CloneOptions;
