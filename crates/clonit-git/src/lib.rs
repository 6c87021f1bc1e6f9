//! Git plumbing for clonit
//!
//! Shells out to the host `git` executable for cloning, sparse checkout
//! and top-level discovery. Each call is awaited before the next starts.

pub mod clone;
pub mod command;
pub mod error;
pub mod sparse;
pub mod toplevel;

pub use clone::{CloneOptions, DEFAULT_BRANCH};
pub use command::Git;
pub use error::{Error, Result};
pub use toplevel::show_toplevel;
