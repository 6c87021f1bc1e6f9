//! Shared test utilities for the clonit workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] — git repository fixtures driven through the `git` CLI
//! - [`template`] — [`TemplateDir`] builder for template source trees

pub mod git;
pub mod template;

pub use template::TemplateDir;
