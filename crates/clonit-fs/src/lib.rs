//! Filesystem layer for clonit
//!
//! Staging directory allocation, async filesystem primitives, lexical path
//! containment and ignore-file resolution. Nothing in this crate enforces a
//! sandbox on its own; the staging context in `clonit-core` composes these.

pub mod config;
pub mod error;
pub mod ignore_rules;
pub mod io;
pub mod path;
pub mod temp;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use ignore_rules::{IGNORE_FILE_NAME, IgnoreRules};
pub use path::NormalizedPath;
pub use temp::{DEFAULT_PREFIX, create_temp_dir};
