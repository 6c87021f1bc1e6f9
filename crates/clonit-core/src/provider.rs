//! Source provider capability

use std::path::Path;

use async_trait::async_trait;

use crate::Result;

/// Anything that can fill a directory with a project tree.
///
/// `populate` receives a directory that exists or can be created and
/// must leave the template's files in it. Providers own nothing beyond
/// that call; a failure may leave a partially written directory behind.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    async fn populate(&self, dest: &Path) -> Result<()>;
}

#[async_trait]
impl<T: SourceProvider + ?Sized> SourceProvider for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    async fn populate(&self, dest: &Path) -> Result<()> {
        (**self).populate(dest).await
    }
}

#[async_trait]
impl<T: SourceProvider + ?Sized> SourceProvider for &T {
    fn describe(&self) -> String {
        (**self).describe()
    }

    async fn populate(&self, dest: &Path) -> Result<()> {
        (**self).populate(dest).await
    }
}
