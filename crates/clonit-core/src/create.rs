//! Entry points: allocate, populate, wrap

use std::path::Path;

use clonit_fs::{DEFAULT_PREFIX, create_temp_dir};

use crate::context::StagingContext;
use crate::options::StagingOptions;
use crate::provider::SourceProvider;
use crate::source::FilesystemSource;
use crate::{Error, Result};

/// Populate a fresh staging directory from `source` and open a context on it.
///
/// Nothing is rolled back on failure: the returned [`Error::Populate`]
/// carries the staging path so the caller can inspect or remove it.
pub async fn create<S>(source: S, options: StagingOptions) -> Result<StagingContext>
where
    S: SourceProvider,
{
    let staging = create_temp_dir(DEFAULT_PREFIX).await?;
    tracing::info!(source = %source.describe(), staging = ?staging, "Populating staging directory");

    if let Err(e) = source.populate(&staging).await {
        return Err(Error::Populate {
            staging,
            source: Box::new(e),
        });
    }

    StagingContext::new(&staging, options)
}

/// [`create`] from a local directory, pruning `options.ignore_patterns`
/// by name (or honoring ignore files when there are none).
pub async fn create_from_path(
    source: impl AsRef<Path>,
    options: StagingOptions,
) -> Result<StagingContext> {
    let provider = FilesystemSource::new(source.as_ref().to_string_lossy())
        .with_ignore(options.ignore_patterns.clone());
    create(provider, options).await
}
