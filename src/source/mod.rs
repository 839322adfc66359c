//! Release sources
//!
//! A release source supplies the raw candidate list for a dependency and,
//! optionally, release dates that were not part of that list. Registry and
//! VCS clients live outside this crate; they plug in by implementing
//! [`ReleaseSource`].

mod snapshot;

pub use snapshot::SnapshotSource;

use crate::domain::{Dependency, RawRelease, Version};
use crate::error::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait for release sources
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Fetch every published release of a dependency
    async fn list_releases(&self, dependency: &Dependency) -> Result<Vec<RawRelease>, SourceError>;

    /// Look up when one version was published
    async fn release_date(
        &self,
        _dependency: &Dependency,
        _version: &Version,
    ) -> Result<Option<DateTime<Utc>>, SourceError> {
        Ok(None)
    }
}
