//! In-memory release source built from a job file

use super::ReleaseSource;
use crate::domain::{Dependency, Ecosystem, RawRelease, Version};
use crate::error::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Release source answering from pre-recorded data
#[derive(Debug, Default)]
pub struct SnapshotSource {
    releases: HashMap<(Ecosystem, String), Vec<RawRelease>>,
    release_dates: HashMap<(Ecosystem, String, String), DateTime<Utc>>,
    failures: HashMap<String, SourceError>,
    date_lookups: AtomicUsize,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the releases of one dependency (builder pattern)
    pub fn with_releases(
        mut self,
        ecosystem: Ecosystem,
        dependency: impl Into<String>,
        releases: Vec<RawRelease>,
    ) -> Self {
        self.releases.insert((ecosystem, dependency.into()), releases);
        self
    }

    /// Record a release date served by `release_date` (builder pattern)
    pub fn with_release_date(
        mut self,
        ecosystem: Ecosystem,
        dependency: impl Into<String>,
        version: impl Into<String>,
        released_at: DateTime<Utc>,
    ) -> Self {
        self.release_dates
            .insert((ecosystem, dependency.into(), version.into()), released_at);
        self
    }

    /// Make every call for `dependency` fail with `error` (builder pattern)
    pub fn with_failure(mut self, dependency: impl Into<String>, error: SourceError) -> Self {
        self.failures.insert(dependency.into(), error);
        self
    }

    /// Number of `release_date` calls answered so far
    pub fn date_lookups(&self) -> usize {
        self.date_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn list_releases(&self, dependency: &Dependency) -> Result<Vec<RawRelease>, SourceError> {
        if let Some(error) = self.failures.get(&dependency.name) {
            return Err(error.clone());
        }
        self.releases
            .get(&(dependency.ecosystem, dependency.name.clone()))
            .cloned()
            .ok_or_else(|| SourceError::not_found(&dependency.name, self.name()))
    }

    async fn release_date(
        &self,
        dependency: &Dependency,
        version: &Version,
    ) -> Result<Option<DateTime<Utc>>, SourceError> {
        self.date_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failures.get(&dependency.name) {
            return Err(error.clone());
        }
        Ok(self
            .release_dates
            .get(&(dependency.ecosystem, dependency.name.clone(), version.as_str().to_string()))
            .copied())
    }
}
