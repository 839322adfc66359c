//! Per-run memo of release date lookups

use crate::domain::{Dependency, Ecosystem, Version};
use crate::source::ReleaseSource;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;

/// Release dates keyed by `(ecosystem, dependency, version)`
///
/// Failed or timed-out lookups are remembered as unknown so each pair is
/// asked for at most once per run.
#[derive(Debug, Default)]
pub struct ReleaseDateCache {
    entries: Mutex<HashMap<(Ecosystem, String, String), Option<DateTime<Utc>>>>,
}

impl ReleaseDateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached date, or ask `source` within `timeout` and remember the answer
    pub async fn get_or_fetch(
        &self,
        source: &dyn ReleaseSource,
        dependency: &Dependency,
        version: &Version,
        timeout: Duration,
    ) -> Option<DateTime<Utc>> {
        let key = (dependency.ecosystem, dependency.name.clone(), version.as_str().to_string());
        if let Some(cached) = self.entries.lock().await.get(&key) {
            return *cached;
        }

        let fetched = match tokio::time::timeout(timeout, source.release_date(dependency, version)).await {
            Ok(Ok(date)) => date,
            Ok(Err(e)) => {
                warn!(dependency = %dependency.name, version = %version, error = %e, "Release date lookup failed");
                None
            }
            Err(_) => {
                warn!(dependency = %dependency.name, version = %version, "Release date lookup timed out");
                None
            }
        };

        *self.entries.lock().await.entry(key).or_insert(fetched)
    }

    /// Number of remembered lookups
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
