//! Release candidates and the catalog built from them

use super::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A release exactly as a release source reported it, before version parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRelease {
    /// Version string as published
    pub version: String,
    /// Publication time, when the source knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<DateTime<Utc>>,
    /// Where the release can be inspected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Whether the release was withdrawn by its publisher
    #[serde(default)]
    pub yanked: bool,
    /// Git tag the release was cut from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl RawRelease {
    /// Create a new RawRelease with only a version string
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            released_at: None,
            source_url: None,
            yanked: false,
            tag: None,
        }
    }

    /// Set the publication time
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }
}

/// A parsed release candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRelease {
    /// Parsed version
    pub version: Version,
    /// Publication time; `None` when unknown
    pub released_at: Option<DateTime<Utc>>,
    /// Where the release can be inspected
    pub source_url: Option<String>,
    /// Whether the release was withdrawn by its publisher
    pub yanked: bool,
    /// Git tag the release was cut from
    pub tag: Option<String>,
}

impl PackageRelease {
    /// Create a new PackageRelease
    pub fn new(version: Version) -> Self {
        Self {
            version,
            released_at: None,
            source_url: None,
            yanked: false,
            tag: None,
        }
    }

    /// Set the publication time
    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }

    /// Set the git tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Mark the release as yanked
    pub fn yanked(mut self) -> Self {
        self.yanked = true;
        self
    }

    /// Parse a raw release; malformed versions are reported to the caller
    pub fn from_raw(raw: RawRelease) -> Result<Self, crate::error::VersionError> {
        let version = Version::parse(&raw.version)?;
        Ok(Self {
            version,
            released_at: raw.released_at,
            source_url: raw.source_url,
            yanked: raw.yanked,
            tag: raw.tag,
        })
    }
}

/// Ordered, de-duplicated collection of release candidates for one dependency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCatalog {
    releases: Vec<PackageRelease>,
}

impl VersionCatalog {
    /// Create a catalog, sorting ascending and dropping duplicate versions
    pub fn new(mut releases: Vec<PackageRelease>) -> Self {
        releases.sort_by(|a, b| a.version.cmp(&b.version));
        releases.dedup_by(|a, b| a.version == b.version);
        Self { releases }
    }

    /// Build a catalog from raw source data, dropping and logging malformed versions
    pub fn from_raw(dependency: &str, raw: Vec<RawRelease>) -> Self {
        let releases = raw
            .into_iter()
            .filter_map(|r| match PackageRelease::from_raw(r) {
                Ok(release) => Some(release),
                Err(e) => {
                    tracing::warn!(dependency, error = %e, "dropping release with malformed version");
                    None
                }
            })
            .collect();
        Self::new(releases)
    }

    /// All releases, oldest version first
    pub fn releases(&self) -> &[PackageRelease] {
        &self.releases
    }

    /// Releases that have not been yanked
    pub fn available(&self) -> Vec<PackageRelease> {
        self.releases.iter().filter(|r| !r.yanked).cloned().collect()
    }

    /// Find the release for a version, comparing by precedence
    pub fn get(&self, version: &Version) -> Option<&PackageRelease> {
        self.releases
            .iter()
            .find(|r| r.version.same_precedence(version))
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn release(s: &str) -> PackageRelease {
        PackageRelease::new(Version::parse(s).unwrap())
    }

    #[test]
    fn test_catalog_sorts_and_dedups() {
        let catalog = VersionCatalog::new(vec![
            release("2.0.0"),
            release("1.0.0"),
            release("1.10.0"),
            release("1.0.0"),
        ]);
        let versions: Vec<&str> = catalog.releases().iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.10.0", "2.0.0"]);
    }

    #[test]
    fn test_from_raw_drops_malformed() {
        let catalog = VersionCatalog::from_raw(
            "rails",
            vec![
                RawRelease::new("6.0.0"),
                RawRelease::new("not-a-version"),
                RawRelease::new("6.1.0"),
            ],
        );
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&Version::parse("6.1.0").unwrap()).is_some());
    }

    #[test]
    fn test_from_raw_keeps_metadata() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let mut raw = RawRelease::new("1.2.0").with_released_at(date);
        raw.tag = Some("v1.2.0".to_string());
        raw.yanked = true;

        let parsed = PackageRelease::from_raw(raw).unwrap();
        assert_eq!(parsed.released_at, Some(date));
        assert_eq!(parsed.tag.as_deref(), Some("v1.2.0"));
        assert!(parsed.yanked);
    }

    #[test]
    fn test_available_excludes_yanked() {
        let catalog = VersionCatalog::new(vec![release("1.0.0"), release("1.1.0").yanked()]);
        let available = catalog.available();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].version.as_str(), "1.0.0");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = VersionCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.available().is_empty());
    }

    #[test]
    fn test_raw_release_deserialize_defaults() {
        let raw: RawRelease = serde_json::from_str(r#"{"version": "1.0.0"}"#).unwrap();
        assert_eq!(raw, RawRelease::new("1.0.0"));
    }
}
