//! Job files
//!
//! A job file is a JSON snapshot of everything the engine needs for one run:
//! dependencies with their requirement records, the releases a registry
//! reported for each of them, advisories, ignore expressions and the
//! property-declaring files. Release dates missing from a release can be
//! supplied separately under `release_dates`, keyed by dependency then version;
//! a name there applies to every ecosystem the job lists it under.

use crate::domain::{Dependency, DependencyFile, IgnoreRule, RawRelease, SecurityAdvisory};
use crate::error::JobError;
use crate::source::SnapshotSource;
use crate::update::DependencyRules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One dependency entry of a job file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDependency {
    #[serde(flatten)]
    pub dependency: Dependency,
    /// Releases as reported by the registry
    #[serde(default)]
    pub releases: Vec<RawRelease>,
    #[serde(default)]
    pub advisories: Vec<SecurityAdvisory>,
    /// Ignore expressions specific to this dependency
    #[serde(default)]
    pub ignored_versions: Vec<IgnoreRule>,
}

impl JobDependency {
    /// Rules for this dependency combined with run-wide ignore rules
    pub fn rules(&self, extra_ignores: &[IgnoreRule]) -> DependencyRules {
        let mut ignore_rules = self.ignored_versions.clone();
        ignore_rules.extend(extra_ignores.iter().cloned());
        DependencyRules::new()
            .with_ignore_rules(ignore_rules)
            .with_advisories(self.advisories.clone())
    }
}

/// A complete job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub files: Vec<DependencyFile>,
    #[serde(default)]
    pub dependencies: Vec<JobDependency>,
    #[serde(default)]
    pub release_dates: BTreeMap<String, BTreeMap<String, DateTime<Utc>>>,
}

impl Job {
    /// Load a job file
    pub fn from_file(path: &Path) -> Result<Self, JobError> {
        let content = std::fs::read_to_string(path).map_err(|source| JobError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse job JSON; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, JobError> {
        serde_json::from_str(content).map_err(|e| JobError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Release source answering from this job's recorded data
    pub fn source(&self) -> SnapshotSource {
        let source = self.dependencies.iter().fold(SnapshotSource::new(), |source, entry| {
            source.with_releases(
                entry.dependency.ecosystem,
                entry.dependency.name.clone(),
                entry.releases.clone(),
            )
        });
        self.dependencies
            .iter()
            .filter_map(|entry| {
                let dates = self.release_dates.get(&entry.dependency.name)?;
                Some((entry.dependency.ecosystem, &entry.dependency.name, dates))
            })
            .flat_map(|(ecosystem, name, dates)| {
                dates.iter().map(move |(version, date)| (ecosystem, name, version, *date))
            })
            .fold(source, |source, (ecosystem, name, version, date)| {
                source.with_release_date(ecosystem, name.clone(), version.clone(), date)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ecosystem, Version};
    use crate::source::ReleaseSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const JOB: &str = r#"{
        "files": [{"name": "build.gradle", "content": "ext.kotlin_version = '1.2.61'\n"}],
        "dependencies": [
            {
                "name": "rails",
                "ecosystem": "bundler",
                "version": "6.1.0",
                "requirements": [{"file": "Gemfile", "requirement": "~> 6.1", "groups": ["default"]}],
                "releases": [
                    {"version": "6.1.0", "released_at": "2021-01-01T00:00:00Z"},
                    {"version": "7.0.4"}
                ],
                "advisories": [{"id": "GHSA-xxxx", "vulnerable_versions": ["< 6.1.7"]}],
                "ignored_versions": [">= 8.0"]
            }
        ],
        "release_dates": {"rails": {"7.0.4": "2022-09-09T00:00:00Z"}}
    }"#;

    #[test]
    fn test_parse_job() {
        let job = Job::parse(JOB, Path::new("job.json")).unwrap();
        assert_eq!(job.files.len(), 1);
        assert_eq!(job.dependencies.len(), 1);

        let entry = &job.dependencies[0];
        assert_eq!(entry.dependency.name, "rails");
        assert_eq!(entry.dependency.ecosystem, Ecosystem::Bundler);
        assert_eq!(entry.dependency.requirements[0].groups, vec!["default".to_string()]);
        assert_eq!(entry.releases.len(), 2);
        assert_eq!(entry.advisories[0].id.as_deref(), Some("GHSA-xxxx"));
        assert!(entry.ignored_versions[0].ignores(&Version::parse("8.0.1").unwrap()));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Job::parse("{ not json", Path::new("broken.json")).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(JOB.as_bytes()).unwrap();
        let job = Job::from_file(file.path()).unwrap();
        assert_eq!(job.dependencies.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = Job::from_file(Path::new("/nonexistent/job.json")).unwrap_err();
        assert!(matches!(err, JobError::ReadError { .. }));
    }

    #[test]
    fn test_rules_merge_extra_ignores() {
        let job = Job::parse(JOB, Path::new("job.json")).unwrap();
        let extra = vec![IgnoreRule::parse("7.0.4").unwrap()];
        let rules = job.dependencies[0].rules(&extra);
        assert_eq!(rules.ignore_rules.len(), 2);
        assert_eq!(rules.advisories.len(), 1);
    }

    #[tokio::test]
    async fn test_source_serves_releases_and_dates() {
        let job = Job::parse(JOB, Path::new("job.json")).unwrap();
        let source = job.source();
        let dependency = &job.dependencies[0].dependency;

        assert_eq!(source.list_releases(dependency).await.unwrap().len(), 2);
        let date = source
            .release_date(dependency, &Version::parse("7.0.4").unwrap())
            .await
            .unwrap();
        assert!(date.is_some());
    }
}
