//! Candidate filters
//!
//! Each filter is a plain function over a list of releases. The pipeline
//! applies them in a fixed order: ignore rules, pre-releases, advisories.
//! Cooldown runs last and is usually applied lazily by the coordinator, see
//! [`filter_cooldown`] for the eager form.

use super::cooldown::CooldownPolicy;
use crate::domain::{IgnoreRule, PackageRelease, SecurityAdvisory, Version};
use crate::error::EngineError;
use tracing::debug;

/// Remove releases matched by any ignore rule
///
/// With `raise_on_ignored`, removing every release of a non-empty list is an error.
pub fn filter_ignored(
    dependency: &str,
    releases: Vec<PackageRelease>,
    rules: &[IgnoreRule],
    raise_on_ignored: bool,
) -> Result<Vec<PackageRelease>, EngineError> {
    if rules.is_empty() {
        return Ok(releases);
    }
    let had_candidates = !releases.is_empty();
    let remaining: Vec<PackageRelease> = releases
        .into_iter()
        .filter(|r| !rules.iter().any(|rule| rule.ignores(&r.version)))
        .collect();
    if remaining.is_empty() && had_candidates && raise_on_ignored {
        return Err(EngineError::all_versions_ignored(dependency));
    }
    Ok(remaining)
}

/// Remove pre-releases unless they are allowed
pub fn filter_prereleases(releases: Vec<PackageRelease>, allow_prereleases: bool) -> Vec<PackageRelease> {
    if allow_prereleases {
        return releases;
    }
    releases
        .into_iter()
        .filter(|r| !r.version.is_prerelease())
        .collect()
}

/// Remove releases any advisory marks vulnerable
pub fn filter_vulnerable(
    releases: Vec<PackageRelease>,
    advisories: &[SecurityAdvisory],
) -> Vec<PackageRelease> {
    releases
        .into_iter()
        .filter(|r| !advisories.iter().any(|a| a.vulnerable(&r.version)))
        .collect()
}

/// Remove releases still inside their cooldown window, using known dates only
pub fn filter_cooldown(
    releases: Vec<PackageRelease>,
    policy: &CooldownPolicy,
    current: &Version,
) -> Vec<PackageRelease> {
    releases
        .into_iter()
        .filter(|r| {
            let held = policy.in_cooldown(current, &r.version, r.released_at);
            if held {
                debug!(version = %r.version, "Release held back by cooldown");
            }
            !held
        })
        .collect()
}

/// Ordered filter configuration for one dependency
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    dependency: String,
    ignore_rules: Vec<IgnoreRule>,
    raise_on_ignored: bool,
    allow_prereleases: bool,
    advisories: Vec<SecurityAdvisory>,
}

impl FilterPipeline {
    pub fn new(dependency: impl Into<String>) -> Self {
        Self {
            dependency: dependency.into(),
            ..Self::default()
        }
    }

    /// Set ignore rules (builder pattern)
    pub fn with_ignore_rules(mut self, rules: Vec<IgnoreRule>) -> Self {
        self.ignore_rules = rules;
        self
    }

    /// Fail when ignore rules remove everything (builder pattern)
    pub fn with_raise_on_ignored(mut self, raise: bool) -> Self {
        self.raise_on_ignored = raise;
        self
    }

    /// Keep pre-releases (builder pattern)
    pub fn with_prereleases(mut self, allow: bool) -> Self {
        self.allow_prereleases = allow;
        self
    }

    /// Set advisories for the security path (builder pattern)
    pub fn with_advisories(mut self, advisories: Vec<SecurityAdvisory>) -> Self {
        self.advisories = advisories;
        self
    }

    /// Ignore and pre-release filters; cooldown follows separately
    pub fn apply_for_latest(&self, releases: Vec<PackageRelease>) -> Result<Vec<PackageRelease>, EngineError> {
        let releases = filter_ignored(
            &self.dependency,
            releases,
            &self.ignore_rules,
            self.raise_on_ignored,
        )?;
        Ok(filter_prereleases(releases, self.allow_prereleases))
    }

    /// Ignore, pre-release and vulnerability filters
    pub fn apply_for_security(&self, releases: Vec<PackageRelease>) -> Result<Vec<PackageRelease>, EngineError> {
        let releases = self.apply_for_latest(releases)?;
        Ok(filter_vulnerable(releases, &self.advisories))
    }
}
