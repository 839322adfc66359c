//! Per-dependency result types

use super::{Dependency, UpdateDecision, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a dependency was not updated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Current version is already the best acceptable one
    AlreadyUpToDate,
    /// Every candidate was filtered out
    NoUpdateAvailable,
    /// Security mode, and the current version is not affected by any advisory
    NotVulnerable,
    /// The release source failed; no update possible this run
    SourceUnavailable(String),
    /// Dependency was excluded via --exclude
    Excluded,
    /// Dependency not in --only list
    NotInOnlyList,
    /// Resolution failed with an error
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyUpToDate => write!(f, "already up to date"),
            SkipReason::NoUpdateAvailable => write!(f, "no update available"),
            SkipReason::NotVulnerable => write!(f, "not vulnerable"),
            SkipReason::SourceUnavailable(msg) => write!(f, "source unavailable: {}", msg),
            SkipReason::Excluded => write!(f, "excluded by --exclude"),
            SkipReason::NotInOnlyList => write!(f, "not in --only list"),
            SkipReason::Failed(msg) => write!(f, "failed: {}", msg),
        }
    }
}

/// Result of resolving a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateResult {
    /// Dependency will be updated
    Update {
        /// The dependency being updated
        dependency: Dependency,
        /// Target version and rewritten requirements
        decision: UpdateDecision,
    },
    /// Dependency update was skipped
    Skip {
        /// The dependency that was skipped
        dependency: Dependency,
        /// The reason for skipping
        reason: SkipReason,
    },
}

impl UpdateResult {
    /// Creates an Update result
    pub fn update(dependency: Dependency, decision: UpdateDecision) -> Self {
        UpdateResult::Update {
            dependency,
            decision,
        }
    }

    /// Creates a Skip result
    pub fn skip(dependency: Dependency, reason: SkipReason) -> Self {
        UpdateResult::Skip { dependency, reason }
    }

    /// Creates a Skip result for an up-to-date dependency
    pub fn skip_up_to_date(dependency: Dependency) -> Self {
        Self::skip(dependency, SkipReason::AlreadyUpToDate)
    }

    /// Creates a Skip result for a failed release source
    pub fn skip_source_unavailable(dependency: Dependency, message: impl Into<String>) -> Self {
        Self::skip(dependency, SkipReason::SourceUnavailable(message.into()))
    }

    /// Creates a Skip result for a resolution error
    pub fn skip_failed(dependency: Dependency, message: impl Into<String>) -> Self {
        Self::skip(dependency, SkipReason::Failed(message.into()))
    }

    /// Returns true if this is an update result
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateResult::Update { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, UpdateResult::Skip { .. })
    }

    /// Returns the dependency reference
    pub fn dependency(&self) -> &Dependency {
        match self {
            UpdateResult::Update { dependency, .. } => dependency,
            UpdateResult::Skip { dependency, .. } => dependency,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        &self.dependency().name
    }

    /// Returns the chosen target version, if any
    pub fn target_version(&self) -> Option<&Version> {
        match self {
            UpdateResult::Update { decision, .. } => decision.target_version.as_ref(),
            UpdateResult::Skip { .. } => None,
        }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateResult::Update {
                dependency,
                decision,
            } => {
                let target = decision
                    .target_version
                    .as_ref()
                    .map(|v| v.as_str())
                    .unwrap_or("-");
                write!(
                    f,
                    "{}: {} → {}",
                    dependency.name,
                    dependency.version_display(),
                    target
                )
            }
            UpdateResult::Skip { dependency, reason } => {
                write!(f, "{}: skipped ({})", dependency.name, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ecosystem, Requirement};

    fn sample_dependency() -> Dependency {
        Dependency::new("lodash", Ecosystem::Npm)
            .with_version("1.2.3")
            .with_requirement(Requirement::new("package.json", Some("^1.2.3")))
    }

    fn sample_decision() -> UpdateDecision {
        UpdateDecision::to(
            Version::parse("2.0.0").unwrap(),
            vec![Requirement::new("package.json", Some("^2.0.0"))],
        )
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(format!("{}", SkipReason::AlreadyUpToDate), "already up to date");
        assert_eq!(format!("{}", SkipReason::NotVulnerable), "not vulnerable");
        assert_eq!(
            format!("{}", SkipReason::SourceUnavailable("timeout".to_string())),
            "source unavailable: timeout"
        );
        assert_eq!(format!("{}", SkipReason::Excluded), "excluded by --exclude");
    }

    #[test]
    fn test_update_result_update() {
        let result = UpdateResult::update(sample_dependency(), sample_decision());
        assert!(result.is_update());
        assert!(!result.is_skip());
        assert_eq!(result.package_name(), "lodash");
        assert_eq!(result.target_version().unwrap().as_str(), "2.0.0");
    }

    #[test]
    fn test_update_result_skip() {
        let result = UpdateResult::skip_up_to_date(sample_dependency());
        assert!(result.is_skip());
        assert!(result.target_version().is_none());
        if let UpdateResult::Skip { reason, .. } = result {
            assert_eq!(reason, SkipReason::AlreadyUpToDate);
        } else {
            panic!("Expected Skip variant");
        }
    }

    #[test]
    fn test_skip_helpers() {
        let failed = UpdateResult::skip_failed(sample_dependency(), "boom");
        assert!(matches!(failed, UpdateResult::Skip { reason: SkipReason::Failed(_), .. }));

        let unavailable = UpdateResult::skip_source_unavailable(sample_dependency(), "down");
        assert!(matches!(
            unavailable,
            UpdateResult::Skip { reason: SkipReason::SourceUnavailable(_), .. }
        ));
    }

    #[test]
    fn test_update_result_display() {
        let update = UpdateResult::update(sample_dependency(), sample_decision());
        assert_eq!(format!("{}", update), "lodash: 1.2.3 → 2.0.0");

        let skip = UpdateResult::skip(sample_dependency(), SkipReason::NoUpdateAvailable);
        assert_eq!(format!("{}", skip), "lodash: skipped (no update available)");
    }

    #[test]
    fn test_serde_update_result() {
        let result = UpdateResult::update(sample_dependency(), sample_decision());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"type\":\"update\""));
        let parsed: UpdateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
