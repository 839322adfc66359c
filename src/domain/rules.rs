//! Ignore rules and security advisories
//!
//! Both are side-effect free predicates over a [`Version`]:
//! - [`IgnoreRule`] rejects exactly the versions its expression matches
//! - [`SecurityAdvisory`] reports whether a version is affected

use super::Version;
use crate::constraint::VersionReq;
use crate::error::ConstraintError;
use serde::{Deserialize, Serialize};

/// A user-configured expression of versions that must never be proposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreRule {
    requirement: VersionReq,
}

impl IgnoreRule {
    /// Parse an ignore expression such as `>= 2.0` or `1.x`
    pub fn parse(expression: &str) -> Result<Self, ConstraintError> {
        Ok(Self {
            requirement: VersionReq::parse(expression)?,
        })
    }

    /// Returns true if `version` must be removed from consideration
    pub fn ignores(&self, version: &Version) -> bool {
        self.requirement.matches(version)
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        self.requirement.as_str()
    }
}

impl From<VersionReq> for IgnoreRule {
    fn from(requirement: VersionReq) -> Self {
        Self { requirement }
    }
}

/// A published vulnerability affecting a range of versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAdvisory {
    /// Advisory identifier (GHSA, CVE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Ranges known to be affected
    #[serde(default)]
    pub vulnerable_versions: Vec<VersionReq>,
    /// Ranges known to be unaffected
    #[serde(default)]
    pub safe_versions: Vec<VersionReq>,
}

impl SecurityAdvisory {
    /// Create an advisory from its vulnerable ranges
    pub fn new(vulnerable_versions: Vec<VersionReq>) -> Self {
        Self {
            id: None,
            vulnerable_versions,
            safe_versions: Vec::new(),
        }
    }

    /// Set the identifier (builder pattern)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the safe ranges (builder pattern)
    pub fn with_safe_versions(mut self, safe_versions: Vec<VersionReq>) -> Self {
        self.safe_versions = safe_versions;
        self
    }

    /// Returns true if `version` is affected by this advisory
    ///
    /// A safe range always wins. Without vulnerable ranges, anything outside
    /// the safe ranges is considered affected.
    pub fn vulnerable(&self, version: &Version) -> bool {
        if self.safe_versions.iter().any(|r| r.matches(version)) {
            return false;
        }
        if self.vulnerable_versions.iter().any(|r| r.matches(version)) {
            return true;
        }
        if !self.vulnerable_versions.is_empty() {
            return false;
        }
        !self.safe_versions.is_empty()
    }
}
