//! The outcome of resolving one dependency

use super::{DependencyFile, Requirement, Version};
use serde::{Deserialize, Serialize};

/// Target version plus the rewritten requirements that denote it
///
/// `target_version == None` means no change: either nothing newer is
/// acceptable or the dependency is already up to date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDecision {
    /// Version the dependency should move to
    pub target_version: Option<Version>,
    /// Requirements after rewriting, in the order they were supplied
    pub updated_requirements: Vec<Requirement>,
    /// Property-declaring files whose declarations were rewritten
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated_files: Vec<DependencyFile>,
}

impl UpdateDecision {
    /// A decision that leaves every requirement untouched
    pub fn unchanged(requirements: Vec<Requirement>) -> Self {
        Self {
            target_version: None,
            updated_requirements: requirements,
            updated_files: Vec::new(),
        }
    }

    /// A decision moving to `target`
    pub fn to(target: Version, updated_requirements: Vec<Requirement>) -> Self {
        Self {
            target_version: Some(target),
            updated_requirements,
            updated_files: Vec::new(),
        }
    }

    /// Attach rewritten files (builder pattern)
    pub fn with_files(mut self, files: Vec<DependencyFile>) -> Self {
        self.updated_files = files;
        self
    }

    /// Returns true if a target version was chosen
    pub fn has_target(&self) -> bool {
        self.target_version.is_some()
    }

    /// Pairs of `(before, after)` for requirements whose text or ref changed
    pub fn changed_requirements<'a>(
        &'a self,
        original: &'a [Requirement],
    ) -> impl Iterator<Item = (&'a Requirement, &'a Requirement)> {
        original
            .iter()
            .zip(self.updated_requirements.iter())
            .filter(|(before, after)| before != after)
    }
}
