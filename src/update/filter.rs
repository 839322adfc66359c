//! Dependency selection
//!
//! Decides which dependencies of a job are looked at in the first place,
//! from `--only`, `--exclude` and ecosystem restrictions.

use crate::domain::{Dependency, Ecosystem, SkipReason};

/// Which dependencies a run processes
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Ecosystems to process (empty means all)
    pub ecosystems: Vec<Ecosystem>,
    /// Dependencies to exclude
    pub exclude: Vec<String>,
    /// If non-empty, only these dependencies
    pub only: Vec<String>,
}

impl UpdateFilter {
    /// Create a filter that lets everything through
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ecosystems to process
    pub fn with_ecosystems(mut self, ecosystems: Vec<Ecosystem>) -> Self {
        self.ecosystems = ecosystems;
        self
    }

    /// Set dependencies to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set dependencies to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if an ecosystem should be processed
    pub fn should_process_ecosystem(&self, ecosystem: Ecosystem) -> bool {
        self.ecosystems.is_empty() || self.ecosystems.contains(&ecosystem)
    }

    /// Check if a dependency name passes `--only` and `--exclude`
    pub fn should_process_package(&self, name: &str) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        !self.exclude.iter().any(|p| p == name)
    }

    /// Returns Some(SkipReason) if the dependency should not be processed
    pub fn skip_reason(&self, dependency: &Dependency) -> Option<SkipReason> {
        if !self.should_process_ecosystem(dependency.ecosystem) {
            return Some(SkipReason::Excluded);
        }
        if self.should_process_package(&dependency.name) {
            return None;
        }
        if self.only.is_empty() {
            Some(SkipReason::Excluded)
        } else {
            Some(SkipReason::NotInOnlyList)
        }
    }
}
