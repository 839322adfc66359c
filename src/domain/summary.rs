//! Batch summary types

use super::{Ecosystem, UpdateResult};
use serde::{Deserialize, Serialize};

/// Summary of one batch run over many dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    /// Results in the order dependencies were supplied
    pub results: Vec<UpdateResult>,
    /// Whether the run only looked for security fixes
    pub security_only: bool,
}

impl BatchSummary {
    /// Creates a new BatchSummary
    pub fn new(security_only: bool) -> Self {
        Self {
            results: Vec::new(),
            security_only,
        }
    }

    /// Adds a dependency result
    pub fn add_result(&mut self, result: UpdateResult) {
        self.results.push(result);
    }

    /// Returns the total number of dependencies updated
    pub fn total_updates(&self) -> usize {
        self.updates().count()
    }

    /// Returns the total number of dependencies skipped
    pub fn total_skips(&self) -> usize {
        self.skips().count()
    }

    /// Returns the total number of dependencies processed
    pub fn total_dependencies(&self) -> usize {
        self.results.len()
    }

    /// Returns true if any dependency gets a new version
    pub fn has_updates(&self) -> bool {
        self.total_updates() > 0
    }

    /// Returns all updates
    pub fn updates(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_update())
    }

    /// Returns all skips
    pub fn skips(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_skip())
    }

    /// Returns results for one ecosystem
    pub fn by_ecosystem(&self, ecosystem: Ecosystem) -> impl Iterator<Item = &UpdateResult> {
        self.results
            .iter()
            .filter(move |r| r.dependency().ecosystem == ecosystem)
    }

    /// Ecosystems present in the batch, in first-seen order
    pub fn ecosystems(&self) -> Vec<Ecosystem> {
        let mut seen = Vec::new();
        for result in &self.results {
            let ecosystem = result.dependency().ecosystem;
            if !seen.contains(&ecosystem) {
                seen.push(ecosystem);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dependency, SkipReason, UpdateDecision, Version};

    fn update(name: &str, ecosystem: Ecosystem) -> UpdateResult {
        UpdateResult::update(
            Dependency::new(name, ecosystem).with_version("1.0.0"),
            UpdateDecision::to(Version::parse("2.0.0").unwrap(), Vec::new()),
        )
    }

    fn skip(name: &str, ecosystem: Ecosystem) -> UpdateResult {
        UpdateResult::skip(Dependency::new(name, ecosystem), SkipReason::AlreadyUpToDate)
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::new(false);
        assert_eq!(summary.total_dependencies(), 0);
        assert!(!summary.has_updates());
        assert!(summary.ecosystems().is_empty());
    }

    #[test]
    fn test_counts() {
        let mut summary = BatchSummary::new(false);
        summary.add_result(update("rails", Ecosystem::Bundler));
        summary.add_result(skip("rack", Ecosystem::Bundler));
        summary.add_result(update("lodash", Ecosystem::Npm));

        assert_eq!(summary.total_updates(), 2);
        assert_eq!(summary.total_skips(), 1);
        assert_eq!(summary.total_dependencies(), 3);
        assert!(summary.has_updates());
    }

    #[test]
    fn test_by_ecosystem() {
        let mut summary = BatchSummary::new(true);
        summary.add_result(update("rails", Ecosystem::Bundler));
        summary.add_result(update("lodash", Ecosystem::Npm));
        summary.add_result(skip("rack", Ecosystem::Bundler));

        assert_eq!(summary.by_ecosystem(Ecosystem::Bundler).count(), 2);
        assert_eq!(
            summary.ecosystems(),
            vec![Ecosystem::Bundler, Ecosystem::Npm]
        );
        assert!(summary.security_only);
    }
}
