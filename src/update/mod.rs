//! Update decisions for one dependency
//!
//! This module provides:
//! - Dependency selection from `--only` / `--exclude`
//! - Candidate filters (ignore rules, pre-releases, advisories, cooldown)
//! - Target selection and the per-run release date cache
//! - The coordinator that walks a dependency through
//!   `Start -> CatalogBuilt -> Filtered -> Selected -> Rewritten -> Done`

pub mod cooldown;
mod filter;
pub mod pipeline;
mod release_dates;
pub mod selector;

pub use cooldown::{BumpType, CooldownOptions, CooldownPolicy};
pub use filter::UpdateFilter;
pub use pipeline::FilterPipeline;
pub use release_dates::ReleaseDateCache;

use crate::domain::{
    Dependency, DependencyFile, IgnoreRule, PackageRelease, SecurityAdvisory, SkipReason,
    UpdateDecision, UpdateResult, Version, VersionCatalog,
};
use crate::error::{EngineError, SourceError};
use crate::grammar::{get_grammar, RequirementRewriter, UpdateStrategy};
use crate::source::ReleaseSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for a single release source call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which target a run looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    /// Newest acceptable release
    #[default]
    Latest,
    /// Lowest release that is no longer vulnerable
    SecurityFix,
}

/// Stage of one dependency's resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    Start,
    CatalogBuilt,
    Filtered,
    Selected,
    Rewritten,
    Done,
    Aborted,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionStage::Start => "start",
            ResolutionStage::CatalogBuilt => "catalog_built",
            ResolutionStage::Filtered => "filtered",
            ResolutionStage::Selected => "selected",
            ResolutionStage::Rewritten => "rewritten",
            ResolutionStage::Done => "done",
            ResolutionStage::Aborted => "aborted",
        };
        write!(f, "{}", name)
    }
}

/// Settings shared by every dependency of a run
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub mode: UpdateMode,
    /// Fail instead of skipping when ignore rules remove every release
    pub raise_on_ignored: bool,
    pub strategy: UpdateStrategy,
    pub cooldown: CooldownOptions,
    /// Timeout for each release source call
    pub timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            mode: UpdateMode::default(),
            raise_on_ignored: false,
            strategy: UpdateStrategy::default(),
            cooldown: CooldownOptions::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode (builder pattern)
    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set raise_on_ignored (builder pattern)
    pub fn with_raise_on_ignored(mut self, raise: bool) -> Self {
        self.raise_on_ignored = raise;
        self
    }

    /// Set the update strategy (builder pattern)
    pub fn with_strategy(mut self, strategy: UpdateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set cooldown options (builder pattern)
    pub fn with_cooldown(mut self, cooldown: CooldownOptions) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set the source call timeout (builder pattern)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Ignore rules and advisories that apply to one dependency
#[derive(Debug, Clone, Default)]
pub struct DependencyRules {
    pub ignore_rules: Vec<IgnoreRule>,
    pub advisories: Vec<SecurityAdvisory>,
}

impl DependencyRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set ignore rules (builder pattern)
    pub fn with_ignore_rules(mut self, rules: Vec<IgnoreRule>) -> Self {
        self.ignore_rules = rules;
        self
    }

    /// Set advisories (builder pattern)
    pub fn with_advisories(mut self, advisories: Vec<SecurityAdvisory>) -> Self {
        self.advisories = advisories;
        self
    }
}

enum Candidates {
    Ready(Vec<PackageRelease>),
    Unavailable(String),
}

/// Decides whether and how one dependency is updated
pub struct UpdateDecisionCoordinator {
    source: Arc<dyn ReleaseSource>,
    settings: ResolverSettings,
    cooldown: CooldownPolicy,
    files: Vec<DependencyFile>,
    dates: Arc<ReleaseDateCache>,
}

impl UpdateDecisionCoordinator {
    /// Create a coordinator evaluating cooldown against the current time
    pub fn new(source: Arc<dyn ReleaseSource>, settings: ResolverSettings) -> Self {
        Self::with_time(source, settings, Utc::now())
    }

    /// Create a coordinator with a custom current time (for testing)
    pub fn with_time(
        source: Arc<dyn ReleaseSource>,
        settings: ResolverSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let cooldown = CooldownPolicy::new(settings.cooldown.clone(), now);
        Self {
            source,
            settings,
            cooldown,
            files: Vec::new(),
            dates: Arc::new(ReleaseDateCache::new()),
        }
    }

    /// Files that may hold property declarations (builder pattern)
    pub fn with_files(mut self, files: Vec<DependencyFile>) -> Self {
        self.files = files;
        self
    }

    /// Share a release date cache with other coordinators of the same run (builder pattern)
    pub fn with_date_cache(mut self, cache: Arc<ReleaseDateCache>) -> Self {
        self.dates = cache;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn date_cache(&self) -> &ReleaseDateCache {
        &self.dates
    }

    /// Resolve a dependency into an update or a skip
    ///
    /// Errors are limited to ignore rules removing everything (when asked to
    /// raise), unresolvable symbolic requirements, and authentication or
    /// validation failures of the release source.
    pub async fn resolve(
        &self,
        dependency: &Dependency,
        rules: &DependencyRules,
    ) -> Result<UpdateResult, EngineError> {
        let name = dependency.name.as_str();
        self.enter(name, ResolutionStage::Start);
        let current = dependency.current_version();

        if self.settings.mode == UpdateMode::SecurityFix {
            let vulnerable = current
                .as_ref()
                .is_some_and(|c| rules.advisories.iter().any(|a| a.vulnerable(c)));
            if !vulnerable {
                self.enter(name, ResolutionStage::Done);
                return Ok(UpdateResult::skip(dependency.clone(), SkipReason::NotVulnerable));
            }
        }

        let candidates = match self
            .candidates(dependency, current.as_ref(), rules, self.settings.mode)
            .await?
        {
            Candidates::Ready(candidates) => candidates,
            Candidates::Unavailable(message) => {
                self.enter(name, ResolutionStage::Done);
                return Ok(UpdateResult::skip_source_unavailable(dependency.clone(), message));
            }
        };

        let target = match (self.settings.mode, current.as_ref()) {
            (UpdateMode::SecurityFix, Some(current)) => {
                selector::lowest_security_fix(&candidates, current).cloned()
            }
            _ => {
                self.latest_outside_cooldown(dependency, current.as_ref(), &candidates, |_| true)
                    .await
            }
        };
        self.enter(name, ResolutionStage::Selected);

        let Some(target) = target else {
            debug!(
                dependency = name,
                newest = ?selector::latest(&candidates).map(|r| r.version.to_string()),
                "No acceptable target"
            );
            self.enter(name, ResolutionStage::Done);
            return Ok(UpdateResult::skip(dependency.clone(), SkipReason::NoUpdateAvailable));
        };

        if current
            .as_ref()
            .is_some_and(|c| target.version.cmp_precedence(c) != Ordering::Greater)
        {
            self.enter(name, ResolutionStage::Done);
            return Ok(UpdateResult::skip_up_to_date(dependency.clone()));
        }

        let grammar = get_grammar(dependency.ecosystem);
        let output = RequirementRewriter::new(grammar.as_ref(), self.settings.strategy)
            .with_files(&self.files)
            .rewrite(dependency, current.as_ref(), &target)
            .inspect_err(|_| self.enter(name, ResolutionStage::Aborted))?;
        self.enter(name, ResolutionStage::Rewritten);

        // Without a known current version only a changed requirement counts
        if current.is_none()
            && output.files.is_empty()
            && output.requirements == dependency.requirements
        {
            self.enter(name, ResolutionStage::Done);
            return Ok(UpdateResult::skip_up_to_date(dependency.clone()));
        }

        info!(
            dependency = name,
            from = dependency.version_display(),
            to = %target.version,
            "Update selected"
        );
        self.enter(name, ResolutionStage::Done);
        let decision =
            UpdateDecision::to(target.version, output.requirements).with_files(output.files);
        Ok(UpdateResult::update(dependency.clone(), decision))
    }

    /// Like [`resolve`](Self::resolve), reduced to the decision itself
    pub async fn decide(
        &self,
        dependency: &Dependency,
        rules: &DependencyRules,
    ) -> Result<UpdateDecision, EngineError> {
        Ok(match self.resolve(dependency, rules).await? {
            UpdateResult::Update { decision, .. } => decision,
            UpdateResult::Skip { dependency, .. } => UpdateDecision::unchanged(dependency.requirements),
        })
    }

    /// Newest acceptable release that every current requirement already admits
    pub async fn latest_resolvable_without_unlock(
        &self,
        dependency: &Dependency,
        rules: &DependencyRules,
    ) -> Result<Option<Version>, EngineError> {
        let current = dependency.current_version();
        let candidates = match self
            .candidates(dependency, current.as_ref(), rules, UpdateMode::Latest)
            .await?
        {
            Candidates::Ready(candidates) => candidates,
            Candidates::Unavailable(_) => return Ok(None),
        };

        let grammar = get_grammar(dependency.ecosystem);
        let texts: Vec<&str> = dependency.requirement_texts().collect();
        let target = self
            .latest_outside_cooldown(dependency, current.as_ref(), &candidates, |v| {
                texts
                    .iter()
                    .all(|text| grammar.satisfied_by(text, v) != Some(false))
            })
            .await;
        Ok(target.map(|r| r.version))
    }

    fn enter(&self, dependency: &str, stage: ResolutionStage) {
        debug!(dependency, %stage, "Resolution stage");
    }

    async fn fetch_catalog(&self, dependency: &Dependency) -> Result<VersionCatalog, SourceError> {
        let raw = tokio::time::timeout(self.settings.timeout, self.source.list_releases(dependency))
            .await
            .map_err(|_| SourceError::timeout(&dependency.name, self.source.name()))??;
        Ok(VersionCatalog::from_raw(&dependency.name, raw))
    }

    async fn candidates(
        &self,
        dependency: &Dependency,
        current: Option<&Version>,
        rules: &DependencyRules,
        mode: UpdateMode,
    ) -> Result<Candidates, EngineError> {
        let name = dependency.name.as_str();
        let catalog = match self.fetch_catalog(dependency).await {
            Ok(catalog) => catalog,
            Err(e) if e.is_fatal() => {
                self.enter(name, ResolutionStage::Aborted);
                return Err(e.into());
            }
            Err(e) => {
                warn!(dependency = name, error = %e, "Release source unavailable, no update possible this run");
                return Ok(Candidates::Unavailable(e.to_string()));
            }
        };
        self.enter(name, ResolutionStage::CatalogBuilt);

        let grammar = get_grammar(dependency.ecosystem);
        let allow_prereleases = current.is_some_and(|c| c.is_prerelease())
            || dependency
                .requirement_texts()
                .any(|text| grammar.requires_prerelease(text));

        let pipeline = FilterPipeline::new(name)
            .with_ignore_rules(rules.ignore_rules.clone())
            .with_raise_on_ignored(self.settings.raise_on_ignored)
            .with_prereleases(allow_prereleases)
            .with_advisories(rules.advisories.clone());
        let available = catalog.available();
        let filtered = match mode {
            UpdateMode::Latest => pipeline.apply_for_latest(available),
            UpdateMode::SecurityFix => pipeline.apply_for_security(available),
        }
        .inspect_err(|_| self.enter(name, ResolutionStage::Aborted))?;

        debug!(
            dependency = name,
            catalog = catalog.len(),
            candidates = filtered.len(),
            "Filtered candidates"
        );
        self.enter(name, ResolutionStage::Filtered);
        Ok(Candidates::Ready(filtered))
    }

    /// Walk candidates from the top and stop at the first one outside its
    /// cooldown window, fetching release dates only as needed
    async fn latest_outside_cooldown(
        &self,
        dependency: &Dependency,
        current: Option<&Version>,
        candidates: &[PackageRelease],
        accept: impl Fn(&Version) -> bool,
    ) -> Option<PackageRelease> {
        let options = self.cooldown.options();
        let current = current.filter(|_| !options.is_disabled() && options.applies_to(&dependency.name));
        let Some(current) = current else {
            return selector::latest_matching(candidates, accept).cloned();
        };

        for release in candidates.iter().rev() {
            if !accept(&release.version) {
                continue;
            }
            if release.version.cmp_precedence(current) != Ordering::Greater {
                return Some(release.clone());
            }
            let released_at = match release.released_at {
                Some(date) => Some(date),
                None => {
                    self.dates
                        .get_or_fetch(
                            self.source.as_ref(),
                            dependency,
                            &release.version,
                            self.settings.timeout,
                        )
                        .await
                }
            };
            if self.cooldown.in_cooldown(current, &release.version, released_at) {
                debug!(
                    dependency = %dependency.name,
                    version = %release.version,
                    bump = BumpType::between(current, &release.version).label(),
                    "Release held back by cooldown"
                );
                continue;
            }
            return Some(release.clone());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::VersionReq;
    use crate::domain::{Ecosystem, RawRelease, Requirement};
    use crate::source::SnapshotSource;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn raw(versions: &[&str]) -> Vec<RawRelease> {
        versions.iter().map(|v| RawRelease::new(*v)).collect()
    }

    fn rails(version: &str, requirement: &str) -> Dependency {
        Dependency::new("rails", Ecosystem::Bundler)
            .with_version(version)
            .with_requirement(Requirement::new("Gemfile", Some(requirement)))
    }

    fn coordinator(source: SnapshotSource, settings: ResolverSettings) -> UpdateDecisionCoordinator {
        UpdateDecisionCoordinator::with_time(Arc::new(source), settings, fixed_time())
    }

    #[tokio::test]
    async fn test_resolve_simple_update() {
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Bundler,
            "rails",
            raw(&["6.1.0", "7.0.4", "7.1.0.beta1"]),
        );
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&rails("6.1.0", "~> 6.1"), &DependencyRules::new())
            .await
            .unwrap();

        assert!(result.is_update());
        assert_eq!(result.target_version().unwrap().as_str(), "7.0.4");
        if let UpdateResult::Update { decision, .. } = result {
            assert_eq!(decision.updated_requirements[0].requirement.as_deref(), Some("~> 7.0"));
        }
    }

    #[tokio::test]
    async fn test_resolve_already_up_to_date() {
        let source =
            SnapshotSource::new().with_releases(Ecosystem::Bundler, "rails", raw(&["6.1.0", "7.0.4"]));
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&rails("7.0.4", "~> 7.0"), &DependencyRules::new())
            .await
            .unwrap();
        assert_eq!(result, UpdateResult::skip_up_to_date(rails("7.0.4", "~> 7.0")));
    }

    #[tokio::test]
    async fn test_resolve_prevents_downgrade() {
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Cargo,
            "mockall",
            raw(&["0.9.1", "0.10.0", "0.11.0"]),
        );
        let dependency = Dependency::new("mockall", Ecosystem::Cargo)
            .with_version("0.13.0")
            .with_requirement(Requirement::new("Cargo.toml", Some("0.13")));
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&dependency, &DependencyRules::new())
            .await
            .unwrap();
        assert!(matches!(result, UpdateResult::Skip { reason: SkipReason::AlreadyUpToDate, .. }));
    }

    #[tokio::test]
    async fn test_prerelease_allowed_when_requirement_asks() {
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Bundler,
            "rails",
            raw(&["7.0.4", "7.1.0.beta1"]),
        );
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&rails("7.1.0.alpha", ">= 7.1.0.alpha"), &DependencyRules::new())
            .await
            .unwrap();
        assert_eq!(result.target_version().unwrap().as_str(), "7.1.0.beta1");
    }

    #[tokio::test]
    async fn test_lowest_security_fix() {
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Npm,
            "minimist",
            raw(&["1.0.0", "1.4.0", "1.5.0", "1.6.0"]),
        );
        let dependency = Dependency::new("minimist", Ecosystem::Npm)
            .with_version("1.0.0")
            .with_requirement(Requirement::new("package.json", Some("1.0.0")));
        let rules = DependencyRules::new().with_advisories(vec![SecurityAdvisory::new(vec![
            VersionReq::parse(">= 1.0.0, < 1.5.0").unwrap(),
        ])]);
        let settings = ResolverSettings::new().with_mode(UpdateMode::SecurityFix);

        let result = coordinator(source, settings).resolve(&dependency, &rules).await.unwrap();
        assert_eq!(result.target_version().unwrap().as_str(), "1.5.0");
    }

    #[tokio::test]
    async fn test_security_fix_not_vulnerable() {
        let source = SnapshotSource::new();
        let dependency = Dependency::new("minimist", Ecosystem::Npm).with_version("1.6.0");
        let rules = DependencyRules::new().with_advisories(vec![SecurityAdvisory::new(vec![
            VersionReq::parse("< 1.5.0").unwrap(),
        ])]);
        let settings = ResolverSettings::new().with_mode(UpdateMode::SecurityFix);

        let result = coordinator(source, settings).resolve(&dependency, &rules).await.unwrap();
        assert!(matches!(result, UpdateResult::Skip { reason: SkipReason::NotVulnerable, .. }));
    }

    #[tokio::test]
    async fn test_all_ignored_raise_and_skip() {
        let releases = raw(&["1.0.0", "1.1.0", "2.0.0"]);
        let rules = DependencyRules::new().with_ignore_rules(vec![IgnoreRule::parse(">= 0").unwrap()]);
        let dependency = rails("0.9.0", "~> 0.9");

        let source = SnapshotSource::new().with_releases(Ecosystem::Bundler, "rails", releases.clone());
        let err = coordinator(source, ResolverSettings::new().with_raise_on_ignored(true))
            .resolve(&dependency, &rules)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::AllVersionsIgnored { .. }));

        let source = SnapshotSource::new().with_releases(Ecosystem::Bundler, "rails", releases);
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&dependency, &rules)
            .await
            .unwrap();
        assert!(matches!(result, UpdateResult::Skip { reason: SkipReason::NoUpdateAvailable, .. }));
    }

    #[tokio::test]
    async fn test_cooldown_walks_down_and_fetches_lazily() {
        let now = fixed_time();
        let source = Arc::new(
            SnapshotSource::new()
                .with_releases(
                    Ecosystem::Bundler,
                    "rails",
                    vec![
                        RawRelease::new("1.0.0").with_released_at(now - chrono::Duration::days(90)),
                        RawRelease::new("1.1.0").with_released_at(now - chrono::Duration::days(30)),
                        RawRelease::new("1.2.0"),
                        RawRelease::new("1.3.0").with_released_at(now - chrono::Duration::days(1)),
                    ],
                )
                .with_release_date(Ecosystem::Bundler, "rails", "1.2.0", now - chrono::Duration::days(2)),
        );
        let settings = ResolverSettings::new().with_cooldown(CooldownOptions::new(7));
        let coordinator = UpdateDecisionCoordinator::with_time(source.clone(), settings, now);

        let result = coordinator
            .resolve(&rails("1.0.0", "~> 1.0"), &DependencyRules::new())
            .await
            .unwrap();
        assert_eq!(result.target_version().unwrap().as_str(), "1.1.0");
        assert_eq!(source.date_lookups(), 1);
    }

    #[tokio::test]
    async fn test_cooldown_skipped_for_excluded_dependency() {
        let now = fixed_time();
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Bundler,
            "rails",
            vec![
                RawRelease::new("1.0.0"),
                RawRelease::new("1.1.0").with_released_at(now - chrono::Duration::days(1)),
            ],
        );
        let cooldown = CooldownOptions::new(7).with_exclude(vec!["rails".to_string()]);
        let result = coordinator(source, ResolverSettings::new().with_cooldown(cooldown))
            .resolve(&rails("1.0.0", "~> 1.0"), &DependencyRules::new())
            .await
            .unwrap();
        assert_eq!(result.target_version().unwrap().as_str(), "1.1.0");
    }

    #[tokio::test]
    async fn test_recoverable_source_failure_is_a_skip() {
        let source = SnapshotSource::new()
            .with_failure("rails", SourceError::unavailable("rails", "snapshot", "503"));
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&rails("1.0.0", "~> 1.0"), &DependencyRules::new())
            .await
            .unwrap();
        assert!(matches!(result, UpdateResult::Skip { reason: SkipReason::SourceUnavailable(_), .. }));
    }

    #[tokio::test]
    async fn test_authentication_failure_propagates() {
        let source = SnapshotSource::new()
            .with_failure("rails", SourceError::authentication("snapshot", "401"));
        let err = coordinator(source, ResolverSettings::new())
            .resolve(&rails("1.0.0", "~> 1.0"), &DependencyRules::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Source(_)));
    }

    #[tokio::test]
    async fn test_yanked_releases_are_never_selected() {
        let mut yanked = RawRelease::new("1.2.0");
        yanked.yanked = true;
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Bundler,
            "rails",
            vec![RawRelease::new("1.0.0"), RawRelease::new("1.1.0"), yanked],
        );
        let result = coordinator(source, ResolverSettings::new())
            .resolve(&rails("1.0.0", "~> 1.0"), &DependencyRules::new())
            .await
            .unwrap();
        assert_eq!(result.target_version().unwrap().as_str(), "1.1.0");
    }

    #[tokio::test]
    async fn test_decide_without_target_keeps_requirements() {
        let source = SnapshotSource::new().with_releases(Ecosystem::Bundler, "rails", raw(&["1.0.0"]));
        let dependency = rails("1.0.0", "~> 1.0");
        let decision = coordinator(source, ResolverSettings::new())
            .decide(&dependency, &DependencyRules::new())
            .await
            .unwrap();
        assert!(!decision.has_target());
        assert_eq!(decision.updated_requirements, dependency.requirements);
    }

    #[tokio::test]
    async fn test_latest_resolvable_without_unlock() {
        let source = SnapshotSource::new().with_releases(
            Ecosystem::Bundler,
            "rails",
            raw(&["1.2.0", "1.9.0", "2.0.0"]),
        );
        let latest = coordinator(source, ResolverSettings::new())
            .latest_resolvable_without_unlock(&rails("1.2.0", "~> 1.2"), &DependencyRules::new())
            .await
            .unwrap();
        assert_eq!(latest.unwrap().as_str(), "1.9.0");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ResolutionStage::CatalogBuilt.to_string(), "catalog_built");
        assert_eq!(ResolutionStage::Aborted.to_string(), "aborted");
    }
}
