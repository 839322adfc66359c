//! Release cooldown policy
//!
//! A freshly published release is held back for a number of days that
//! depends on how large a jump it is from the current version.

use crate::domain::Version;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Size of a version jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Major,
    Minor,
    Patch,
}

impl BumpType {
    /// Classify the jump from `current` to `candidate`
    ///
    /// First segment differs: major. Otherwise second differs: minor.
    /// Everything else, including pre-release-only differences: patch.
    pub fn between(current: &Version, candidate: &Version) -> Self {
        if current.segment(0) != candidate.segment(0) {
            BumpType::Major
        } else if current.segment(1) != candidate.segment(1) {
            BumpType::Minor
        } else {
            BumpType::Patch
        }
    }

    /// Plain label
    pub fn label(&self) -> &'static str {
        match self {
            BumpType::Major => "major",
            BumpType::Minor => "minor",
            BumpType::Patch => "patch",
        }
    }
}

/// Cooldown thresholds in days
///
/// Type-specific values fall back to `default_days` when unset; an explicit
/// `0` turns cooldown off for that bump type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CooldownOptions {
    /// Days applied when no type-specific value is set
    pub default_days: u32,
    /// Days for major bumps
    #[serde(rename = "semver-major-days")]
    pub major_days: Option<u32>,
    /// Days for minor bumps
    #[serde(rename = "semver-minor-days")]
    pub minor_days: Option<u32>,
    /// Days for patch bumps
    #[serde(rename = "semver-patch-days")]
    pub patch_days: Option<u32>,
    /// Dependency name patterns cooldown applies to (empty means all)
    pub include: Vec<String>,
    /// Dependency name patterns cooldown never applies to
    pub exclude: Vec<String>,
}

impl CooldownOptions {
    /// Create options with only a default
    pub fn new(default_days: u32) -> Self {
        Self {
            default_days,
            ..Self::default()
        }
    }

    /// Set the major threshold (builder pattern)
    pub fn with_major_days(mut self, days: u32) -> Self {
        self.major_days = Some(days);
        self
    }

    /// Set the minor threshold (builder pattern)
    pub fn with_minor_days(mut self, days: u32) -> Self {
        self.minor_days = Some(days);
        self
    }

    /// Set the patch threshold (builder pattern)
    pub fn with_patch_days(mut self, days: u32) -> Self {
        self.patch_days = Some(days);
        self
    }

    /// Set include patterns (builder pattern)
    pub fn with_include(mut self, patterns: Vec<String>) -> Self {
        self.include = patterns;
        self
    }

    /// Set exclude patterns (builder pattern)
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Threshold for a bump type
    pub fn days_for(&self, bump: BumpType) -> u32 {
        let specific = match bump {
            BumpType::Major => self.major_days,
            BumpType::Minor => self.minor_days,
            BumpType::Patch => self.patch_days,
        };
        specific.unwrap_or(self.default_days)
    }

    /// Returns true if no bump type has a positive threshold
    pub fn is_disabled(&self) -> bool {
        [BumpType::Major, BumpType::Minor, BumpType::Patch]
            .iter()
            .all(|b| self.days_for(*b) == 0)
    }

    /// Returns true if cooldown should be evaluated for `dependency`
    pub fn applies_to(&self, dependency: &str) -> bool {
        if self.exclude.iter().any(|p| pattern_matches(p, dependency)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| pattern_matches(p, dependency))
    }
}

static WILDCARD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\\*").unwrap());

/// Match a dependency name against a pattern where `*` matches any run of characters
fn pattern_matches(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == name;
    }
    let escaped = regex::escape(pattern);
    let source = format!("^{}$", WILDCARD_RE.replace_all(&escaped, ".*"));
    Regex::new(&source)
        .map(|re| re.is_match(name))
        .unwrap_or(false)
}

/// Decides whether a release is still inside its cooldown window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownPolicy {
    options: CooldownOptions,
    now: DateTime<Utc>,
}

impl CooldownPolicy {
    /// Create a policy evaluated at `now`
    pub fn new(options: CooldownOptions, now: DateTime<Utc>) -> Self {
        Self { options, now }
    }

    /// The options this policy was built from
    pub fn options(&self) -> &CooldownOptions {
        &self.options
    }

    /// Returns true if `candidate` must still be held back
    ///
    /// A missing release date never holds a release back.
    pub fn in_cooldown(
        &self,
        current: &Version,
        candidate: &Version,
        released_at: Option<DateTime<Utc>>,
    ) -> bool {
        let Some(released_at) = released_at else {
            return false;
        };
        let days = self.options.days_for(BumpType::between(current, candidate));
        if days == 0 {
            return false;
        }
        self.now - released_at < Duration::days(i64::from(days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_bump_type_between() {
        assert_eq!(BumpType::between(&v("1.2.3"), &v("2.0.0")), BumpType::Major);
        assert_eq!(BumpType::between(&v("1.2.3"), &v("1.3.0")), BumpType::Minor);
        assert_eq!(BumpType::between(&v("1.2.3"), &v("1.2.4")), BumpType::Patch);
        assert_eq!(BumpType::between(&v("1"), &v("1.1")), BumpType::Minor);
    }

    #[test]
    fn test_prerelease_only_difference_is_patch() {
        assert_eq!(
            BumpType::between(&v("1.2.3-rc1"), &v("1.2.3")),
            BumpType::Patch
        );
    }

    #[test]
    fn test_days_for_falls_back_to_default() {
        let options = CooldownOptions::new(5).with_major_days(30);
        assert_eq!(options.days_for(BumpType::Major), 30);
        assert_eq!(options.days_for(BumpType::Minor), 5);
        assert_eq!(options.days_for(BumpType::Patch), 5);
    }

    #[test]
    fn test_explicit_zero_disables_type() {
        let options = CooldownOptions::new(5).with_patch_days(0);
        assert_eq!(options.days_for(BumpType::Patch), 0);
        assert!(!options.is_disabled());
        assert!(CooldownOptions::new(0).is_disabled());
    }

    #[test]
    fn test_boundary_exactly_n_days_is_released() {
        let policy = CooldownPolicy::new(CooldownOptions::new(7), now());
        let released = now() - Duration::days(7);
        assert!(!policy.in_cooldown(&v("1.0.0"), &v("1.0.1"), Some(released)));
    }

    #[test]
    fn test_boundary_one_second_short_is_held() {
        let policy = CooldownPolicy::new(CooldownOptions::new(7), now());
        let released = now() - Duration::days(7) + Duration::seconds(1);
        assert!(policy.in_cooldown(&v("1.0.0"), &v("1.0.1"), Some(released)));
    }

    #[test]
    fn test_missing_date_fails_open() {
        let policy = CooldownPolicy::new(CooldownOptions::new(30), now());
        assert!(!policy.in_cooldown(&v("1.0.0"), &v("2.0.0"), None));
    }

    #[test]
    fn test_zero_days_never_holds() {
        let policy = CooldownPolicy::new(CooldownOptions::new(0), now());
        assert!(!policy.in_cooldown(&v("1.0.0"), &v("2.0.0"), Some(now())));
    }

    #[test]
    fn test_type_specific_thresholds() {
        let options = CooldownOptions::new(1).with_major_days(30).with_minor_days(7);
        let policy = CooldownPolicy::new(options, now());
        let ten_days_ago = Some(now() - Duration::days(10));
        assert!(policy.in_cooldown(&v("1.0.0"), &v("2.0.0"), ten_days_ago));
        assert!(!policy.in_cooldown(&v("1.0.0"), &v("1.1.0"), ten_days_ago));
    }

    #[test]
    fn test_applies_to_patterns() {
        let options = CooldownOptions::new(3)
            .with_include(vec!["rails*".to_string()])
            .with_exclude(vec!["rails-html-sanitizer".to_string()]);
        assert!(options.applies_to("rails"));
        assert!(!options.applies_to("railties"));
        assert!(options.applies_to("rails-dom-testing"));
        assert!(!options.applies_to("rails-html-sanitizer"));
        assert!(!options.applies_to("rack"));
        assert!(CooldownOptions::new(3).applies_to("anything"));
    }

    #[test]
    fn test_deserialize_kebab_case() {
        let options: CooldownOptions = toml::from_str(
            r#"
default-days = 3
semver-major-days = 14
semver-patch-days = 0
exclude = ["internal-*"]
"#,
        )
        .unwrap();
        assert_eq!(options.default_days, 3);
        assert_eq!(options.major_days, Some(14));
        assert_eq!(options.minor_days, None);
        assert_eq!(options.patch_days, Some(0));
        assert!(!options.applies_to("internal-tools"));
    }
}
