//! Requirement grammars and rewriting
//!
//! Every ecosystem writes requirements differently. A [`RequirementGrammar`]
//! describes one ecosystem's syntax; the shared rewrite forms in [`forms`]
//! use that description to move a requirement to a new version:
//! - Exact: `1.2.3` -> `1.5.0`
//! - Operator-prefixed: `~> 1.2` -> `~> 1.5`, `< 2.0` raised only when needed
//! - Dual-bound: `1.0.0 <= v < 2.0.0` -> `1.0.0 <= v < 3.0.0`
//! - Pinned git refs and shared property declarations (see [`RequirementRewriter`])

mod bundler;
mod cargo;
mod elm;
pub mod forms;
mod jvm;
mod npm;
mod pip;
pub mod property;
mod rewriter;

pub use bundler::BundlerGrammar;
pub use cargo::CargoGrammar;
pub use elm::ElmGrammar;
pub use jvm::JvmGrammar;
pub use npm::NpmGrammar;
pub use pip::PipGrammar;
pub use property::{PropertyDeclaration, PropertyTable};
pub use rewriter::{RequirementRewriter, RewriteOutput};

use crate::constraint::{wildcard_prefix, VersionReq};
use crate::domain::{Ecosystem, Version};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A requirement text did not have the shape a rewrite form expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatch;

/// How AND-ed clauses are written next to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `>= 1.0, < 2.0`
    Comma,
    /// `>=1.0.0 <2.0.0`
    Whitespace,
}

/// Static description of an ecosystem's requirement syntax
#[derive(Debug)]
pub struct Syntax {
    /// Operators allowed in front of a version
    pub operators: &'static [&'static str],
    /// Separator between AND-ed clauses
    pub separator: Separator,
    /// Separator between OR-ed alternatives
    pub alternatives: Option<&'static str>,
    /// Whether a version without operator is a valid requirement
    pub bare_versions: bool,
    /// Whether `1.x`, `1.2.*` or `1.+` are valid
    pub wildcards: bool,
    /// Whether `1.0.0 <= v < 2.0.0` is valid
    pub dual_bound: bool,
}

/// When a requirement is moved to the target version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStrategy {
    /// Always move the requirement to the target
    #[default]
    BumpVersions,
    /// Leave requirements that already admit the target untouched
    BumpVersionsIfNecessary,
}

// Version-looking tokens inside a requirement
static VERSION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v?\d[0-9A-Za-z.+\-]*").unwrap());

/// Requirement syntax of one ecosystem
pub trait RequirementGrammar: Send + Sync {
    /// Returns the ecosystem this grammar handles
    fn ecosystem(&self) -> Ecosystem;

    /// Syntax description used by the shared rewrite forms
    fn syntax(&self) -> &'static Syntax;

    /// Whether `version` satisfies `text`; `None` when the text cannot be evaluated
    fn satisfied_by(&self, text: &str, version: &Version) -> Option<bool> {
        VersionReq::parse(text).ok().map(|req| req.matches(version))
    }

    /// Whether the requirement explicitly asks for a pre-release (`>= 2.0.0.beta1`)
    fn requires_prerelease(&self, text: &str) -> bool {
        VERSION_TOKEN_RE.find_iter(text).any(|m| {
            wildcard_prefix(m.as_str()).is_none()
                && Version::parse(m.as_str())
                    .map(|v| v.is_prerelease())
                    .unwrap_or(false)
        })
    }

    /// Rewrite `text` to denote `new`, trying exact, operator and dual-bound forms in order
    fn rewrite(&self, text: &str, new: &Version) -> Result<String, NoMatch> {
        forms::rewrite(self.syntax(), text, new)
    }
}

/// Get the grammar for an ecosystem
pub fn get_grammar(ecosystem: Ecosystem) -> Box<dyn RequirementGrammar> {
    match ecosystem {
        Ecosystem::Bundler => Box::new(BundlerGrammar),
        Ecosystem::Cargo => Box::new(CargoGrammar),
        Ecosystem::Npm => Box::new(NpmGrammar),
        Ecosystem::Pip => Box::new(PipGrammar),
        Ecosystem::Elm => Box::new(ElmGrammar),
        Ecosystem::Gradle => Box::new(JvmGrammar::new(Ecosystem::Gradle)),
        Ecosystem::Maven => Box::new(JvmGrammar::new(Ecosystem::Maven)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_get_grammar_covers_all_ecosystems() {
        for ecosystem in Ecosystem::all() {
            assert_eq!(get_grammar(*ecosystem).ecosystem(), *ecosystem);
        }
    }

    #[test]
    fn test_requires_prerelease() {
        let grammar = get_grammar(Ecosystem::Bundler);
        assert!(grammar.requires_prerelease(">= 2.0.0.beta1"));
        assert!(grammar.requires_prerelease("~> 1.0.0-rc1"));
        assert!(!grammar.requires_prerelease("~> 1.2"));
        assert!(!grammar.requires_prerelease("1.0.0 <= v < 2.0.0"));
        assert!(!get_grammar(Ecosystem::Npm).requires_prerelease("1.x"));
    }

    #[test]
    fn test_precision_property_for_every_grammar_with_bare_versions() {
        for ecosystem in [Ecosystem::Bundler, Ecosystem::Cargo, Ecosystem::Npm, Ecosystem::Elm] {
            let grammar = get_grammar(ecosystem);
            assert_eq!(grammar.rewrite("0.1", &v("1.5.3")).unwrap(), "1.5");
        }
    }

    #[test]
    fn test_rewrite_is_idempotent_for_every_grammar() {
        let samples = [
            (Ecosystem::Bundler, "~> 1.2, >= 1.2.3", "1.6.1"),
            (Ecosystem::Cargo, "^0.2.3", "0.4.0"),
            (Ecosystem::Npm, "^1.0.0 || ^2.0.0", "3.1.0"),
            (Ecosystem::Pip, ">=1.0,<2.0", "2.3.0"),
            (Ecosystem::Elm, "1.0.0 <= v < 2.0.0", "2.0.0"),
            (Ecosystem::Gradle, "1.+", "2.4.0"),
            (Ecosystem::Maven, "1.2.3", "1.4.0"),
        ];
        for (ecosystem, text, target) in samples {
            let grammar = get_grammar(ecosystem);
            let once = grammar.rewrite(text, &v(target)).unwrap();
            let twice = grammar.rewrite(&once, &v(target)).unwrap();
            assert_eq!(once, twice, "{} not idempotent for {}", ecosystem, text);
        }
    }

    #[test]
    fn test_update_strategy_serde() {
        let strategy: UpdateStrategy =
            serde_json::from_str("\"bump-versions-if-necessary\"").unwrap();
        assert_eq!(strategy, UpdateStrategy::BumpVersionsIfNecessary);
        assert_eq!(UpdateStrategy::default(), UpdateStrategy::BumpVersions);
    }
}
