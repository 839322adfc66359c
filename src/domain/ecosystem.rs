//! Package ecosystem definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// Ruby gems (Gemfile, gemspec)
    Bundler,
    /// Rust crates (Cargo.toml)
    Cargo,
    /// JavaScript packages (package.json)
    Npm,
    /// Python packages (requirements.txt, setup.py)
    Pip,
    /// Elm packages (elm.json)
    Elm,
    /// JVM packages declared in Gradle build scripts
    Gradle,
    /// JVM packages declared in pom.xml
    Maven,
}

impl Ecosystem {
    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Bundler => "Bundler",
            Ecosystem::Cargo => "Cargo",
            Ecosystem::Npm => "npm",
            Ecosystem::Pip => "pip",
            Ecosystem::Elm => "Elm",
            Ecosystem::Gradle => "Gradle",
            Ecosystem::Maven => "Maven",
        }
    }

    /// Returns the name of the registry releases usually come from
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Bundler => "RubyGems",
            Ecosystem::Cargo => "crates.io",
            Ecosystem::Npm => "npm",
            Ecosystem::Pip => "PyPI",
            Ecosystem::Elm => "package.elm-lang.org",
            Ecosystem::Gradle | Ecosystem::Maven => "Maven Central",
        }
    }

    /// Returns true if requirements in this ecosystem may point at a shared
    /// property declaration instead of carrying the version inline
    pub fn supports_properties(&self) -> bool {
        matches!(self, Ecosystem::Gradle | Ecosystem::Maven)
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[
            Ecosystem::Bundler,
            Ecosystem::Cargo,
            Ecosystem::Npm,
            Ecosystem::Pip,
            Ecosystem::Elm,
            Ecosystem::Gradle,
            Ecosystem::Maven,
        ]
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ecosystem::all()
            .iter()
            .find(|e| e.display_name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown ecosystem: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("bundler".parse::<Ecosystem>(), Ok(Ecosystem::Bundler));
        assert_eq!("NPM".parse::<Ecosystem>(), Ok(Ecosystem::Npm));
        assert_eq!("gradle".parse::<Ecosystem>(), Ok(Ecosystem::Gradle));
        assert!("cobol".parse::<Ecosystem>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Ecosystem::Bundler.display_name(), "Bundler");
        assert_eq!(Ecosystem::Npm.display_name(), "npm");
        assert_eq!(format!("{}", Ecosystem::Gradle), "Gradle");
    }

    #[test]
    fn test_registry_names() {
        assert_eq!(Ecosystem::Cargo.registry_name(), "crates.io");
        assert_eq!(Ecosystem::Pip.registry_name(), "PyPI");
        assert_eq!(
            Ecosystem::Gradle.registry_name(),
            Ecosystem::Maven.registry_name()
        );
    }

    #[test]
    fn test_supports_properties() {
        assert!(Ecosystem::Gradle.supports_properties());
        assert!(Ecosystem::Maven.supports_properties());
        assert!(!Ecosystem::Npm.supports_properties());
    }

    #[test]
    fn test_all_ecosystems() {
        let all = Ecosystem::all();
        assert_eq!(all.len(), 7);
        assert!(all.contains(&Ecosystem::Elm));
    }

    #[test]
    fn test_serde_roundtrip_names() {
        let json = serde_json::to_string(&Ecosystem::Bundler).unwrap();
        assert_eq!(json, "\"bundler\"");

        let parsed: Ecosystem = serde_json::from_str("\"maven\"").unwrap();
        assert_eq!(parsed, Ecosystem::Maven);
    }
}
