//! Requirement records produced by manifest parsers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key naming the property a symbolic requirement refers to
pub const PROPERTY_NAME_KEY: &str = "property_name";

/// Where a dependency is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A package registry
    Registry,
    /// A git repository, optionally pinned to a ref
    Git,
    /// A local path
    Path,
}

/// Source information attached to a requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Kind of source
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Repository or registry URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Pinned git ref (tag or commit)
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
    /// Tracked branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl SourceMetadata {
    /// Create git source metadata
    pub fn git(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Git,
            url: Some(url.into()),
            ref_name: None,
            branch: None,
        }
    }

    /// Set the pinned ref (builder pattern)
    pub fn with_ref(mut self, ref_name: impl Into<String>) -> Self {
        self.ref_name = Some(ref_name.into());
        self
    }

    /// Returns true for a git source pinned to a ref
    pub fn is_pinned_ref(&self) -> bool {
        self.kind == SourceKind::Git && self.ref_name.is_some()
    }
}

/// One declaration of a dependency in one file
///
/// Rewrites never mutate a requirement in place; they produce a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// File the requirement was declared in
    pub file: String,
    /// Requirement text (`"~> 1.2"`, `">= 1.0, < 2.0"`); `None` for unconstrained
    #[serde(default)]
    pub requirement: Option<String>,
    /// Dependency groups (`default`, `test`, `dev`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
    /// Source the dependency is fetched from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Ecosystem-specific extras, such as `property_name`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Requirement {
    /// Creates a new Requirement
    pub fn new(file: impl Into<String>, requirement: Option<&str>) -> Self {
        Self {
            file: file.into(),
            requirement: requirement.map(str::to_string),
            groups: Vec::new(),
            source: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the groups (builder pattern)
    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.groups = groups.iter().map(|g| g.to_string()).collect();
        self
    }

    /// Set the source (builder pattern)
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    /// Mark this requirement as a reference to a shared property
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.metadata.insert(PROPERTY_NAME_KEY.to_string(), name.into());
        self
    }

    /// Name of the property this requirement refers to, if any
    pub fn property_name(&self) -> Option<&str> {
        self.metadata.get(PROPERTY_NAME_KEY).map(String::as_str)
    }

    /// The pinned git ref, if the requirement has one
    pub fn pinned_ref(&self) -> Option<&str> {
        self.source
            .as_ref()
            .filter(|s| s.is_pinned_ref())
            .and_then(|s| s.ref_name.as_deref())
    }

    /// Copy of this requirement with different text
    pub fn with_text(&self, text: Option<String>) -> Self {
        Self {
            requirement: text,
            ..self.clone()
        }
    }

    /// Copy of this requirement pinned to a different ref
    pub fn with_ref(&self, ref_name: impl Into<String>) -> Self {
        let mut updated = self.clone();
        if let Some(source) = updated.source.as_mut() {
            source.ref_name = Some(ref_name.into());
        }
        updated
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.requirement, self.pinned_ref()) {
            (Some(text), _) => write!(f, "{} ({})", text, self.file),
            (None, Some(r)) => write!(f, "ref {} ({})", r, self.file),
            (None, None) => write!(f, "* ({})", self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_new() {
        let req = Requirement::new("Gemfile", Some("~> 1.2")).with_groups(&["default"]);
        assert_eq!(req.file, "Gemfile");
        assert_eq!(req.requirement.as_deref(), Some("~> 1.2"));
        assert_eq!(req.groups, vec!["default"]);
        assert!(req.property_name().is_none());
    }

    #[test]
    fn test_with_text_copies() {
        let req = Requirement::new("Gemfile", Some("~> 1.2")).with_groups(&["test"]);
        let updated = req.with_text(Some("~> 1.5".to_string()));
        assert_eq!(req.requirement.as_deref(), Some("~> 1.2"));
        assert_eq!(updated.requirement.as_deref(), Some("~> 1.5"));
        assert_eq!(updated.groups, req.groups);
    }

    #[test]
    fn test_property_name() {
        let req = Requirement::new("build.gradle", Some("1.2.61")).with_property("kotlin_version");
        assert_eq!(req.property_name(), Some("kotlin_version"));
    }

    #[test]
    fn test_pinned_ref() {
        let req = Requirement::new("Gemfile", None)
            .with_source(SourceMetadata::git("https://github.com/rails/rails").with_ref("v6.0.0"));
        assert_eq!(req.pinned_ref(), Some("v6.0.0"));

        let moved = req.with_ref("v6.1.0");
        assert_eq!(moved.pinned_ref(), Some("v6.1.0"));
        assert_eq!(req.pinned_ref(), Some("v6.0.0"));
    }

    #[test]
    fn test_registry_source_is_not_pinned() {
        let mut source = SourceMetadata::git("https://example.com/repo");
        source.kind = SourceKind::Registry;
        source.ref_name = Some("abc".to_string());
        let req = Requirement::new("Gemfile", Some("1.0")).with_source(source);
        assert!(req.pinned_ref().is_none());
    }

    #[test]
    fn test_display() {
        let req = Requirement::new("Gemfile", Some("~> 1.2"));
        assert_eq!(format!("{}", req), "~> 1.2 (Gemfile)");
        let unconstrained = Requirement::new("Gemfile", None);
        assert_eq!(format!("{}", unconstrained), "* (Gemfile)");
    }

    #[test]
    fn test_serde_source_ref_field() {
        let json = r#"{"file":"Gemfile","requirement":null,"source":{"type":"git","url":"u","ref":"v1.0.0"}}"#;
        let req: Requirement = serde_json::from_str(json).unwrap();
        assert_eq!(req.pinned_ref(), Some("v1.0.0"));
    }
}
