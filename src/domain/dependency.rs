//! Dependency and dependency file structures

use super::{Ecosystem, Requirement, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency and every requirement that declares it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Ecosystem the dependency belongs to
    pub ecosystem: Ecosystem,
    /// Currently resolved version, if known (from a lockfile or pinned requirement)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Requirements across all files
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(name: impl Into<String>, ecosystem: Ecosystem) -> Self {
        Self {
            name: name.into(),
            ecosystem,
            version: None,
            requirements: Vec::new(),
        }
    }

    /// Sets the current version (builder pattern)
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a requirement (builder pattern)
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Parsed current version; `None` when absent or unparseable
    pub fn current_version(&self) -> Option<Version> {
        self.version.as_deref().and_then(|v| Version::parse(v).ok())
    }

    /// Requirement texts that are present
    pub fn requirement_texts(&self) -> impl Iterator<Item = &str> {
        self.requirements
            .iter()
            .filter_map(|r| r.requirement.as_deref())
    }

    /// Current version for display
    pub fn version_display(&self) -> &str {
        self.version.as_deref().unwrap_or("-")
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} [{}]",
            self.name,
            self.version_display(),
            self.ecosystem
        )
    }
}

/// Contents of a file that may hold property declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFile {
    /// Path relative to the project root (`app/build.gradle`)
    pub name: String,
    /// Full file contents
    pub content: String,
}

impl DependencyFile {
    /// Creates a new DependencyFile
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Directory part of the file name, `""` for files at the root
    pub fn directory(&self) -> &str {
        match self.name.rfind('/') {
            Some(idx) => &self.name[..idx],
            None => "",
        }
    }
}
