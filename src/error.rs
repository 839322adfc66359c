//! Application error types using thiserror
//!
//! Error hierarchy:
//! - EngineError: failures that end resolution of one dependency
//! - SourceError: release source communication
//! - VersionError / ConstraintError: unparseable versions and range expressions
//! - ConfigError: configuration file and CLI values
//! - JobError: job file loading

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Resolution errors
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Job file related errors
    #[error(transparent)]
    Job(#[from] JobError),
}

/// Errors that abort resolution of a single dependency
#[derive(Error, Debug)]
pub enum EngineError {
    /// Ignore rules removed every candidate and the caller asked to be told
    #[error("all versions of '{dependency}' are ignored")]
    AllVersionsIgnored { dependency: String },

    /// A requirement cannot be rewritten unambiguously
    #[error("cannot rewrite requirement '{requirement}' of '{dependency}': {reason}")]
    UnresolvableRequirement {
        dependency: String,
        requirement: String,
        reason: String,
    },

    /// A release source failure that must not be hidden (authentication, validation)
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors related to release source communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Dependency not known to the source
    #[error("'{dependency}' not found in {source_name}")]
    NotFound {
        dependency: String,
        source_name: String,
    },

    /// Network or service failure
    #[error("failed to fetch '{dependency}' from {source_name}: {message}")]
    Unavailable {
        dependency: String,
        source_name: String,
        message: String,
    },

    /// The call took longer than the caller allowed
    #[error("timeout while fetching '{dependency}' from {source_name}")]
    Timeout {
        dependency: String,
        source_name: String,
    },

    /// The source answered with something unusable
    #[error("invalid response from {source_name} for '{dependency}': {message}")]
    InvalidResponse {
        dependency: String,
        source_name: String,
        message: String,
    },

    /// Credentials were rejected
    #[error("authentication failed for {source_name}: {message}")]
    Authentication {
        source_name: String,
        message: String,
    },

    /// The request itself was rejected as invalid
    #[error("{source_name} rejected the request for '{dependency}': {message}")]
    Validation {
        dependency: String,
        source_name: String,
        message: String,
    },
}

/// A version string that cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("malformed version '{input}'")]
    Malformed { input: String },
}

/// A range expression that cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("invalid version range '{input}': {message}")]
    Invalid { input: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '2w', '10d', '1m'")]
    InvalidDuration { value: String },

    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// An ignore rule that is not a valid range
    #[error("invalid ignore rule '{rule}' for '{dependency}': {message}")]
    InvalidIgnoreRule {
        dependency: String,
        rule: String,
        message: String,
    },
}

/// Errors related to job files
#[derive(Error, Debug)]
pub enum JobError {
    /// Failed to read the job file
    #[error("failed to read job file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

impl EngineError {
    /// Creates a new AllVersionsIgnored error
    pub fn all_versions_ignored(dependency: impl Into<String>) -> Self {
        EngineError::AllVersionsIgnored {
            dependency: dependency.into(),
        }
    }

    /// Creates a new UnresolvableRequirement error
    pub fn unresolvable(
        dependency: impl Into<String>,
        requirement: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::UnresolvableRequirement {
            dependency: dependency.into(),
            requirement: requirement.into(),
            reason: reason.into(),
        }
    }
}

impl SourceError {
    /// Creates a new NotFound error
    pub fn not_found(dependency: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceError::NotFound {
            dependency: dependency.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new Unavailable error
    pub fn unavailable(
        dependency: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::Unavailable {
            dependency: dependency.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(dependency: impl Into<String>, source_name: impl Into<String>) -> Self {
        SourceError::Timeout {
            dependency: dependency.into(),
            source_name: source_name.into(),
        }
    }

    /// Creates a new Authentication error
    pub fn authentication(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::Authentication {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Creates a new Validation error
    pub fn validation(
        dependency: impl Into<String>,
        source_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SourceError::Validation {
            dependency: dependency.into(),
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns true for failures that must propagate instead of degrading
    /// to an empty catalog
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SourceError::Authentication { .. } | SourceError::Validation { .. }
        )
    }
}

impl VersionError {
    /// Creates a new Malformed error
    pub fn malformed(input: impl Into<String>) -> Self {
        VersionError::Malformed {
            input: input.into(),
        }
    }
}

impl ConstraintError {
    /// Creates a new Invalid error
    pub fn invalid(input: impl Into<String>, message: impl Into<String>) -> Self {
        ConstraintError::Invalid {
            input: input.into(),
            message: message.into(),
        }
    }
}
