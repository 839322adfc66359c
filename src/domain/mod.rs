//! Core domain models for depbump
//!
//! This module contains the fundamental types used throughout the engine:
//! - Ecosystems and versions
//! - Release candidates and the version catalog
//! - Requirements, dependencies and property-declaring files
//! - Ignore rules and security advisories
//! - Update decisions, per-dependency results and batch summaries

mod decision;
mod dependency;
mod ecosystem;
mod release;
mod requirement;
mod rules;
mod summary;
mod update_result;
mod version;

pub use decision::UpdateDecision;
pub use dependency::{Dependency, DependencyFile};
pub use ecosystem::Ecosystem;
pub use release::{PackageRelease, RawRelease, VersionCatalog};
pub use requirement::{Requirement, SourceKind, SourceMetadata, PROPERTY_NAME_KEY};
pub use rules::{IgnoreRule, SecurityAdvisory};
pub use summary::BatchSummary;
pub use update_result::{SkipReason, UpdateResult};
pub use version::{Identifier, Version};

pub(crate) use version::join_segments;
