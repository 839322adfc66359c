//! depbump - version resolution and requirement rewriting engine
//!
//! Given a dependency, the releases its registry knows about, ignore rules,
//! security advisories and a cooldown policy, this library decides which
//! version the dependency should move to and rewrites every requirement that
//! pins it:
//! - Bundler, Cargo, npm, pip, Elm, Gradle and Maven requirement grammars
//! - Shared property declarations (`ext.kotlin_version = '1.2.61'`)
//! - Latest-version and lowest-security-fix selection
//! - Batch runs over a JSON job file

pub mod cli;
pub mod config;
pub mod constraint;
pub mod domain;
pub mod error;
pub mod grammar;
pub mod job;
pub mod logging;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod source;
pub mod update;
