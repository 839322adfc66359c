//! Cargo requirements, evaluated with the `semver` crate

use super::{RequirementGrammar, Separator, Syntax};
use crate::domain::{Ecosystem, Version};

static SYNTAX: Syntax = Syntax {
    operators: &[">=", "<=", "=", "^", "~", ">", "<"],
    separator: Separator::Comma,
    alternatives: None,
    bare_versions: true,
    wildcards: true,
    dual_bound: false,
};

/// Grammar for Cargo.toml requirements
pub struct CargoGrammar;

/// Convert to a semver version, padding short versions to three segments
fn to_semver(version: &Version) -> Option<semver::Version> {
    semver::Version::parse(version.as_str().trim_start_matches('v'))
        .ok()
        .or_else(|| {
            (!version.has_suffix()).then(|| {
                semver::Version::new(version.major(), version.minor(), version.patch())
            })
        })
}

impl RequirementGrammar for CargoGrammar {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Cargo
    }

    fn syntax(&self) -> &'static Syntax {
        &SYNTAX
    }

    fn satisfied_by(&self, text: &str, version: &Version) -> Option<bool> {
        let req = semver::VersionReq::parse(text).ok()?;
        Some(req.matches(&to_semver(version)?))
    }
}
