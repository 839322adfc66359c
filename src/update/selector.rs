//! Target selection over filtered candidates
//!
//! Candidates are expected in ascending order, as [`VersionCatalog`]
//! keeps them. Selection never returns a version that was not in the input.
//!
//! [`VersionCatalog`]: crate::domain::VersionCatalog

use crate::domain::{PackageRelease, Version};
use std::cmp::Ordering;

/// Highest candidate
pub fn latest(candidates: &[PackageRelease]) -> Option<&PackageRelease> {
    candidates.iter().max_by(|a, b| a.version.cmp(&b.version))
}

/// Lowest candidate strictly greater than `current`
pub fn lowest_security_fix<'a>(
    candidates: &'a [PackageRelease],
    current: &Version,
) -> Option<&'a PackageRelease> {
    candidates
        .iter()
        .filter(|r| r.version.cmp_precedence(current) == Ordering::Greater)
        .min_by(|a, b| a.version.cmp(&b.version))
}

/// Highest candidate accepted by `accept`
pub fn latest_matching<'a>(
    candidates: &'a [PackageRelease],
    accept: impl Fn(&Version) -> bool,
) -> Option<&'a PackageRelease> {
    candidates
        .iter()
        .filter(|r| accept(&r.version))
        .max_by(|a, b| a.version.cmp(&b.version))
}
