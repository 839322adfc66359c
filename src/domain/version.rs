//! Ecosystem-neutral version values
//!
//! Handles version strings such as:
//! - Plain releases: `1.2.3`, `v1.2`, `2024.1`
//! - Pre-releases: `1.0.0-rc1`, `7.0.0.beta1`, `2.0b1`
//! - Numeric post-release suffixes: `1.1.4-3`
//! - Build metadata: `1.2.3+build.5`

use crate::error::VersionError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[vV]?(\d+(?:\.\d+)*)(?:[-.]?([0-9A-Za-z](?:[0-9A-Za-z.\-]*[0-9A-Za-z])?))?(?:\+([0-9A-Za-z.\-]+))?$",
    )
    .unwrap()
});

// Splits a suffix into alternating alphabetic and numeric runs: "rc.10" -> ["rc", "10"]
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+|\d+").unwrap());

/// Alphabetic qualifiers that mark a stable release rather than a pre-release
const STABLE_QUALIFIERS: [&str; 8] = [
    "final", "ga", "release", "sp", "post", "jre", "android", "r",
];

/// One identifier of a version suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Numeric identifier, compared by value
    Numeric(u64),
    /// Alphabetic identifier, compared case-insensitively
    Alpha(String),
}

/// Position of a suffix relative to its plain release
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SuffixKind {
    PreRelease,
    Plain,
    PostRelease,
}

/// An immutable, totally ordered version
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    release: Vec<u64>,
    suffix: Vec<Identifier>,
    build: Option<String>,
}

impl Version {
    /// Parse a version string, rejecting anything without a numeric release
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::malformed(input))?;

        let release = caps[1]
            .split('.')
            .map(|s| s.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::malformed(input))?;

        let suffix = match caps.get(2) {
            Some(m) => parse_identifiers(m.as_str()).ok_or_else(|| VersionError::malformed(input))?,
            None => Vec::new(),
        };

        Ok(Self {
            raw: trimmed.to_string(),
            release,
            suffix,
            build: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// Build a plain release version from numeric segments
    pub fn from_segments(segments: &[u64]) -> Self {
        let raw = join_segments(segments);
        Self {
            raw,
            release: segments.to_vec(),
            suffix: Vec::new(),
            build: None,
        }
    }

    /// The version exactly as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric release segments (`[1, 2, 3]` for `1.2.3-rc1`)
    pub fn segments(&self) -> &[u64] {
        &self.release
    }

    /// Release segment at `index`, treating missing segments as zero
    pub fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    pub fn major(&self) -> u64 {
        self.segment(0)
    }

    pub fn minor(&self) -> u64 {
        self.segment(1)
    }

    pub fn patch(&self) -> u64 {
        self.segment(2)
    }

    /// Number of release segments written in the original string
    pub fn precision(&self) -> usize {
        self.release.len()
    }

    /// Returns true if the suffix marks a pre-release (alpha, beta, rc, snapshot, ...)
    pub fn is_prerelease(&self) -> bool {
        self.suffix.iter().any(|id| match id {
            Identifier::Alpha(s) => !STABLE_QUALIFIERS.contains(&s.as_str()),
            Identifier::Numeric(_) => false,
        })
    }

    /// Returns true if the version carries anything beyond its release segments
    pub fn has_suffix(&self) -> bool {
        !self.suffix.is_empty() || self.build.is_some()
    }

    /// Compare by precedence only: trailing zeros, the written precision
    /// and build metadata do not matter (`1.0 == 1.0.0+abc`)
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            match self.segment(i).cmp(&other.segment(i)) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        match self.suffix_kind().cmp(&other.suffix_kind()) {
            Ordering::Equal => self.suffix.cmp(&other.suffix),
            ord => ord,
        }
    }

    /// Returns true if both versions have the same precedence
    pub fn same_precedence(&self, other: &Self) -> bool {
        self.cmp_precedence(other) == Ordering::Equal
    }

    fn suffix_kind(&self) -> SuffixKind {
        if self.suffix.is_empty() {
            SuffixKind::Plain
        } else if self.is_prerelease() {
            SuffixKind::PreRelease
        } else {
            SuffixKind::PostRelease
        }
    }
}

fn parse_identifiers(suffix: &str) -> Option<Vec<Identifier>> {
    IDENTIFIER_RE
        .find_iter(suffix)
        .map(|m| {
            let text = m.as_str();
            if text.as_bytes()[0].is_ascii_digit() {
                text.parse().ok().map(Identifier::Numeric)
            } else {
                Some(Identifier::Alpha(text.to_ascii_lowercase()))
            }
        })
        .collect()
}

/// Join numeric segments with dots
pub(crate) fn join_segments(segments: &[u64]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_precedence(other)
            .then_with(|| self.release.len().cmp(&other.release.len()))
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.release.hash(state);
        self.suffix.hash(state);
        self.build.hash(state);
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}
