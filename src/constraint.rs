//! Version range expressions
//!
//! Parses and evaluates the range syntaxes that ignore rules, security
//! advisories and requirement satisfaction checks are written in:
//! - Comparisons: `= 1.2`, `!= 1.2.3`, `>= 1.0`, `< 2.0`
//! - Pessimistic: `~> 1.2` (Ruby), `~= 1.4.2` (Python)
//! - Caret / tilde: `^1.2.3`, `~1.2.3`
//! - Wildcards: `1.x`, `1.2.*`, `1.+`, `*`
//! - Compound: `>= 1.0, < 2.0` or `>=1.0.0 <2.0.0`
//! - Alternatives: `^1.0 || ^2.0`
//! - Dual-bound: `1.0.0 <= v < 2.0.0` (Elm), hyphen `1.0.0 - 2.0.0` (npm)

use crate::domain::Version;
use crate::error::ConstraintError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// Single clause: optional operator followed by a version or wildcard
static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(~>|~=|===|==|!=|>=|<=|\^|~|>|<|=)?\s*(v?\d[0-9A-Za-z.*+\-]*|\*|[xX])").unwrap()
});

// Elm style: 1.0.0 <= v < 2.0.0
static DUAL_BOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s*(<=|<)\s*v\s*(<=|<)\s*(\S+)$").unwrap());

// npm hyphen range: 1.0.0 - 2.0.0
static HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d\S*)\s+-\s+(\d\S*)$").unwrap());

/// Comparison operator of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// `~>` and `~=`: allow the last written segment to grow
    Pessimistic,
    /// `^`: allow changes that keep the left-most non-zero segment
    Caret,
    /// `~`: allow patch-level changes
    Tilde,
}

impl Op {
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "" | "=" | "==" | "===" => Some(Op::Eq),
            "!=" => Some(Op::NotEq),
            ">" => Some(Op::Gt),
            ">=" => Some(Op::Gte),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Lte),
            "~>" | "~=" => Some(Op::Pessimistic),
            "^" => Some(Op::Caret),
            "~" => Some(Op::Tilde),
            _ => None,
        }
    }
}

/// One `operator version` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    op: Op,
    version: Version,
    /// Number of leading segments fixed by a wildcard (`1.2.*` -> 2)
    wildcard: Option<usize>,
}

impl Clause {
    /// Parse a single clause such as `>= 1.2` or `1.x`
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let trimmed = text.trim();
        let caps = CLAUSE_RE
            .captures(trimmed)
            .filter(|c| c.get(0).map(|m| m.as_str().len()) == Some(trimmed.len()))
            .ok_or_else(|| ConstraintError::invalid(text, "not a version clause"))?;

        let op_token = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let op = Op::from_token(op_token)
            .ok_or_else(|| ConstraintError::invalid(text, "unknown operator"))?;
        Self::from_parts(op, &caps[2], text)
    }

    fn from_parts(op: Op, version_text: &str, original: &str) -> Result<Self, ConstraintError> {
        if let Some(prefix) = wildcard_prefix(version_text) {
            let segments = prefix
                .iter()
                .map(|s| s.parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ConstraintError::invalid(original, "invalid wildcard"))?;
            return Ok(Self {
                op,
                version: Version::from_segments(&segments),
                wildcard: Some(segments.len()),
            });
        }

        let version = Version::parse(version_text)
            .map_err(|e| ConstraintError::invalid(original, e.to_string()))?;
        Ok(Self {
            op,
            version,
            wildcard: None,
        })
    }

    /// Operator of this clause
    pub fn op(&self) -> Op {
        self.op
    }

    /// Version written in this clause
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Returns true if the clause accepts `candidate`
    pub fn matches(&self, candidate: &Version) -> bool {
        if let Some(fixed) = self.wildcard {
            let prefix_matches = (0..fixed).all(|i| candidate.segment(i) == self.version.segment(i));
            match self.op {
                Op::Eq => return prefix_matches,
                Op::NotEq => return !prefix_matches,
                _ => {}
            }
        }

        let ord = candidate.cmp_precedence(&self.version);
        match self.op {
            Op::Eq => ord == Ordering::Equal,
            Op::NotEq => ord != Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Gte => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Lte => ord != Ordering::Greater,
            Op::Pessimistic => {
                let precision = self.version.precision();
                let index = if precision >= 2 { precision - 2 } else { 0 };
                ord != Ordering::Less && below_bump(candidate, &self.version, index)
            }
            Op::Caret => {
                let precision = self.version.precision().max(1);
                let index = (0..precision)
                    .find(|&i| self.version.segment(i) != 0)
                    .unwrap_or(precision - 1);
                ord != Ordering::Less && below_bump(candidate, &self.version, index)
            }
            Op::Tilde => {
                let index = if self.version.precision() >= 2 { 1 } else { 0 };
                ord != Ordering::Less && below_bump(candidate, &self.version, index)
            }
        }
    }
}

/// Segments before a trailing wildcard, or `None` if the text has no wildcard
pub(crate) fn wildcard_prefix(text: &str) -> Option<Vec<&str>> {
    let text = text.strip_prefix('v').unwrap_or(text);
    if matches!(text, "*" | "x" | "X" | "+") {
        return Some(Vec::new());
    }
    let parts: Vec<&str> = text.split('.').collect();
    let first_wild = parts
        .iter()
        .position(|p| matches!(*p, "*" | "x" | "X" | "+"))?;
    Some(parts[..first_wild].to_vec())
}

/// `candidate` sorts below `base` with segment `index` incremented, where
/// pre-releases of that upper bound count as outside
fn below_bump(candidate: &Version, base: &Version, index: usize) -> bool {
    let upper = bump(base, index);
    let len = candidate.precision().max(upper.precision());
    for i in 0..len {
        match candidate.segment(i).cmp(&upper.segment(i)) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => continue,
        }
    }
    false
}

/// Increment segment `index` and drop everything after it
pub(crate) fn bump(base: &Version, index: usize) -> Version {
    let mut segments: Vec<u64> = (0..=index).map(|i| base.segment(i)).collect();
    segments[index] = segments[index].saturating_add(1);
    Version::from_segments(&segments)
}

/// A parsed range expression: alternatives of conjunctive clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReq {
    raw: String,
    alternatives: Vec<Vec<Clause>>,
}

impl VersionReq {
    /// Parse a range expression
    pub fn parse(text: &str) -> Result<Self, ConstraintError> {
        let trimmed = text.trim();
        if matches!(trimmed, "" | "*" | "x" | "X") {
            return Ok(Self::any_with_raw(trimmed));
        }

        let alternatives = trimmed
            .split("||")
            .map(|alt| parse_conjunction(alt.trim(), text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: trimmed.to_string(),
            alternatives,
        })
    }

    /// A requirement satisfied by every version
    pub fn any() -> Self {
        Self::any_with_raw("*")
    }

    fn any_with_raw(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            alternatives: vec![Vec::new()],
        }
    }

    /// Returns true if some alternative accepts every clause for `version`
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|alt| alt.iter().all(|clause| clause.matches(version)))
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_conjunction(text: &str, original: &str) -> Result<Vec<Clause>, ConstraintError> {
    if matches!(text, "" | "*" | "x" | "X") {
        return Ok(Vec::new());
    }

    if let Some(caps) = DUAL_BOUND_RE.captures(text) {
        let lower_op = if &caps[2] == "<=" { Op::Gte } else { Op::Gt };
        let upper_op = if &caps[3] == "<=" { Op::Lte } else { Op::Lt };
        return Ok(vec![
            Clause::from_parts(lower_op, &caps[1], original)?,
            Clause::from_parts(upper_op, &caps[4], original)?,
        ]);
    }

    if let Some(caps) = HYPHEN_RE.captures(text) {
        return Ok(vec![
            Clause::from_parts(Op::Gte, &caps[1], original)?,
            Clause::from_parts(Op::Lte, &caps[2], original)?,
        ]);
    }

    let mut clauses = Vec::new();
    for part in text.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(ConstraintError::invalid(original, "empty clause"));
        }
        // Whitespace-separated clauses (`>=1.0 <2.0`); operators may be followed by a space
        let mut consumed = 0;
        for caps in CLAUSE_RE.captures_iter(part) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            if !part[consumed..whole.start].trim().is_empty() {
                return Err(ConstraintError::invalid(original, "unexpected text"));
            }
            consumed = whole.end;
            let op_token = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let op = Op::from_token(op_token)
                .ok_or_else(|| ConstraintError::invalid(original, "unknown operator"))?;
            clauses.push(Clause::from_parts(op, &caps[2], original)?);
        }
        if consumed == 0 || !part[consumed..].trim().is_empty() {
            return Err(ConstraintError::invalid(original, "unexpected text"));
        }
    }
    Ok(clauses)
}

impl FromStr for VersionReq {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionReq::parse(s)
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for VersionReq {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for VersionReq {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        VersionReq::parse(&raw).map_err(serde::de::Error::custom)
    }
}
