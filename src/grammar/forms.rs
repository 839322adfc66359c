//! Shared rewrite forms
//!
//! Each form either rewrites the text or reports [`NoMatch`] so the next
//! form can be tried. Forms never reinterpret text they do not recognise.

use super::{NoMatch, Separator, Syntax};
use crate::constraint::{wildcard_prefix, Op};
use crate::domain::{join_segments, PackageRelease, Version};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

// A whole requirement that is just a version: `1.2.3`, `v2.0`
static BARE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*v?\d[0-9A-Za-z.+\-]*\s*$").unwrap());

// A single quoted version inside surrounding text: `version = "1.2.3"`
static QUOTED_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'](v?\d[0-9A-Za-z.+\-]*)["']"#).unwrap());

static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(~>|~=|===|==|!=|>=|<=|\^|~|>|<|=)?(\s*)(v?\d[0-9A-Za-z.*+\-]*|\*|[xX])")
        .unwrap()
});

static DUAL_BOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(\S+)(\s*)(<=|<)(\s*v\s*)(<=|<)(\s*)(\S+)(\s*)$").unwrap()
});

/// Try every text form in priority order
pub fn rewrite(syntax: &Syntax, text: &str, new: &Version) -> Result<String, NoMatch> {
    rewrite_exact(syntax, text, new)
        .or_else(|_| rewrite_operators(syntax, text, new))
        .or_else(|_| rewrite_dual_bound(syntax, text, new))
}

/// `new` written with as many release segments as `old_token`
///
/// Versions with a suffix (pre-releases, post-releases) are written in full.
pub fn at_same_precision(new: &Version, old_token: &str) -> String {
    let prefix = if old_token.starts_with('v') { "v" } else { "" };
    if new.has_suffix() {
        return format!("{}{}", prefix, new.as_str().trim_start_matches(['v', 'V']));
    }
    let precision = Version::parse(old_token)
        .map(|v| v.precision())
        .unwrap_or_else(|_| new.precision())
        .max(1);
    let segments: Vec<u64> = (0..precision).map(|i| new.segment(i)).collect();
    format!("{}{}", prefix, join_segments(&segments))
}

/// Exact form: the whole text, or one quoted literal inside it, is a version
pub fn rewrite_exact(syntax: &Syntax, text: &str, new: &Version) -> Result<String, NoMatch> {
    if !syntax.bare_versions {
        return Err(NoMatch);
    }

    if BARE_VERSION_RE.is_match(text) {
        let token = text.trim();
        if wildcard_prefix(token).is_some() || Version::parse(token).is_err() {
            return Err(NoMatch);
        }
        return Ok(text.replacen(token, &at_same_precision(new, token), 1));
    }

    let mut literals = QUOTED_VERSION_RE.captures_iter(text);
    let (Some(caps), None) = (literals.next(), literals.next()) else {
        return Err(NoMatch);
    };
    let token = caps.get(1).ok_or(NoMatch)?;
    if Version::parse(token.as_str()).is_err() {
        return Err(NoMatch);
    }
    let mut result = String::with_capacity(text.len());
    result.push_str(&text[..token.start()]);
    result.push_str(&at_same_precision(new, token.as_str()));
    result.push_str(&text[token.end()..]);
    Ok(result)
}

/// Operator-prefixed form, including compound and `||` requirements
pub fn rewrite_operators(syntax: &Syntax, text: &str, new: &Version) -> Result<String, NoMatch> {
    if let Some(separator) = syntax.alternatives {
        if let Some(idx) = text.rfind(separator) {
            let (head, tail) = text.split_at(idx + separator.len());
            return Ok(format!("{}{}", head, rewrite_conjunction(syntax, tail, new)?));
        }
    }
    rewrite_conjunction(syntax, text, new)
}

struct ClauseSpan<'t> {
    start: usize,
    end: usize,
    op: &'t str,
    gap: &'t str,
    version: &'t str,
}

enum ClauseEdit {
    Keep,
    Replace(String),
    Drop,
}

fn parse_clauses<'t>(syntax: &Syntax, text: &'t str) -> Option<Vec<ClauseSpan<'t>>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for caps in CLAUSE_RE.captures_iter(text) {
        let whole = caps.get(0)?;
        let between = &text[cursor..whole.start()];
        let valid_gap = match (spans.is_empty(), syntax.separator) {
            (true, _) => between.trim().is_empty(),
            (false, Separator::Comma) => between.trim() == ",",
            (false, Separator::Whitespace) => !between.is_empty() && between.trim().is_empty(),
        };
        if !valid_gap {
            return None;
        }
        spans.push(ClauseSpan {
            start: whole.start(),
            end: whole.end(),
            op: caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            gap: caps.get(2).map(|m| m.as_str()).unwrap_or(""),
            version: caps.get(3).map(|m| m.as_str()).unwrap_or(""),
        });
        cursor = whole.end();
    }
    if spans.is_empty() || !text[cursor..].trim().is_empty() {
        return None;
    }
    Some(spans)
}

fn rewrite_conjunction(syntax: &Syntax, text: &str, new: &Version) -> Result<String, NoMatch> {
    let spans = parse_clauses(syntax, text).ok_or(NoMatch)?;
    let edits = spans
        .iter()
        .map(|span| rewrite_clause(syntax, span, new))
        .collect::<Result<Vec<_>, _>>()?;

    if !edits.iter().any(|e| matches!(e, ClauseEdit::Drop)) {
        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;
        for (span, edit) in spans.iter().zip(&edits) {
            result.push_str(&text[cursor..span.start]);
            match edit {
                ClauseEdit::Replace(clause) => result.push_str(clause),
                _ => result.push_str(&text[span.start..span.end]),
            }
            cursor = span.end;
        }
        result.push_str(&text[cursor..]);
        return Ok(result);
    }

    let kept: Vec<String> = spans
        .iter()
        .zip(edits)
        .filter_map(|(span, edit)| match edit {
            ClauseEdit::Keep => Some(text[span.start..span.end].to_string()),
            ClauseEdit::Replace(clause) => Some(clause),
            ClauseEdit::Drop => None,
        })
        .collect();
    if kept.is_empty() {
        return Err(NoMatch);
    }
    let joiner = match syntax.separator {
        Separator::Comma => ", ",
        Separator::Whitespace => " ",
    };
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];
    Ok(format!("{}{}{}", leading, kept.join(joiner), trailing))
}

fn rewrite_clause(syntax: &Syntax, span: &ClauseSpan<'_>, new: &Version) -> Result<ClauseEdit, NoMatch> {
    if span.op.is_empty() {
        if !syntax.bare_versions {
            return Err(NoMatch);
        }
    } else if !syntax.operators.contains(&span.op) {
        return Err(NoMatch);
    }
    let op = Op::from_token(span.op).ok_or(NoMatch)?;

    if wildcard_prefix(span.version).is_some() {
        if !syntax.wildcards {
            return Err(NoMatch);
        }
        return Ok(match op {
            Op::Eq | Op::Caret | Op::Tilde => ClauseEdit::Replace(format!(
                "{}{}{}",
                span.op,
                span.gap,
                rewrite_wildcard(span.version, new)
            )),
            _ => ClauseEdit::Keep,
        });
    }

    let bound = Version::parse(span.version).map_err(|_| NoMatch)?;
    let replace = |version: String| ClauseEdit::Replace(format!("{}{}{}", span.op, span.gap, version));
    Ok(match op {
        Op::Eq | Op::Gte | Op::Pessimistic | Op::Caret | Op::Tilde => {
            replace(at_same_precision(new, span.version))
        }
        Op::Gt => ClauseEdit::Keep,
        Op::NotEq if bound.same_precedence(new) => ClauseEdit::Drop,
        Op::NotEq => ClauseEdit::Keep,
        Op::Lt if new.cmp_precedence(&bound) == Ordering::Less => ClauseEdit::Keep,
        Op::Lt => replace(raise_upper_bound(span.version, &bound, new)),
        Op::Lte if new.cmp_precedence(&bound) != Ordering::Greater => ClauseEdit::Keep,
        Op::Lte => replace(at_same_precision(new, span.version)),
    })
}

/// Keep the wildcard where it was: `1.x` -> `3.x`, `1.2.*` -> `3.5.*`
fn rewrite_wildcard(token: &str, new: &Version) -> String {
    let (prefix, body) = match token.strip_prefix('v') {
        Some(rest) => ("v", rest),
        None => ("", token),
    };
    let parts: Vec<&str> = body.split('.').collect();
    let Some(first_wild) = parts.iter().position(|p| matches!(*p, "*" | "x" | "X" | "+")) else {
        return token.to_string();
    };
    let mut rewritten: Vec<String> = (0..first_wild).map(|i| new.segment(i).to_string()).collect();
    rewritten.extend(parts[first_wild..].iter().map(|p| p.to_string()));
    format!("{}{}", prefix, rewritten.join("."))
}

/// Raise an exclusive upper bound so it admits `new`, keeping its precision
///
/// The last non-zero segment of the bound is the one that moves:
/// `< 2.0` with 2.1.0 gives `< 3.0`, `< 1.5` with 1.6.2 gives `< 1.7`.
fn raise_upper_bound(token: &str, bound: &Version, new: &Version) -> String {
    let prefix = if token.starts_with('v') { "v" } else { "" };
    let precision = bound.precision().max(1);
    let index = (0..precision)
        .rev()
        .find(|&i| bound.segment(i) != 0)
        .unwrap_or(0);
    let segments: Vec<u64> = (0..precision)
        .map(|i| match i.cmp(&index) {
            Ordering::Less => new.segment(i),
            Ordering::Equal => new.segment(i).saturating_add(1),
            Ordering::Greater => 0,
        })
        .collect();
    format!("{}{}", prefix, join_segments(&segments))
}

/// Dual-bound form: `1.0.0 <= v < 2.0.0`
///
/// Unchanged when `new` is already inside. Otherwise the lower bound stays and
/// the upper bound moves so the range keeps its major-version width.
pub fn rewrite_dual_bound(syntax: &Syntax, text: &str, new: &Version) -> Result<String, NoMatch> {
    if !syntax.dual_bound {
        return Err(NoMatch);
    }
    let caps = DUAL_BOUND_RE.captures(text).ok_or(NoMatch)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
    let lower = Version::parse(group(2)).map_err(|_| NoMatch)?;
    let upper_token = group(8);
    let upper = Version::parse(upper_token).map_err(|_| NoMatch)?;
    let lower_inclusive = group(4) == "<=";
    let upper_inclusive = group(6) == "<=";

    let above_lower = match new.cmp_precedence(&lower) {
        Ordering::Greater => true,
        Ordering::Equal => lower_inclusive,
        Ordering::Less => false,
    };
    if !above_lower {
        return Ok(text.to_string());
    }
    let below_upper = match new.cmp_precedence(&upper) {
        Ordering::Less => true,
        Ordering::Equal => upper_inclusive,
        Ordering::Greater => false,
    };
    if below_upper {
        return Ok(text.to_string());
    }

    let new_upper = if upper_inclusive {
        at_same_precision(new, upper_token)
    } else {
        let width = upper.major().saturating_sub(lower.major()).max(1);
        let mut segments = vec![0; upper.precision().max(1)];
        segments[0] = new.major().saturating_add(width);
        let prefix = if upper_token.starts_with('v') { "v" } else { "" };
        format!("{}{}", prefix, join_segments(&segments))
    };

    Ok(format!(
        "{}{}{}{}{}{}{}{}{}",
        group(1),
        group(2),
        group(3),
        group(4),
        group(5),
        group(6),
        group(7),
        new_upper,
        group(9)
    ))
}

/// Pinned-ref form: the ref that publishes `target`
///
/// Only refs naming the old version match; commit SHAs and branch names do
/// not. A matching ref becomes the target release's tag when known,
/// otherwise the old version inside it is swapped (`v1.2.0` -> `v1.3.0`).
pub fn rewrite_ref(
    old_ref: &str,
    old: Option<&Version>,
    target: &PackageRelease,
) -> Result<String, NoMatch> {
    let old = old.ok_or(NoMatch)?;
    let old_text = old.as_str().trim_start_matches(['v', 'V']);
    if old_text.is_empty() || !old_ref.contains(old_text) {
        return Err(NoMatch);
    }
    if let Some(tag) = &target.tag {
        return Ok(tag.clone());
    }
    let new_text = target.version.as_str().trim_start_matches(['v', 'V']);
    Ok(old_ref.replacen(old_text, new_text, 1))
}
