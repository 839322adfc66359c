//! JSON output formatter for machine processing
//!
//! Every dependency appears in `results` in job order, updates and skips
//! alike, so callers can apply rewritten requirements and property files
//! without re-reading the job.

use crate::domain::{BatchSummary, DependencyFile, Ecosystem, SkipReason, UpdateResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{bump_of, requirement_label, OutputFormatter, Verbosity};
use crate::update::BumpType;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

#[derive(Serialize)]
struct JsonOutput {
    security_only: bool,
    summary: JsonSummary,
    results: Vec<JsonResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    updates: usize,
    skips: usize,
    failures: usize,
    /// Breakdown by ecosystem (verbose only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_ecosystem: Vec<JsonEcosystemSummary>,
}

#[derive(Serialize)]
struct JsonEcosystemSummary {
    ecosystem: Ecosystem,
    updates: usize,
    skips: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum JsonStatus {
    Update,
    Skip,
}

#[derive(Serialize)]
struct JsonResult {
    name: String,
    ecosystem: Ecosystem,
    status: JsonStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bump: Option<BumpType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requirements: Vec<JsonRequirementChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    files: Vec<DependencyFile>,
}

/// One requirement whose text or ref moved
#[derive(Serialize)]
struct JsonRequirementChange {
    file: String,
    from: String,
    to: String,
}

impl JsonFormatter {
    fn result_to_json(result: &UpdateResult) -> JsonResult {
        match result {
            UpdateResult::Update {
                dependency,
                decision,
            } => JsonResult {
                name: dependency.name.clone(),
                ecosystem: dependency.ecosystem,
                status: JsonStatus::Update,
                from: dependency.version.clone(),
                to: decision.target_version.as_ref().map(|v| v.to_string()),
                bump: bump_of(result),
                reason: None,
                requirements: decision
                    .changed_requirements(&dependency.requirements)
                    .map(|(before, after)| JsonRequirementChange {
                        file: before.file.clone(),
                        from: requirement_label(before),
                        to: requirement_label(after),
                    })
                    .collect(),
                files: decision.updated_files.clone(),
            },
            UpdateResult::Skip { dependency, reason } => JsonResult {
                name: dependency.name.clone(),
                ecosystem: dependency.ecosystem,
                status: JsonStatus::Skip,
                from: dependency.version.clone(),
                to: None,
                bump: None,
                reason: Some(reason.to_string()),
                requirements: Vec::new(),
                files: Vec::new(),
            },
        }
    }

    fn summary_to_json(&self, summary: &BatchSummary) -> JsonSummary {
        let by_ecosystem = if self.verbosity == Verbosity::Verbose {
            summary
                .ecosystems()
                .into_iter()
                .map(|ecosystem| {
                    let (updates, skips) = summary
                        .by_ecosystem(ecosystem)
                        .fold((0, 0), |(u, s), r| if r.is_update() { (u + 1, s) } else { (u, s + 1) });
                    JsonEcosystemSummary {
                        ecosystem,
                        updates,
                        skips,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        JsonSummary {
            updates: summary.total_updates(),
            skips: summary.total_skips(),
            failures: summary
                .skips()
                .filter(|r| matches!(r, UpdateResult::Skip { reason: SkipReason::Failed(_), .. }))
                .count(),
            by_ecosystem,
        }
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            security_only: result.summary.security_only,
            summary: self.summary_to_json(&result.summary),
            results: result.summary.results.iter().map(Self::result_to_json).collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };
        Self::write_json(&output, writer)
    }

    fn format_summary(&self, summary: &BatchSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_json(&self.summary_to_json(summary), writer)
    }

    fn format_result(&self, result: &UpdateResult, writer: &mut dyn Write) -> std::io::Result<()> {
        Self::write_json(&Self::result_to_json(result), writer)
    }
}
