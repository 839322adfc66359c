//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Results grouped by ecosystem with update/skip counts
//! - Bump size indication (major/minor/patch)
//! - Per-file requirement changes under each update
//! - Skipped dependencies with reasons (verbose)
//! - Summary with a breakdown by bump size

use crate::domain::{BatchSummary, Ecosystem, SkipReason, UpdateResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{bump_of, requirement_label, OutputFormatter, Verbosity};
use crate::update::BumpType;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self::with_color(verbosity, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn bump_label(&self, bump: Option<BumpType>) -> String {
        match (bump, self.color) {
            (Some(BumpType::Major), true) => "major".red().bold().to_string(),
            (Some(BumpType::Minor), true) => "minor".yellow().to_string(),
            (Some(BumpType::Patch), true) => "patch".green().to_string(),
            (Some(bump), false) => bump.label().to_string(),
            (None, true) => "?".dimmed().to_string(),
            (None, false) => "?".to_string(),
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn arrow(&self) -> String {
        if self.color {
            "→".dimmed().to_string()
        } else {
            "->".to_string()
        }
    }

    fn max_name_length(results: &[&UpdateResult]) -> usize {
        results
            .iter()
            .map(|r| r.package_name().len())
            .max()
            .unwrap_or(0)
    }

    fn format_update(
        &self,
        result: &UpdateResult,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let UpdateResult::Update {
            dependency,
            decision,
        } = result
        else {
            return Ok(());
        };

        let target = decision
            .target_version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| dependency.version_display().to_string());
        let name = format!("{:width$}", dependency.name, width = max_name_len);
        let target = if self.color {
            target.bright_white().bold().to_string()
        } else {
            target
        };
        writeln!(
            writer,
            "  {} {} {} {} [{}]",
            name,
            self.dimmed(dependency.version_display()),
            self.arrow(),
            target,
            self.bump_label(bump_of(result))
        )?;

        for (before, after) in decision.changed_requirements(&dependency.requirements) {
            writeln!(
                writer,
                "      {}: {} {} {}",
                self.dimmed(&before.file),
                requirement_label(before),
                self.arrow(),
                requirement_label(after)
            )?;
        }
        for file in &decision.updated_files {
            writeln!(
                writer,
                "      {}: {}",
                self.dimmed(&file.name),
                self.dimmed("property declaration updated")
            )?;
        }
        Ok(())
    }

    fn format_skip(
        &self,
        result: &UpdateResult,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let UpdateResult::Skip { dependency, reason } = result else {
            return Ok(());
        };
        let name = format!("{:width$}", dependency.name, width = max_name_len);
        writeln!(
            writer,
            "  {} {} {}",
            self.dimmed(&name),
            self.dimmed(dependency.version_display()),
            self.dimmed(&format!("({})", reason))
        )
    }

    fn format_ecosystem(
        &self,
        ecosystem: Ecosystem,
        summary: &BatchSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let (updates, skips): (Vec<&UpdateResult>, Vec<&UpdateResult>) =
            summary.by_ecosystem(ecosystem).partition(|r| r.is_update());

        if updates.is_empty() && (self.verbosity != Verbosity::Verbose || skips.is_empty()) {
            return Ok(());
        }

        let update_word = if updates.len() == 1 { "update" } else { "updates" };
        let skip_word = if skips.len() == 1 { "skip" } else { "skips" };
        if self.color {
            writeln!(
                writer,
                "{} ({}) - {} {}, {} {}",
                ecosystem.display_name().bold(),
                ecosystem.registry_name().dimmed(),
                updates.len().to_string().green(),
                update_word,
                skips.len().to_string().dimmed(),
                skip_word
            )?;
        } else {
            writeln!(
                writer,
                "{} ({}) - {} {}, {} {}",
                ecosystem.display_name(),
                ecosystem.registry_name(),
                updates.len(),
                update_word,
                skips.len(),
                skip_word
            )?;
        }

        let max_name_len = Self::max_name_length(&updates).max(20);
        for result in &updates {
            self.format_update(result, max_name_len, writer)?;
        }

        if self.verbosity == Verbosity::Verbose && !skips.is_empty() {
            writeln!(writer, "  {}", self.dimmed("Skipped:"))?;
            let max_name_len = Self::max_name_length(&skips).max(20);
            for result in &skips {
                self.format_skip(result, max_name_len, writer)?;
            }
        }

        writeln!(writer)
    }

    /// Count updates by bump size: (major, minor, patch, unknown)
    fn count_by_bump(summary: &BatchSummary) -> (usize, usize, usize, usize) {
        summary
            .updates()
            .fold((0, 0, 0, 0), |(major, minor, patch, unknown), result| {
                match bump_of(result) {
                    Some(BumpType::Major) => (major + 1, minor, patch, unknown),
                    Some(BumpType::Minor) => (major, minor + 1, patch, unknown),
                    Some(BumpType::Patch) => (major, minor, patch + 1, unknown),
                    None => (major, minor, patch, unknown + 1),
                }
            })
    }

    /// Count skips by reason, most frequent first
    fn count_by_skip_reason(summary: &BatchSummary) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for result in summary.skips() {
            if let UpdateResult::Skip { reason, .. } = result {
                let key = match reason {
                    SkipReason::SourceUnavailable(_) => "source unavailable".to_string(),
                    SkipReason::Failed(_) => "failed".to_string(),
                    other => other.to_string(),
                };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        for ecosystem in result.summary.ecosystems() {
            self.format_ecosystem(ecosystem, &result.summary, writer)?;
        }

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)
    }

    fn format_summary(&self, summary: &BatchSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let updates = summary.total_updates();
        let skips = summary.total_skips();
        let noun = if summary.security_only {
            "security fix(es)"
        } else {
            "update(s)"
        };

        if self.verbosity == Verbosity::Quiet {
            if updates == 0 {
                return writeln!(writer, "{}", self.dimmed("No updates"));
            }
            let count = if self.color {
                updates.to_string().green().to_string()
            } else {
                updates.to_string()
            };
            return writeln!(writer, "{} {}", count, noun);
        }

        let title = if summary.security_only {
            "Summary (security only)"
        } else {
            "Summary"
        };
        if self.color {
            writeln!(writer, "{}:", title.bold())?;
        } else {
            writeln!(writer, "{}:", title)?;
        }

        if updates > 0 {
            let (major, minor, patch, unknown) = Self::count_by_bump(summary);
            let parts: Vec<String> = [
                (major, BumpType::Major.label()),
                (minor, BumpType::Minor.label()),
                (patch, BumpType::Patch.label()),
                (unknown, "other"),
            ]
            .into_iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, label)| format!("{} {}", count, label))
            .collect();
            writeln!(writer, "  {} {} ({})", updates, noun, parts.join(", "))?;
        } else {
            writeln!(writer, "  {}", self.dimmed("No dependencies updated"))?;
        }

        if skips > 0 {
            write!(writer, "  {} dependency(ies) skipped", skips)?;
            if self.verbosity == Verbosity::Verbose {
                let parts: Vec<String> = Self::count_by_skip_reason(summary)
                    .iter()
                    .map(|(reason, count)| format!("{} {}", count, reason))
                    .collect();
                if !parts.is_empty() {
                    write!(writer, " ({})", self.dimmed(&parts.join(", ")))?;
                }
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    fn format_result(&self, result: &UpdateResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let width = result.package_name().len();
        if result.is_update() {
            self.format_update(result, width, writer)
        } else {
            self.format_skip(result, width, writer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dependency, DependencyFile, Requirement, UpdateDecision, Version};
    use crate::orchestrator::OrchestratorError;

    fn update(name: &str, ecosystem: Ecosystem, from: &str, to: &str, before: &str, after: &str) -> UpdateResult {
        let dependency = Dependency::new(name, ecosystem)
            .with_version(from)
            .with_requirement(Requirement::new("Gemfile", Some(before)));
        let decision = UpdateDecision::to(
            Version::parse(to).unwrap(),
            vec![Requirement::new("Gemfile", Some(after))],
        );
        UpdateResult::update(dependency, decision)
    }

    fn sample_result() -> OrchestratorResult {
        let mut summary = BatchSummary::new(false);
        summary.add_result(update("rails", Ecosystem::Bundler, "6.1.0", "7.0.4", "~> 6.1", "~> 7.0"));
        summary.add_result(update("rack", Ecosystem::Bundler, "2.2.3", "2.2.8", "~> 2.2", "~> 2.2"));
        summary.add_result(UpdateResult::skip(
            Dependency::new("puma", Ecosystem::Bundler).with_version("6.4.0"),
            SkipReason::AlreadyUpToDate,
        ));
        OrchestratorResult {
            summary,
            errors: Vec::new(),
        }
    }

    fn render(formatter: &TextFormatter, result: &OrchestratorResult) -> String {
        let mut output = Vec::new();
        formatter.format(result, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_format_updates_with_requirement_changes() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let output = render(&formatter, &sample_result());

        assert!(output.contains("Bundler (RubyGems) - 2 updates, 1 skip"));
        assert!(output.contains("6.1.0 -> 7.0.4 [major]"));
        assert!(output.contains("2.2.3 -> 2.2.8 [patch]"));
        assert!(output.contains("Gemfile: ~> 6.1 -> ~> 7.0"));
        assert!(!output.contains("puma"));
        assert!(output.contains("2 update(s) (1 major, 1 patch)"));
        assert!(output.contains("1 dependency(ies) skipped"));
    }

    #[test]
    fn test_format_verbose_shows_skips() {
        let formatter = TextFormatter::with_color(Verbosity::Verbose, false);
        let output = render(&formatter, &sample_result());
        assert!(output.contains("Skipped:"));
        assert!(output.contains("(already up to date)"));
        assert!(output.contains("skipped (1 already up to date)"));
    }

    #[test]
    fn test_format_quiet() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false);
        let output = render(&formatter, &sample_result());
        assert_eq!(output, "2 update(s)\n");

        let empty = OrchestratorResult {
            summary: BatchSummary::new(false),
            errors: Vec::new(),
        };
        assert_eq!(render(&formatter, &empty), "No updates\n");
    }

    #[test]
    fn test_format_errors() {
        let mut result = sample_result();
        result.errors.push(OrchestratorError {
            dependency: "nokogiri".to_string(),
            message: "all versions of 'nokogiri' are ignored".to_string(),
        });
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let output = render(&formatter, &result);
        assert!(output.contains("Errors:"));
        assert!(output.contains("  - nokogiri: all versions"));
    }

    #[test]
    fn test_format_security_summary() {
        let mut summary = BatchSummary::new(true);
        summary.add_result(update("rails", Ecosystem::Bundler, "6.1.0", "6.1.7", "6.1.0", "6.1.7"));
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let mut output = Vec::new();
        formatter.format_summary(&summary, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Summary (security only):"));
        assert!(output.contains("1 security fix(es) (1 patch)"));
    }

    #[test]
    fn test_format_result_with_updated_file() {
        let dependency = Dependency::new("kotlin-stdlib", Ecosystem::Gradle).with_version("1.2.61");
        let decision = UpdateDecision::to(Version::parse("1.3.0").unwrap(), Vec::new())
            .with_files(vec![DependencyFile::new("build.gradle", "ext.kotlin_version = '1.3.0'\n")]);
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let mut output = Vec::new();
        formatter
            .format_result(&UpdateResult::update(dependency, decision), &mut output)
            .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("1.2.61 -> 1.3.0 [minor]"));
        assert!(output.contains("build.gradle: property declaration updated"));
    }
}
