//! CLI argument definitions using clap

use crate::config::parse_duration;
use crate::domain::Ecosystem;
use crate::update::UpdateFilter;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of dependencies resolved at the same time
pub const DEFAULT_CONCURRENCY: usize = 10;

fn parse_cooldown(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    s.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| format!("invalid timeout in seconds: {}", s))
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("concurrency must be a positive number: {}", s)),
        Ok(n) => Ok(n),
    }
}

/// Resolve dependency updates and rewrite their requirements
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depbump",
    version,
    about = "Resolve dependency updates and rewrite their requirements"
)]
pub struct CliArgs {
    /// Job file (JSON) describing dependencies, releases and advisories
    pub job: PathBuf,

    /// Config file (default: depbump.toml next to the job file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    // Resolution options
    /// Only look for the lowest release that fixes a vulnerability
    #[arg(long)]
    pub security: bool,

    /// Fail a dependency when ignore rules remove every candidate
    #[arg(long)]
    pub strict_ignores: bool,

    /// Hold back releases younger than this (e.g., 2w, 10d, 1m)
    #[arg(long, value_parser = parse_cooldown)]
    pub cooldown: Option<Duration>,

    // Dependency filters
    /// Update only specific dependencies (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Exclude specific dependencies from update (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Update only dependencies of this ecosystem (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub ecosystem: Vec<Ecosystem>,

    // Runtime options
    /// Number of dependencies resolved concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
    pub concurrency: usize,

    /// Release source timeout in seconds
    #[arg(long, default_value = "30", value_parser = parse_timeout)]
    pub timeout: Duration,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Dependency filter built from `--only`, `--exclude` and `--ecosystem`
    pub fn update_filter(&self) -> UpdateFilter {
        UpdateFilter::new()
            .with_ecosystems(self.ecosystem.clone())
            .with_only(self.only.clone())
            .with_exclude(self.exclude.clone())
    }

    /// Whether the progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
