//! Batch orchestrator
//!
//! Runs the decision coordinator over every dependency of a job:
//! - `--only`/`--exclude`/`--ecosystem` filtering before any source call
//! - Bounded concurrency via a semaphore, one task per dependency
//! - Failures attributed to their dependency; the batch always completes
//! - Results reported in job order regardless of completion order

use crate::cli::{CliArgs, DEFAULT_CONCURRENCY};
use crate::config::Config;
use crate::domain::{BatchSummary, DependencyFile, UpdateResult};
use crate::job::{Job, JobDependency};
use crate::progress::Progress;
use crate::source::ReleaseSource;
use crate::update::{
    ResolverSettings, UpdateDecisionCoordinator, UpdateFilter, UpdateMode, DEFAULT_TIMEOUT,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Options of one batch run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: UpdateMode,
    pub filter: UpdateFilter,
    /// Maximum number of dependencies resolved at once
    pub concurrency: usize,
    /// Timeout for each release source call
    pub timeout: Duration,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: UpdateMode::Latest,
            filter: UpdateFilter::new(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            show_progress: false,
        }
    }
}

impl RunOptions {
    /// Options taken from the command line
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            mode: if args.security {
                UpdateMode::SecurityFix
            } else {
                UpdateMode::Latest
            },
            filter: args.update_filter(),
            concurrency: args.concurrency,
            timeout: args.timeout,
            show_progress: args.show_progress(),
        }
    }
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct OrchestratorResult {
    /// Per-dependency results in job order
    pub summary: BatchSummary,
    /// Dependencies whose resolution failed
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A dependency whose resolution failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorError {
    pub dependency: String,
    pub message: String,
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.dependency, self.message)
    }
}

impl std::error::Error for OrchestratorError {}

/// Runs a whole job
pub struct Orchestrator {
    coordinator: Arc<UpdateDecisionCoordinator>,
    config: Arc<Config>,
    options: RunOptions,
}

impl Orchestrator {
    /// Create an orchestrator evaluating cooldown against the current time
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        files: Vec<DependencyFile>,
        config: Config,
        options: RunOptions,
    ) -> Self {
        Self::with_time(source, files, config, options, Utc::now())
    }

    /// Create an orchestrator with a custom current time (for testing)
    pub fn with_time(
        source: Arc<dyn ReleaseSource>,
        files: Vec<DependencyFile>,
        config: Config,
        options: RunOptions,
        now: DateTime<Utc>,
    ) -> Self {
        let settings = ResolverSettings::new()
            .with_mode(options.mode)
            .with_raise_on_ignored(config.raise_on_ignored)
            .with_strategy(config.update_strategy)
            .with_cooldown(config.cooldown.clone())
            .with_timeout(options.timeout);
        let coordinator = UpdateDecisionCoordinator::with_time(source, settings, now).with_files(files);
        Self {
            coordinator: Arc::new(coordinator),
            config: Arc::new(config),
            options,
        }
    }

    /// Orchestrator for a loaded job, answering from the job's own release data
    pub fn for_job(job: &Job, config: Config, options: RunOptions) -> Self {
        Self::new(Arc::new(job.source()), job.files.clone(), config, options)
    }

    /// Resolve every dependency
    pub async fn run(&self, dependencies: &[JobDependency]) -> OrchestratorResult {
        let progress = Progress::new(self.options.show_progress);
        progress.start(dependencies.len() as u64, "Resolving");

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let mut slots: Vec<Option<UpdateResult>> = vec![None; dependencies.len()];
        let mut errors = Vec::new();
        let mut tasks = JoinSet::new();

        for (index, entry) in dependencies.iter().enumerate() {
            let dependency = entry.dependency.clone();
            if let Some(reason) = self.options.filter.skip_reason(&dependency) {
                debug!(dependency = %dependency.name, %reason, "Skipping dependency");
                progress.inc(&dependency.name);
                slots[index] = Some(UpdateResult::skip(dependency, reason));
                continue;
            }

            let rules = entry.rules(&self.config.ignore_rules_for(&dependency.name));
            let coordinator = Arc::clone(&self.coordinator);
            let semaphore = Arc::clone(&semaphore);
            let progress = progress.clone();

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => coordinator.resolve(&dependency, &rules).await,
                    Err(_) => Ok(UpdateResult::skip_failed(dependency.clone(), "run cancelled")),
                };
                progress.inc(&dependency.name);
                (index, dependency, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(result))) => slots[index] = Some(result),
                Ok((index, dependency, Err(e))) => {
                    warn!(dependency = %dependency.name, error = %e, "Resolution failed");
                    errors.push(OrchestratorError {
                        dependency: dependency.name.clone(),
                        message: e.to_string(),
                    });
                    slots[index] = Some(UpdateResult::skip_failed(dependency, e.to_string()));
                }
                Err(e) => warn!(error = %e, "Resolution task did not complete"),
            }
        }
        progress.finish_and_clear();

        let mut summary = BatchSummary::new(self.options.mode == UpdateMode::SecurityFix);
        for (slot, entry) in slots.into_iter().zip(dependencies) {
            let result = slot.unwrap_or_else(|| {
                errors.push(OrchestratorError {
                    dependency: entry.dependency.name.clone(),
                    message: "resolution task aborted".to_string(),
                });
                UpdateResult::skip_failed(entry.dependency.clone(), "resolution task aborted")
            });
            summary.add_result(result);
        }

        // Failures are reported in job order
        let order = |name: &str| dependencies.iter().position(|d| d.dependency.name == name);
        errors.sort_by_key(|e| order(&e.dependency));

        OrchestratorResult { summary, errors }
    }
}
