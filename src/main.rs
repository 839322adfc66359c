//! depbump - resolve dependency updates from a job file
//!
//! Reads a JSON job (dependencies, releases, advisories, property files),
//! decides each dependency's target version and prints the rewritten
//! requirements as text or JSON.

use clap::Parser;
use depbump::cli::CliArgs;
use depbump::config::Config;
use depbump::error::AppError;
use depbump::job::Job;
use depbump::orchestrator::{Orchestrator, RunOptions};
use depbump::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = depbump::logging::init(args.verbose) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the job file and the configuration it runs with
fn load(args: &CliArgs) -> Result<(Job, Config), AppError> {
    let job = Job::from_file(&args.job)?;
    let config = Config::load(args.config.as_deref(), &args.job)?
        .with_overrides(args.cooldown, args.strict_ignores);
    Ok((job, config))
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let (job, config) = load(&args)?;
    debug!(
        dependencies = job.dependencies.len(),
        files = job.files.len(),
        "Loaded job {}",
        args.job.display()
    );

    let orchestrator = Orchestrator::for_job(&job, config, RunOptions::from_cli(&args));
    let result = orchestrator.run(&job.dependencies).await;

    let color = io::stdout().is_terminal();
    colored::control::set_override(color);
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet).with_color(color);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.has_errors() {
        // Partial success - some dependencies failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
