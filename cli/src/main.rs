//! CLI entrypoint for review-gate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.
//!
//! Exit codes: 0 approved (or nothing to gate), 1 blocked, 2 scan, rule,
//! or configuration error.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use gate_application::{
    CycleProgressNotifier, DetectAgentsInput, DetectAgentsUseCase, DetectError, DetectionReport,
    MetricsRecorder, NoProgress, ReviewReport, RunConsensusInput, RunConsensusUseCase,
};
use gate_domain::AgentRegistry;
use gate_infrastructure::{
    ConfigLoader, FileConfig, FsSignalScanner, JsonlMetricsStore, RecordedVerdicts,
    build_review_agents,
};
use gate_presentation::{
    Cli, Command, ConsoleFormatter, DetectArgs, ProgressReporter, ReviewArgs, StatsArgs,
    StatsReport, formatter_for,
};
use gate_presentation::cli::commands::explicit_agents;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

const EXIT_APPROVED: u8 = 0;
const EXIT_BLOCKED: u8 = 1;
const EXIT_ERROR: u8 = 2;

/// Rolling log file name inside `--log-dir`
const LOG_FILE_NAME: &str = "review-gate.log";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr so JSON reports on stdout stay clean. The returned
/// guard flushes the optional file sink on drop.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file_writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let root = cli
        .command
        .as_ref()
        .map(|c| c.root().clone())
        .unwrap_or_else(|| ".".into());

    if cli.show_config {
        println!(
            "{}",
            ConfigLoader::describe_sources(Some(&root), cli.config.as_ref())
        );
        return Ok(EXIT_APPROVED);
    }

    let Some(command) = cli.command else {
        eprintln!("No command given. Run `review-gate --help` for usage.");
        return Ok(EXIT_ERROR);
    };

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(Some(&root), cli.config.as_ref())
            .context("Failed to load configuration")?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if issues.iter().any(|i| i.is_error()) {
        return Ok(EXIT_ERROR);
    }

    match command {
        Command::Detect(args) => detect(&config, args),
        Command::Review(args) => review(&config, args, cli.quiet).await,
        Command::Stats(args) => stats(&config, args),
        Command::RebuildMetrics(args) => rebuild_metrics(&config, &args.path),
    }
}

fn detect_agents(
    config: &FileConfig,
    root: &Path,
    cli_agents: &[String],
) -> Result<(AgentRegistry, Result<DetectionReport, DetectError>)> {
    let registry = config
        .agents
        .build_registry()
        .context("Invalid agent definitions")?;

    // === Dependency Injection ===
    let use_case = DetectAgentsUseCase::new(
        Arc::new(FsSignalScanner::new()),
        Arc::new(registry.clone()),
    );
    let active = explicit_agents(cli_agents).or_else(|| config.agents.active.clone());
    let report = use_case.execute(DetectAgentsInput::new(root).with_active_agents(active));

    Ok((registry, report))
}

fn detect(config: &FileConfig, args: DetectArgs) -> Result<u8> {
    let (_, report) = detect_agents(config, &args.project.path, &args.agents)?;
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    println!("{}", formatter_for(args.format()).detection(&report));
    Ok(EXIT_APPROVED)
}

async fn review(config: &FileConfig, args: ReviewArgs, quiet: bool) -> Result<u8> {
    let root = args.project.path.clone();
    let (registry, detection) = detect_agents(config, &root, &args.agents)?;
    let detection = match detection {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let recorded = args
        .verdicts
        .as_deref()
        .map(RecordedVerdicts::load)
        .transpose()
        .context("Failed to load verdicts")?;
    let agents = build_review_agents(&registry, &config.agents.commands, recorded.as_ref());

    let mut params = config.review_params();
    if let Some(seconds) = args.timeout {
        params = params.with_timeout_seconds(seconds);
    }

    let cycle_id = args
        .cycle_id
        .clone()
        .unwrap_or_else(|| format!("cycle-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));
    let input = RunConsensusInput::from_detection(&cycle_id, &detection)
        .with_override(args.override_veto);

    let use_case = RunConsensusUseCase::new(agents, params);
    let progress: Box<dyn CycleProgressNotifier> = if quiet || args.json {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let outcome = use_case
        .execute_with_progress(input, progress.as_ref())
        .await
        .context("Review cycle failed")?;

    let approved = outcome.result.is_approved();
    let mut report = ReviewReport::new(detection, outcome);

    if config.metrics.enabled && !args.no_metrics {
        let store = JsonlMetricsStore::new(config.metrics.resolve_dir(&root));
        match MetricsRecorder::open(Arc::new(store)) {
            Ok(recorder) => {
                let recorded = recorder.record(
                    &report.outcome.cycle_id,
                    &report.outcome.verdicts,
                    &report.outcome.result,
                );
                report = report.with_metrics(recorded);
            }
            Err(e) => warn!("Metrics unavailable, cycle not recorded: {}", e),
        }
    }

    println!("{}", formatter_for(args.format()).review(&report));

    info!(
        "Cycle {} decided: {}",
        report.outcome.cycle_id, report.outcome.result.decision
    );
    Ok(if approved { EXIT_APPROVED } else { EXIT_BLOCKED })
}

fn open_recorder(config: &FileConfig, root: &Path) -> Result<MetricsRecorder> {
    let dir = config.metrics.resolve_dir(root);
    MetricsRecorder::open(Arc::new(JsonlMetricsStore::new(&dir)))
        .with_context(|| format!("Failed to open metrics in {}", dir.display()))
}

fn stats(config: &FileConfig, args: StatsArgs) -> Result<u8> {
    let recorder = open_recorder(config, &args.project.path)?;

    let agents = match &args.agent {
        Some(agent_id) => vec![recorder.get_agent_stats(agent_id)],
        None => recorder.all_stats(),
    };
    let report = StatsReport {
        agents,
        top_veto_reasons: recorder.top_veto_reasons(args.top),
    };

    println!("{}", formatter_for(args.format()).stats(&report));
    Ok(EXIT_APPROVED)
}

fn rebuild_metrics(config: &FileConfig, root: &Path) -> Result<u8> {
    let recorder = open_recorder(config, root)?;
    let aggregate = recorder.rebuild().context("Failed to rebuild metrics")?;

    println!(
        "Rebuilt metrics: {} reviews across {} agents",
        aggregate.total_reviews(),
        aggregate.agents.len()
    );
    Ok(EXIT_APPROVED)
}
