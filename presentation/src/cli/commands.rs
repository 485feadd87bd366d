//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use gate_domain::ReportFormat;
use std::path::PathBuf;

/// CLI arguments for review-gate
#[derive(Parser, Debug)]
#[command(name = "review-gate")]
#[command(author, version, about = "Detect review agents for a codebase and enforce their consensus")]
#[command(long_about = r#"
review-gate decides which review agents a codebase needs and gates a change
on their combined verdicts.

Any VETO blocks the change. A single veto can be overridden on request when
enough agents approve; two or more vetoes never can. Agents that do not answer
before the timeout are counted as vetoes.

Configuration files are loaded from (in priority order):
1. REVIEW_GATE_* environment variables (e.g. REVIEW_GATE_REVIEW__TIMEOUT_SECONDS)
2. --config <path>          Explicit config file
3. ./review-gate.toml       Project-level config (or .review-gate.toml)
4. ~/.config/review-gate/config.toml   Global config

Example:
  review-gate detect .
  review-gate review . --verdicts verdicts.json
  review-gate review . --override --json
  review-gate stats --top 10
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a project and list the agents it needs
    Detect(DetectArgs),

    /// Run a review cycle and exit non-zero when the change is blocked
    Review(ReviewArgs),

    /// Show per-agent review statistics
    Stats(StatsArgs),

    /// Regenerate the metrics aggregate from the event log
    RebuildMetrics(ProjectArgs),
}

impl Command {
    /// Project root the command operates on
    pub fn root(&self) -> &PathBuf {
        match self {
            Command::Detect(args) => &args.project.path,
            Command::Review(args) => &args.project.path,
            Command::Stats(args) => &args.project.path,
            Command::RebuildMetrics(args) => &args.path,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Use exactly these agents instead of detecting them
    #[arg(long = "agent", value_name = "ID", value_delimiter = ',')]
    pub agents: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl DetectArgs {
    pub fn format(&self) -> ReportFormat {
        ReportFormat::from_json_flag(self.json)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Pre-computed verdicts (JSON array) for agents without a command
    #[arg(long, value_name = "FILE")]
    pub verdicts: Option<PathBuf>,

    /// Request an override of a single veto
    #[arg(long = "override")]
    pub override_veto: bool,

    /// Identifier for this cycle (generated when omitted)
    #[arg(long, value_name = "ID")]
    pub cycle_id: Option<String>,

    /// Seconds to wait for verdicts
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Use exactly these agents instead of detecting them
    #[arg(long = "agent", value_name = "ID", value_delimiter = ',')]
    pub agents: Vec<String>,

    /// Do not record metrics for this cycle
    #[arg(long)]
    pub no_metrics: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReviewArgs {
    pub fn format(&self) -> ReportFormat {
        ReportFormat::from_json_flag(self.json)
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only show this agent
    #[arg(long, value_name = "ID")]
    pub agent: Option<String>,

    /// Number of top veto reasons to show
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub top: usize,

    /// Print the statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    pub fn format(&self) -> ReportFormat {
        ReportFormat::from_json_flag(self.json)
    }
}

/// Explicit agent list from `--agent` flags, if any were given
pub fn explicit_agents(agents: &[String]) -> Option<Vec<String>> {
    (!agents.is_empty()).then(|| agents.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_review_flags() {
        let cli = Cli::parse_from([
            "review-gate",
            "-vv",
            "review",
            "repo",
            "--override",
            "--timeout",
            "30",
            "--agent",
            "security-agent,test-agent",
            "--json",
        ]);
        assert_eq!(cli.verbose, 2);

        let Some(Command::Review(args)) = cli.command else {
            panic!("expected review command");
        };
        assert_eq!(args.project.path, PathBuf::from("repo"));
        assert!(args.override_veto);
        assert_eq!(args.timeout, Some(30));
        assert_eq!(args.agents, vec!["security-agent", "test-agent"]);
        assert_eq!(args.format(), ReportFormat::Json);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["review-gate", "stats"]);
        let Some(Command::Stats(args)) = cli.command else {
            panic!("expected stats command");
        };
        assert_eq!(args.project.path, PathBuf::from("."));
        assert_eq!(args.top, 5);
        assert_eq!(args.format(), ReportFormat::Text);
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::parse_from(["review-gate", "--show-config"]);
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_explicit_agents() {
        assert_eq!(explicit_agents(&[]), None);
        assert_eq!(
            explicit_agents(&["doc-agent".to_string()]),
            Some(vec!["doc-agent".to_string()])
        );
    }
}
