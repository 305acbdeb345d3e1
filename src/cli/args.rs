//! CLI argument definitions
//!
//! All Clap derive structs for `rpc-certify` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::case::Mutation;
use crate::config::{DEFAULT_HOST, ENDPOINT_ENV};
use crate::observability::{ColorChoice, LogFormat};

// ============================================================================
// Root CLI
// ============================================================================

/// Conformance test harness for JSON-RPC 2.0 HTTP servers.
#[derive(Parser, Debug)]
#[command(name = "rpc-certify", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "RPC_CERTIFY_COLOR")]
    pub color: ColorChoice,

    /// Log output format (logs go to stderr).
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the conformance matrix against a server.
    Run(RunArgs),

    /// Check fixture files without contacting a server.
    Validate(ValidateArgs),

    /// Print the cases a fixture file expands to.
    List(ListArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML fixture file.
    #[arg(short, long, env = "RPC_CERTIFY_FIXTURES")]
    pub fixtures: PathBuf,

    /// Host of the server-under-test (port 8545 is fixed).
    #[arg(short, long, env = ENDPOINT_ENV, default_value = DEFAULT_HOST)]
    pub endpoint: String,

    /// Only generate these mutation strategies (repeatable).
    #[arg(short, long = "strategy", value_name = "STRATEGY", conflicts_with = "canonical_only")]
    pub strategies: Vec<Mutation>,

    /// Skip all mutation strategies.
    #[arg(long)]
    pub canonical_only: bool,

    /// Only run these fixtures, by scenario name (repeatable).
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Maximum number of requests in flight.
    #[arg(short, long, default_value_t = 1, env = "RPC_CERTIFY_JOBS")]
    pub jobs: usize,

    /// Per-request timeout in seconds (transport default when unset).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Write a JSONL event stream to this file.
    #[arg(long, value_name = "PATH")]
    pub events_file: Option<PathBuf>,
}

// ============================================================================
// Validate / List
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Fixture files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the YAML fixture file.
    #[arg(short, long, env = "RPC_CERTIFY_FIXTURES")]
    pub fixtures: PathBuf,

    /// Only list these mutation strategies (repeatable).
    #[arg(short, long = "strategy", value_name = "STRATEGY", conflicts_with = "canonical_only")]
    pub strategies: Vec<Mutation>,

    /// Skip all mutation strategies.
    #[arg(long)]
    pub canonical_only: bool,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Output format for reports and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

/// Resolves the strategy flags into the list of mutations to generate.
#[must_use]
pub fn selected_mutations(strategies: &[Mutation], canonical_only: bool) -> Vec<Mutation> {
    if canonical_only {
        Vec::new()
    } else if strategies.is_empty() {
        Mutation::ALL.to_vec()
    } else {
        strategies.to_vec()
    }
}

// ============================================================================
// Tests
// ============================================================================
