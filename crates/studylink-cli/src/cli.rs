//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Studylink CLI - Manage study partner requests and partnerships.
#[derive(Debug, Parser)]
#[command(name = "studylink")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database file (overrides the configured store path)
    #[arg(long, env = "STUDYLINK_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Actor to act as
    #[arg(long = "as", value_name = "ACTOR", env = "STUDYLINK_ACTOR", global = true)]
    pub actor: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register actors so they can send and receive requests
    Register(RegisterArgs),

    /// Send a study request
    Send(SendArgs),

    /// Approve or decline a request you received
    Respond(RespondArgs),

    /// Cancel a request you sent
    Cancel(RequestArgs),

    /// Show a single request
    Show(RequestArgs),

    /// List pending requests you received
    Incoming(ListArgs),

    /// List pending requests you sent
    Outgoing(ListArgs),

    /// List every request you are part of
    History(ListArgs),

    /// List your study partners
    Partners,

    /// Remove a study partner
    Remove(RemoveArgs),
}

/// Arguments for the register command.
#[derive(Debug, Parser)]
pub struct RegisterArgs {
    /// Actors to register (defaults to the --as actor)
    pub actors: Vec<String>,
}

/// Arguments for the send command.
#[derive(Debug, Parser)]
pub struct SendArgs {
    /// Receiver of the request
    pub to: String,
}

/// Arguments for the respond command.
#[derive(Debug, Parser)]
pub struct RespondArgs {
    /// Request ID
    pub id: String,

    /// Decision (approve or decline)
    pub decision: String,
}

/// Arguments for commands that take a request ID.
#[derive(Debug, Parser)]
pub struct RequestArgs {
    /// Request ID
    pub id: String,
}

/// Arguments for the listing commands.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the remove command.
#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Partner to remove
    pub partner: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
