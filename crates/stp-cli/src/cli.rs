//! CLI argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// STP CLI - operator tool for the STP portal access gate.
#[derive(Debug, Parser)]
#[command(name = "stp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Hosted backend URL (overrides config).
    #[arg(long, env = "STP_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Hosted backend public API key (overrides config).
    #[arg(long, env = "STP_BACKEND_ANON_KEY", global = true, hide_env_values = true)]
    pub anon_key: Option<String>,

    /// Output format (overrides config).
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate an access decision offline.
    Check(CheckArgs),

    /// Resolve a token against the hosted backend and decide access.
    Resolve(ResolveArgs),

    /// Print the landing table and login target.
    Routes,

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `stp check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Role label on the caller's profile.
    #[arg(long, default_value = "Technician")]
    pub role: String,

    /// Email on the caller's profile.
    #[arg(long, default_value = "user@example.com")]
    pub email: String,

    /// Role allowed into the region (repeatable).
    #[arg(short, long = "allow")]
    pub allow: Vec<String>,

    /// Evaluate as a caller without a session.
    #[arg(long)]
    pub no_session: bool,

    /// Evaluate as a caller whose session has no profile.
    #[arg(long, conflicts_with = "no_session")]
    pub no_profile: bool,
}

/// Arguments for `stp resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Access token issued by the hosted auth service.
    #[arg(long, env = "STP_ACCESS_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Role allowed into the region (repeatable).
    #[arg(short, long = "allow")]
    pub allow: Vec<String>,

    /// Path being entered, recorded in the access event.
    #[arg(long)]
    pub path: Option<String>,
}

/// Config commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Initialize configuration interactively.
    Init,
}
