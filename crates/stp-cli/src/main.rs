//! # STP CLI
//!
//! Command-line tool for operating the STP portal access gate.

#![forbid(unsafe_code)]

use clap::Parser;
use stp_cli::{
    cli::{Cli, Command},
    commands::{run_check, run_config, run_resolve, run_routes},
    config::CliConfig,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".into()),
            ))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Load configuration
    let mut config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {e}"));
            std::process::exit(1);
        }
    };
    let format = cli.output.unwrap_or(config.output_format);

    // Execute command
    let result = match &cli.command {
        Command::Check(args) => run_check(args, format),
        Command::Resolve(args) => {
            run_resolve(
                args,
                &config,
                cli.backend_url.as_deref(),
                cli.anon_key.as_deref(),
                format,
            )
            .await
        }
        Command::Routes => run_routes(format),
        Command::Config(cmd) => run_config(cmd, &mut config),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
