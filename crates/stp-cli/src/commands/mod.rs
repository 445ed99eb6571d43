//! Command implementations.

pub mod check;
pub mod config;
pub mod resolve;
pub mod routes;

pub use check::run_check;
pub use config::run_config;
pub use resolve::run_resolve;
pub use routes::run_routes;

use colored::Colorize;
use serde::Serialize;
use stp_gate::{is_super_privileged, AccessState, RoleRequirement};
use stp_model::Profile;

use crate::config::OutputFormat;
use crate::output::output_single;

/// An access decision for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionDisplay {
    /// Outcome name.
    pub outcome: &'static str,
    /// Where the caller is sent, if anywhere.
    pub redirect: Option<&'static str>,
    /// Caller email, if a profile was found.
    pub email: Option<String>,
    /// Caller role, if a profile was found.
    pub role: Option<String>,
    /// Whether the caller bypasses role checks.
    pub super_privileged: bool,
    /// Roles allowed into the region.
    pub allowed: Vec<String>,
}

impl DecisionDisplay {
    /// Builds the display for a decision.
    #[must_use]
    pub fn new(state: AccessState, profile: Option<&Profile>, allowed: &RoleRequirement) -> Self {
        Self {
            outcome: state.name(),
            redirect: state.redirect_target(),
            email: profile.map(|p| p.email.clone()),
            role: profile.map(|p| p.role.to_string()),
            super_privileged: profile.is_some_and(is_super_privileged),
            allowed: allowed.roles().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Prints a decision with a colored headline.
pub fn print_decision(decision: &DecisionDisplay, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            let headline = match decision.outcome {
                "authorized" => decision.outcome.green().bold(),
                "forbidden" => decision.outcome.yellow().bold(),
                _ => decision.outcome.red().bold(),
            };
            match decision.redirect {
                Some(target) => println!("{headline} -> {target}"),
                None => println!("{headline}"),
            }
            println!();
            output_single(decision, format)
        }
        OutputFormat::Json => output_single(decision, format),
        OutputFormat::Quiet => {
            println!("{}", decision.redirect.unwrap_or(decision.outcome));
            Ok(())
        }
    }
}
