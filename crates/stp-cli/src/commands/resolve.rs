//! Live resolution against the hosted backend.

use std::sync::Arc;

use stp_gate::{AccessGate, RoleRequirement};
use stp_model::SessionContext;
use stp_session::HostedBackend;

use crate::cli::ResolveArgs;
use crate::config::OutputFormat;
use crate::output::{info, warning};
use crate::CliConfig;

use super::{print_decision, DecisionDisplay};

/// Runs `stp resolve`.
pub async fn run_resolve(
    args: &ResolveArgs,
    config: &CliConfig,
    backend_url: Option<&str>,
    anon_key: Option<&str>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let backend_config = config.backend(backend_url, anon_key)?;
    if backend_config.anon_key.is_empty() {
        warning("No anon key configured; the backend may reject requests");
    }
    if format == OutputFormat::Table {
        info(&format!("Resolving against {}...", backend_config.base_url()));
    }

    tracing::debug!(backend = %backend_config.base_url(), allow = ?args.allow, "resolving token");
    let backend = Arc::new(HostedBackend::new(backend_config)?);
    let gate = AccessGate::new(backend.clone(), backend);

    let decision = resolve(&gate, args).await;
    print_decision(&decision, format)
}

/// Resolves the token in `args` through the gate.
pub async fn resolve(gate: &AccessGate, args: &ResolveArgs) -> DecisionDisplay {
    let allowed: RoleRequirement = args.allow.iter().map(String::as_str).collect();
    let mut ctx = SessionContext::with_token(&args.token);
    if let Some(path) = &args.path {
        ctx = ctx.at_path(path);
    }

    let resolution = gate.resolve(&ctx, &allowed).await;
    DecisionDisplay::new(resolution.state, resolution.profile.as_ref(), &allowed)
}
