//! Offline decision evaluation.

use stp_gate::{decide, RoleRequirement};
use stp_model::{Profile, Session};
use uuid::Uuid;

use crate::cli::CheckArgs;
use crate::config::OutputFormat;

use super::{print_decision, DecisionDisplay};

/// Runs `stp check`.
pub fn run_check(args: &CheckArgs, format: OutputFormat) -> crate::CliResult<()> {
    print_decision(&evaluate(args), format)
}

/// Evaluates the decision described by the arguments.
#[must_use]
pub fn evaluate(args: &CheckArgs) -> DecisionDisplay {
    let allowed: RoleRequirement = args.allow.iter().map(String::as_str).collect();

    let user_id = Uuid::nil();
    let session = (!args.no_session).then(|| Session::new(user_id, &args.email, "offline"));
    let profile = (!args.no_session && !args.no_profile)
        .then(|| Profile::new(user_id, args.role.as_str(), &args.email));

    let state = decide(session.as_ref(), profile.as_ref(), &allowed);
    DecisionDisplay::new(state, profile.as_ref(), &allowed)
}
