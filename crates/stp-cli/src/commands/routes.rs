//! Routing table.

use serde::Serialize;
use stp_gate::{landing_path, ADMIN_PATH, LOGIN_PATH, SUPER_ADMIN_EMAIL};
use stp_model::Role;
use tabled::Tabled;

use crate::config::OutputFormat;
use crate::output::output;

/// One row of the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct RouteDisplay {
    /// Who the row applies to.
    #[tabled(rename = "Caller")]
    pub caller: String,
    /// Where they land.
    #[tabled(rename = "Redirect")]
    pub redirect: &'static str,
}

/// Builds the routing table.
#[must_use]
pub fn routes() -> Vec<RouteDisplay> {
    let mut rows: Vec<RouteDisplay> = [Role::Admin, Role::Customer, Role::Technician]
        .iter()
        .map(|role| RouteDisplay {
            caller: role.to_string(),
            redirect: landing_path(role),
        })
        .collect();

    rows.push(RouteDisplay {
        caller: "(any other role)".to_string(),
        redirect: landing_path(&Role::Other(String::new())),
    });
    rows.push(RouteDisplay {
        caller: format!("{} / {}", Role::SuperAdmin, SUPER_ADMIN_EMAIL),
        redirect: ADMIN_PATH,
    });
    rows.push(RouteDisplay {
        caller: "(no session or profile)".to_string(),
        redirect: LOGIN_PATH,
    });
    rows
}

/// Runs `stp routes`.
pub fn run_routes(format: OutputFormat) -> crate::CliResult<()> {
    output(&routes(), format)
}
