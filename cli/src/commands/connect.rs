//! `pusher connect` — join the robot network without building.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy::{self, NetworkPorts, RunOptions};
use crate::output::{TerminalReporter, json};

/// Run the connect command.
///
/// # Errors
///
/// Returns an error if no profile is configured or the host cannot be
/// placed on the robot subnet.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.settings()?;
    let wifi = app.wifi(&settings);
    let associator = app.associator(&wifi);
    let reporter = TerminalReporter::new(&app.output);

    let outcome = deploy::connect(
        &app.store,
        NetworkPorts {
            probe: &wifi,
            associator: &associator,
        },
        RunOptions {
            reporter: &reporter,
            settings: &settings,
            cancel: &app.cancel,
        },
    )
    .await?;
    reporter.finish();

    if app.is_json() {
        json::print(&serde_json::json!({ "address": outcome.address() }))?;
    }
    Ok(ExitCode::SUCCESS)
}
