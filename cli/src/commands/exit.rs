//! `pusher exit` — leave the robot and go back to the previous network.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy::{self, NetworkPorts, RestoreOutcome};
use crate::output::{TerminalReporter, json};

/// Run the exit command. Every step is best-effort, so only settings
/// errors can fail it.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.settings()?;
    let wifi = app.wifi(&settings);
    let associator = app.restore_associator(&wifi);
    let bridge = app.bridge(&settings);
    let reporter = TerminalReporter::new(&app.output);

    let report = deploy::exit(
        &app.store,
        NetworkPorts {
            probe: &wifi,
            associator: &associator,
        },
        &wifi,
        &bridge,
        &reporter,
    )
    .await;
    reporter.finish();

    let (restore, network) = match &report.restore {
        RestoreOutcome::NothingToRestore => {
            app.output.info("No saved Wi-Fi network to restore");
            ("none", None)
        }
        RestoreOutcome::AlreadyConnected(ssid) => {
            app.output.success(&format!("Already on {ssid}"));
            ("already-connected", Some(ssid))
        }
        RestoreOutcome::Restored(ssid) => {
            app.output.success(&format!("Reconnected to {ssid}"));
            ("restored", Some(ssid))
        }
        RestoreOutcome::PowerCycled(ssid) => {
            app.output
                .success(&format!("Wi-Fi restarted; it should rejoin {ssid} shortly"));
            ("power-cycled", Some(ssid))
        }
        RestoreOutcome::Failed(ssid) => ("failed", Some(ssid)),
    };

    if app.is_json() {
        json::print(&serde_json::json!({
            "adb_disconnected": report.disconnected,
            "restore": restore,
            "network": network,
        }))?;
    }
    Ok(ExitCode::SUCCESS)
}
