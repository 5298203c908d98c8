//! `pusher disconnect` — drop the adb session.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy;
use crate::output::TerminalReporter;

/// Run the disconnect command.
///
/// # Errors
///
/// Returns an error if adb is missing or the disconnect call fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.settings()?;
    let bridge = app.bridge(&settings);
    let reporter = TerminalReporter::new(&app.output);
    deploy::disconnect(&bridge, &reporter).await?;
    Ok(ExitCode::SUCCESS)
}
