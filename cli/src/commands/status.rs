//! `pusher status` — current Wi-Fi and adb state.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy;
use crate::output::json;

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the Wi-Fi interface cannot be queried.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.settings()?;
    let wifi = app.wifi(&settings);
    let bridge = app.bridge(&settings);

    let report = deploy::status(&wifi, &bridge, &settings).await?;
    if app.is_json() {
        json::print(&report)?;
    } else {
        app.renderer().render_status(&report);
    }
    Ok(ExitCode::SUCCESS)
}
