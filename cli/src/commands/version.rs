//! Version command

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let version = env!("CARGO_PKG_VERSION");
    if app.is_json() {
        crate::output::json::print(&serde_json::json!({ "version": version }))?;
    } else {
        app.renderer().render_version(version);
    }
    Ok(ExitCode::SUCCESS)
}
