//! `pusher prepare` — online build to warm the Gradle cache.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy::{self, BuildPorts};
use crate::infra::build_supervisor::BuildSupervisor;
use crate::infra::gradle::GradleProject;
use crate::output::{TerminalReporter, TerminalSink, json};

/// Run the prepare command.
///
/// # Errors
///
/// Returns an error if the wrapper is missing or the build fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let settings = app.settings()?;
    let project = GradleProject::from_current_dir()?;
    let supervisor = BuildSupervisor::default();
    let reporter = TerminalReporter::new(&app.output);
    let sink = TerminalSink::new(&reporter, &app.output);

    let result = deploy::prepare(
        BuildPorts {
            project: &project,
            runner: &supervisor,
            sink: &sink,
        },
        &reporter,
        settings.threads,
        &app.cancel,
    )
    .await;
    sink.close();
    reporter.finish();
    let report = result?;

    if app.is_json() {
        json::print(&serde_json::json!({ "exit_code": report.exit_code }))?;
    }
    Ok(ExitCode::SUCCESS)
}
