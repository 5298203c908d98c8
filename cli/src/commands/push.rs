//! `pusher push` — the full deploy: Wi-Fi, adb, offline build, install.

use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::ProfileStore;
use crate::application::services::deploy::{self, BuildPorts, NetworkPorts, RunOptions};
use crate::application::services::profile_service;
use crate::domain::ProfileError;
use crate::domain::config::FIRST_RUN_PROFILE;
use crate::infra::build_supervisor::BuildSupervisor;
use crate::infra::gradle::GradleProject;
use crate::output::{TerminalReporter, TerminalSink, json};

#[derive(Serialize)]
struct PushSummary {
    address: String,
    apk: String,
    exit_code: Option<i32>,
}

/// Run the push command.
///
/// # Errors
///
/// Returns an error if any deploy stage fails. Stages after the failure are
/// not attempted.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    first_run_setup(app)?;

    let settings = app.settings()?;
    let wifi = app.wifi(&settings);
    let associator = app.associator(&wifi);
    let bridge = app.bridge(&settings);
    let project = GradleProject::from_current_dir()?;
    let supervisor = BuildSupervisor::default();
    let reporter = TerminalReporter::new(&app.output);
    let sink = TerminalSink::new(&reporter, &app.output);

    let result = deploy::push(
        &app.store,
        NetworkPorts {
            probe: &wifi,
            associator: &associator,
        },
        &bridge,
        BuildPorts {
            project: &project,
            runner: &supervisor,
            sink: &sink,
        },
        RunOptions {
            reporter: &reporter,
            settings: &settings,
            cancel: &app.cancel,
        },
    )
    .await;
    sink.close();
    reporter.finish();
    let outcome = result?;

    if app.is_json() {
        json::print(&PushSummary {
            address: outcome.network.address().to_string(),
            apk: outcome.apk.display().to_string(),
            exit_code: outcome.build.exit_code,
        })?;
    } else {
        app.output.success("Deployed to robot");
    }
    Ok(ExitCode::SUCCESS)
}

/// Create the first profile interactively when none exist.
fn first_run_setup(app: &AppContext) -> Result<()> {
    if profile_service::load_config(&app.store)?.has_profiles() {
        return Ok(());
    }
    if app.non_interactive {
        return Err(ProfileError::NoProfiles.into());
    }
    app.output.header("First-time setup");
    app.output.info("Enter your robot's Wi-Fi credentials.");
    let ssid = app.prompt_text("Robot Wi-Fi name", None)?;
    let password = app.prompt_secret("Robot Wi-Fi password")?;
    profile_service::add_profile(&app.store, FIRST_RUN_PROFILE, &ssid, &password)?;
    app.output.success(&format!(
        "Saved profile '{FIRST_RUN_PROFILE}' to {}",
        app.store.path().display()
    ));
    Ok(())
}
