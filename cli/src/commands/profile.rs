//! `pusher profile` — manage robot Wi-Fi profiles.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ProfileStore;
use crate::application::services::profile_service;
use crate::domain::ProfileError;
use crate::output::json;

/// Profile subcommands.
#[derive(Subcommand)]
pub enum ProfileCommand {
    /// List profiles; the default is marked with `*`
    List,
    /// Add a profile (prompts for anything not given)
    Add {
        /// Profile name
        name: Option<String>,
        /// Robot Wi-Fi network name
        #[arg(long)]
        ssid: Option<String>,
        /// Robot Wi-Fi password
        #[arg(long)]
        password: Option<String>,
    },
    /// Change a profile's network name or password
    Edit {
        /// Profile name
        name: String,
        /// New network name
        #[arg(long)]
        ssid: Option<String>,
        /// New password
        #[arg(long)]
        password: Option<String>,
    },
    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

/// Run a profile subcommand.
///
/// # Errors
///
/// Returns an error if the profile does not exist, a prompt fails, or the
/// configuration cannot be saved.
pub fn run(app: &AppContext, cmd: ProfileCommand) -> Result<ExitCode> {
    match cmd {
        ProfileCommand::List => list(app),
        ProfileCommand::Add {
            name,
            ssid,
            password,
        } => add(app, name, ssid, password),
        ProfileCommand::Edit {
            name,
            ssid,
            password,
        } => edit(app, &name, ssid, password),
        ProfileCommand::Use { name } => {
            profile_service::use_profile(&app.store, &name)?;
            app.output.success(&format!("Default profile is now '{name}'"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list(app: &AppContext) -> Result<ExitCode> {
    let config = profile_service::load_config(&app.store)?;
    if app.is_json() {
        // Passwords stay out of machine output.
        let profiles: Vec<_> = config
            .profiles
            .iter()
            .map(|(name, entry)| {
                serde_json::json!({
                    "name": name,
                    "ssid": entry.ssid,
                    "default": *name == config.default_profile,
                })
            })
            .collect();
        json::print(&serde_json::json!({ "profiles": profiles }))?;
    } else {
        app.renderer().render_profiles(&config, app.store.path());
    }
    Ok(ExitCode::SUCCESS)
}

fn add(
    app: &AppContext,
    name: Option<String>,
    ssid: Option<String>,
    password: Option<String>,
) -> Result<ExitCode> {
    let name = match name {
        Some(name) => name,
        None => app.prompt_text("Profile name", None)?,
    };
    if name.trim().is_empty() {
        return Err(ProfileError::EmptyName.into());
    }
    let ssid = match ssid {
        Some(ssid) => ssid,
        None => app.prompt_text("Robot Wi-Fi name", None)?,
    };
    let password = match password {
        Some(password) => password,
        None if app.non_interactive => String::new(),
        None => app.prompt_secret("Robot Wi-Fi password")?,
    };

    let is_default = profile_service::add_profile(&app.store, &name, &ssid, &password)?;
    app.output.success(&format!("Saved profile '{}'", name.trim()));
    if is_default {
        app.output.info("This is now the default profile");
    }
    Ok(ExitCode::SUCCESS)
}

fn edit(
    app: &AppContext,
    name: &str,
    ssid: Option<String>,
    password: Option<String>,
) -> Result<ExitCode> {
    let config = profile_service::load_config(&app.store)?;
    let current = config
        .profiles
        .get(name)
        .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

    // With no flags, prompt for both; blank answers keep the stored values.
    let (ssid, password) = if ssid.is_none() && password.is_none() && !app.non_interactive {
        let ssid = app.prompt_text("Robot Wi-Fi name", Some(&current.ssid))?;
        let password = app.prompt_secret("Robot Wi-Fi password (blank keeps current)")?;
        (Some(ssid), Some(password))
    } else {
        (ssid, password)
    };

    profile_service::edit_profile(&app.store, name, ssid.as_deref(), password.as_deref())?;
    app.output.success(&format!("Updated profile '{name}'"));
    Ok(ExitCode::SUCCESS)
}
