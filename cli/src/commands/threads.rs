//! `pusher threads` — Gradle worker count.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::profile_service;
use crate::output::json;

/// Arguments for the threads command.
#[derive(Args)]
pub struct ThreadsArgs {
    /// Defaults to `show`
    #[command(subcommand)]
    pub action: Option<ThreadsCommand>,
}

/// Threads subcommands.
#[derive(Subcommand)]
pub enum ThreadsCommand {
    /// Show the configured worker count
    Show,
    /// Set the worker count
    Set {
        /// Positive integer
        count: String,
    },
    /// Go back to the default worker count
    Reset,
}

/// Run the threads command.
///
/// # Errors
///
/// Returns an error if the count is not a positive integer or the
/// configuration cannot be saved.
pub fn run(app: &AppContext, args: ThreadsArgs) -> Result<ExitCode> {
    let threads = match args.action.unwrap_or(ThreadsCommand::Show) {
        ThreadsCommand::Show => {
            let threads = profile_service::load_config(&app.store)?.threads();
            app.output.kv("Threads:", &threads.to_string());
            threads
        }
        ThreadsCommand::Set { count } => {
            let threads = profile_service::set_threads(&app.store, &count)?;
            app.output
                .success(&format!("Gradle will use {threads} worker(s)"));
            threads
        }
        ThreadsCommand::Reset => {
            let threads = profile_service::reset_threads(&app.store)?;
            app.output
                .success(&format!("Thread count reset to default ({threads})"));
            threads
        }
    };
    if app.is_json() {
        json::print(&serde_json::json!({ "threads": threads }))?;
    }
    Ok(ExitCode::SUCCESS)
}
