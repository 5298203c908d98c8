//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Build and deploy FTC robot code over the robot's Wi-Fi
#[derive(Parser)]
#[command(name = "pusher", version, propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip prompts and accept defaults (also set by CI / PUSHER_YES)
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Defaults to `push` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Join the robot Wi-Fi, build offline, and install over adb
    Push,

    /// Join the robot Wi-Fi without building
    Connect,

    /// Drop the adb session to the robot
    #[command(visible_alias = "dc")]
    Disconnect,

    /// Disconnect adb and return to the previous Wi-Fi network
    Exit,

    /// Build online once so later offline builds have every dependency
    Prepare,

    /// Show Wi-Fi and adb state
    Status,

    /// Manage robot Wi-Fi profiles
    #[command(subcommand)]
    Profile(commands::profile::ProfileCommand),

    /// Show or change the Gradle worker count
    Threads(commands::threads::ThreadsArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, cancel: CancellationToken) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            yes,
            command,
        } = self;

        let app = AppContext::new(
            &AppFlags {
                output: OutputFlags {
                    no_color,
                    quiet,
                    json,
                },
                behaviour: BehaviourFlags { yes },
            },
            cancel,
        )?;

        match command.unwrap_or(Command::Push) {
            Command::Push => commands::push::run(&app).await,
            Command::Connect => commands::connect::run(&app).await,
            Command::Disconnect => commands::disconnect::run(&app).await,
            Command::Exit => commands::exit::run(&app).await,
            Command::Prepare => commands::prepare::run(&app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Profile(cmd) => commands::profile::run(&app, cmd),
            Command::Threads(args) => commands::threads::run(&app, args),
            Command::Version => commands::version::run(&app),
        }
    }
}
