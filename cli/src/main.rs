//! Pusher CLI - build and deploy FTC robot code over the robot's Wi-Fi

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use pusher_cli::cli::Cli;
use pusher_cli::domain::Cancelled;
use pusher_cli::output::json;

/// Conventional exit status for SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_errors = cli.json;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            on_interrupt.cancel();
        }
    });

    match cli.run(cancel).await {
        Ok(code) => code,
        Err(e) => {
            let interrupted = e.chain().any(|c| c.downcast_ref::<Cancelled>().is_some());
            let message = format!("{e:#}");
            let rendered = if json_errors {
                let kind = if interrupted { "interrupted" } else { "error" };
                json::format_error(&message, kind).ok()
            } else {
                None
            };
            eprintln!("{}", rendered.unwrap_or_else(|| format!("Error: {message}")));
            if interrupted {
                ExitCode::from(EXIT_INTERRUPTED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
