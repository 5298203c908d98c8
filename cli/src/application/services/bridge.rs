//! Bridge Connector — the adb session lifecycle.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! adb reports most outcomes as text with exit code 0, so every response is
//! classified by token matching on the combined output.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{CommandRunner, DeviceBridge};
use crate::application::services::wait::{check, pause};
use crate::domain::bridge::{combined_output, devices_lists, install_failure, is_connect_success};
use crate::domain::{BridgeError, RetryPolicy};

const ADB: &str = "adb";

/// `adb install` pushes the whole APK over Wi-Fi.
const INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// [`DeviceBridge`] backed by the `adb` executable.
pub struct BridgeConnector<R> {
    runner: R,
    address: String,
    retry: RetryPolicy,
}

impl<R: CommandRunner> BridgeConnector<R> {
    #[must_use]
    pub fn new(runner: R, address: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            runner,
            address: address.into(),
            retry,
        }
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> DeviceBridge for BridgeConnector<R> {
    fn address(&self) -> &str {
        &self.address
    }

    async fn connect(&self, cancel: &CancellationToken) -> Result<()> {
        let max = self.retry.max_attempts();
        let mut last_cause = String::from("no attempt made");

        for attempt in self.retry.attempts() {
            check(cancel)?;
            match self.runner.run(ADB, &["connect", &self.address]).await {
                Ok(out) => {
                    let text = combined_output(&out.stdout, &out.stderr);
                    if out.status.success() && is_connect_success(&text) {
                        tracing::debug!(attempt, address = %self.address, "adb connected");
                        return Ok(());
                    }
                    last_cause = if out.status.success() {
                        format!("unexpected response: {text}")
                    } else {
                        format!(
                            "adb exited with code {}: {text}",
                            out.status.code().unwrap_or(-1)
                        )
                    };
                }
                Err(e) if is_program_missing(&e) => return Err(BridgeError::ToolMissing.into()),
                Err(e) => last_cause = format!("{e:#}"),
            }
            tracing::debug!(attempt, max, cause = %last_cause, "adb connect attempt failed");
            if self.retry.has_next(attempt) {
                pause(self.retry.backoff(), cancel).await?;
            }
        }

        Err(BridgeError::ConnectFailed {
            attempts: max,
            address: self.address.clone(),
            last_cause,
        }
        .into())
    }

    async fn disconnect(&self) -> Result<()> {
        let out = match self.runner.run(ADB, &["disconnect"]).await {
            Ok(out) => out,
            Err(e) if is_program_missing(&e) => return Err(BridgeError::ToolMissing.into()),
            Err(e) => return Err(BridgeError::DisconnectFailed(format!("{e:#}")).into()),
        };
        if !out.status.success() {
            let text = combined_output(&out.stdout, &out.stderr);
            return Err(BridgeError::DisconnectFailed(text).into());
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        match self.runner.run(ADB, &["devices"]).await {
            Ok(out) if out.status.success() => {
                devices_lists(&String::from_utf8_lossy(&out.stdout), &self.address)
            }
            _ => false,
        }
    }

    async fn install(&self, apk: &Path) -> Result<()> {
        let apk_arg = apk.to_string_lossy();
        let out = self
            .runner
            .run_with_timeout(
                ADB,
                &["-s", &self.address, "install", "-r", &apk_arg],
                INSTALL_TIMEOUT,
            )
            .await
            .map_err(|e| {
                if is_program_missing(&e) {
                    BridgeError::ToolMissing.into()
                } else {
                    e
                }
            })
            .with_context(|| format!("installing {}", apk.display()))?;
        let text = combined_output(&out.stdout, &out.stderr);
        if let Some(failure) = install_failure(&text) {
            return Err(BridgeError::InstallFailed(failure).into());
        }
        if !out.status.success() {
            return Err(BridgeError::InstallFailed(text).into());
        }
        Ok(())
    }
}

/// Whether `err` was caused by the program not existing on `PATH`.
pub(crate) fn is_program_missing(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
    })
}
