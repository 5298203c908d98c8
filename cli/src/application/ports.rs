//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::domain::{BuildCommand, BuildMode, BuildReport, PusherConfig, StreamKind};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Wi-Fi Ports ───────────────────────────────────────────────────────────────

/// Read-only view of the host's Wi-Fi state for one interface.
///
/// An empty string means "not associated" / "no address". Errors are
/// reserved for transport failures such as a missing interface.
#[allow(async_fn_in_trait)]
pub trait NetworkStateProbe {
    /// SSID the interface is associated with, or empty.
    async fn current_network_name(&self) -> Result<String>;
    /// IPv4 address assigned to the interface, or empty.
    async fn interface_ipv4(&self) -> Result<String>;
}

/// One platform mechanism for joining a network. Tried in order by the
/// associator; each strategy makes exactly one attempt.
#[allow(async_fn_in_trait)]
pub trait JoinStrategy {
    /// Short label used in combined failure messages.
    fn name(&self) -> &str;
    /// Attempt association once.
    async fn join(&self, ssid: &str, secret: &str) -> Result<()>;
}

/// Joins a named network. Reports association only, never reachability.
#[allow(async_fn_in_trait)]
pub trait NetworkAssociator {
    /// Single association attempt; no internal retry.
    async fn associate(&self, ssid: &str, secret: &str) -> Result<()>;
}

/// Wi-Fi radio power control, used as a last resort when restoring networks.
#[allow(async_fn_in_trait)]
pub trait RadioControl {
    /// Turn the radio off and back on.
    async fn power_cycle(&self) -> Result<()>;
}

// ── Device Bridge Port ────────────────────────────────────────────────────────

/// The adb session to the robot controller.
#[allow(async_fn_in_trait)]
pub trait DeviceBridge {
    /// `host:port` of the target device.
    fn address(&self) -> &str;
    /// Connect with the bridge's own bounded retry.
    async fn connect(&self, cancel: &CancellationToken) -> Result<()>;
    /// Best-effort single disconnect call.
    async fn disconnect(&self) -> Result<()>;
    /// Cheap health check; not authoritative network state.
    async fn is_connected(&self) -> bool;
    /// Install (or replace) an APK on the connected device.
    async fn install(&self, apk: &Path) -> Result<()>;
}

// ── Build Ports ───────────────────────────────────────────────────────────────

/// Receives build output lines as they are produced.
///
/// Lines from one channel arrive in order; no ordering holds across channels.
pub trait OutputSink {
    fn line(&self, stream: StreamKind, line: &str);
}

/// Runs an external build to completion while relaying its output.
#[allow(async_fn_in_trait)]
pub trait BuildRunner {
    /// Run `command`, stream both channels into `sink`, and classify the exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started, exits non-zero,
    /// or `cancel` fires first.
    async fn run(
        &self,
        command: &BuildCommand,
        sink: &impl OutputSink,
        cancel: &CancellationToken,
    ) -> Result<BuildReport>;
}

/// The Gradle project being deployed.
pub trait BuildProject {
    /// Directory containing the Gradle wrapper.
    ///
    /// # Errors
    ///
    /// Returns an error if no wrapper is found.
    fn root(&self) -> Result<PathBuf>;
    /// Construct the build invocation for `mode` with `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns an error if the wrapper is missing or cannot be made executable.
    fn build_command(&self, mode: BuildMode, threads: u32) -> Result<BuildCommand>;
    /// Locate the installable artifact produced by the last build.
    ///
    /// # Errors
    ///
    /// Returns an error if no APK exists in the known output paths.
    fn locate_artifact(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Profile Store Port ────────────────────────────────────────────────────────

/// Abstracts configuration persistence. Reads and rewrites the whole file.
pub trait ProfileStore {
    /// Load the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<PusherConfig>;
    /// Persist the full configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &PusherConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> &Path;
}
