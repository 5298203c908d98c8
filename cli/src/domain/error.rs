//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Profile errors ────────────────────────────────────────────────────────────

/// Errors related to robot profiles in the profile store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("No robot profiles configured. Run 'pusher profile add' to create one.")]
    NoProfiles,

    #[error("No default profile set. Run 'pusher profile use <name>' to pick one.")]
    NoDefault,

    #[error("Profile '{0}' not found. Run 'pusher profile list' to see configured profiles.")]
    NotFound(String),

    #[error("Profile name cannot be empty.")]
    EmptyName,

    #[error("Profile '{0}' has an empty Wi-Fi name. Run 'pusher profile edit {0} --ssid <name>'.")]
    EmptySsid(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid thread count: {0} (must be a positive integer)")]
    InvalidThreads(String),

    #[error("Invalid subnet prefix '{0}': expected three dotted octets, e.g. 192.168.43")]
    InvalidSubnetPrefix(String),
}

// ── Network errors ────────────────────────────────────────────────────────────

/// Errors raised while bringing the host onto the robot network.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Wi-Fi control is only supported on macOS and Linux")]
    UnsupportedPlatform,

    #[error("Network interface '{interface}' is unavailable: {detail}")]
    InterfaceUnavailable { interface: String, detail: String },

    #[error("Could not join '{ssid}': {detail}")]
    AssociationFailed { ssid: String, detail: String },

    #[error(
        "Wi-Fi address {} is not in robot subnet {prefix}.x after {attempts} attempt(s): {last_cause}",
        display_address(.address)
    )]
    NotOnRobotSubnet {
        address: String,
        prefix: String,
        attempts: u32,
        last_cause: String,
    },

    #[error(
        "Left robot subnet {prefix}.x before the build started (address {})",
        display_address(.address)
    )]
    LostRobotNetwork { address: String, prefix: String },
}

fn display_address(address: &str) -> &str {
    if address.is_empty() { "<none>" } else { address }
}

// ── Bridge errors ─────────────────────────────────────────────────────────────

/// Errors raised by the adb bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("adb not found - please install Android SDK Platform-Tools")]
    ToolMissing,

    #[error(
        "ADB connection failed after {attempts} attempts: {last_cause}\n\n\
         Troubleshooting:\n  \
         1. Ensure you're connected to the robot's Wi-Fi\n  \
         2. Enable ADB debugging on the Robot Controller\n  \
         3. Try 'adb connect {address}' manually\n  \
         4. Check the robot app is running"
    )]
    ConnectFailed {
        attempts: u32,
        address: String,
        last_cause: String,
    },

    #[error("adb disconnect failed: {0}")]
    DisconnectFailed(String),

    #[error("adb install failed: {0}")]
    InstallFailed(String),
}

// ── Build errors ──────────────────────────────────────────────────────────────

/// Errors raised while locating, running, or collecting the Gradle build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("gradlew not found in {0} or its parent directories")]
    WrapperNotFound(String),

    #[error("failed to start {program}: {detail}")]
    Spawn { program: String, detail: String },

    #[error("{program} exited with {}{}", exit_label(.code), tail_block(.tail))]
    Failed {
        program: String,
        code: Option<i32>,
        tail: Vec<String>,
    },

    #[error("debug APK not found in build outputs under {0}")]
    ArtifactNotFound(String),
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
}

fn tail_block(tail: &[String]) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!("\n\nLast output:\n  {}", tail.join("\n  "))
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

/// The operator interrupted a running operation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Interrupted")]
pub struct Cancelled;
