//! Deployment Workflow — sequences push, connect, disconnect, exit, prepare
//! and status.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! This is the only layer that keeps state across steps (the profile snapshot
//! and the last observed network); everything below it is stateless.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    BuildProject, BuildRunner, DeviceBridge, NetworkAssociator, NetworkStateProbe, OutputSink,
    ProfileStore, ProgressReporter, RadioControl,
};
use crate::application::services::network::{AcquireOutcome, AcquirePolicy, ensure_on_robot_network};
use crate::application::services::profile_service::save_last_network;
use crate::domain::{
    BuildMode, BuildReport, InterfaceAddress, NetworkError, NetworkProfile, Settings,
};

/// Wi-Fi collaborators shared by the network-facing workflows.
pub struct NetworkPorts<'a, P, A> {
    pub probe: &'a P,
    pub associator: &'a A,
}

/// Collaborators for a Gradle build.
pub struct BuildPorts<'a, J, X, S> {
    pub project: &'a J,
    pub runner: &'a X,
    pub sink: &'a S,
}

/// Per-invocation options threaded through every workflow.
pub struct RunOptions<'a, R> {
    pub reporter: &'a R,
    pub settings: &'a Settings,
    pub cancel: &'a CancellationToken,
}

/// Outcome of the `push` use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub network: AcquireOutcome,
    pub apk: PathBuf,
    pub build: BuildReport,
}

/// How `exit` left the host's Wi-Fi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No previous network was recorded.
    NothingToRestore,
    /// The host was already back on the recorded network.
    AlreadyConnected(String),
    /// The recorded network was re-joined.
    Restored(String),
    /// Joining failed; the radio was power-cycled so the OS can auto-join.
    PowerCycled(String),
    /// Neither joining nor the power-cycle worked.
    Failed(String),
}

/// Outcome of the best-effort `exit` use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    pub disconnected: bool,
    pub restore: RestoreOutcome,
}

/// Snapshot reported by `pusher status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub interface: String,
    pub ssid: String,
    pub address: String,
    pub subnet: String,
    pub on_robot_network: bool,
    pub bridge_address: String,
    pub bridge_connected: bool,
}

/// Record the current SSID as the network to restore later.
///
/// The robot's own SSID is never recorded. A failed save only warns.
///
/// # Errors
///
/// Returns an error if the current SSID cannot be read.
pub async fn remember_current_network(
    store: &impl ProfileStore,
    probe: &impl NetworkStateProbe,
    profile: &NetworkProfile,
    reporter: &impl ProgressReporter,
) -> Result<Option<String>> {
    let current = probe
        .current_network_name()
        .await
        .context("detecting current Wi-Fi")?;
    if current.is_empty() || current == profile.ssid {
        return Ok(None);
    }
    reporter.step(&format!("saving current Wi-Fi: {current}"));
    if let Err(e) = save_last_network(store, &current) {
        reporter.warn(&format!("failed to save Wi-Fi state: {e:#}"));
    }
    Ok(Some(current))
}

/// Join the robot network with the default profile.
///
/// # Errors
///
/// Returns an error if no default profile exists or acquisition fails.
pub async fn connect(
    store: &impl ProfileStore,
    net: NetworkPorts<'_, impl NetworkStateProbe, impl NetworkAssociator>,
    opts: RunOptions<'_, impl ProgressReporter>,
) -> Result<AcquireOutcome> {
    let profile = store.load()?.default_profile()?;
    remember_current_network(store, net.probe, &profile, opts.reporter).await?;
    acquire(&net, &profile, &opts).await
}

/// Join the robot network, connect adb, build offline and install the APK.
///
/// # Errors
///
/// Returns an error if any step fails. Nothing after a failed step runs.
pub async fn push(
    store: &impl ProfileStore,
    net: NetworkPorts<'_, impl NetworkStateProbe, impl NetworkAssociator>,
    bridge: &impl DeviceBridge,
    build: BuildPorts<'_, impl BuildProject, impl BuildRunner, impl OutputSink>,
    opts: RunOptions<'_, impl ProgressReporter>,
) -> Result<PushOutcome> {
    let reporter = opts.reporter;
    let profile = store.load()?.default_profile()?;
    remember_current_network(store, net.probe, &profile, reporter).await?;

    let network = acquire(&net, &profile, &opts).await?;

    reporter.step("connecting to robot via adb...");
    bridge.connect(opts.cancel).await?;
    reporter.success(&format!("adb connected to {}", bridge.address()));

    let command = build
        .project
        .build_command(BuildMode::Offline, opts.settings.threads)?;
    verify_still_on_robot_network(net.probe, opts.settings).await?;

    reporter.step(&format!(
        "building with {} ({} workers)...",
        command.display_name(),
        opts.settings.threads
    ));
    let report = build.runner.run(&command, build.sink, opts.cancel).await?;
    reporter.success("build finished");

    let apk = build.project.locate_artifact()?;
    reporter.step(&format!("installing {}...", apk.display()));
    bridge.install(&apk).await?;
    reporter.success("app installed on robot");

    Ok(PushOutcome {
        network,
        apk,
        build: report,
    })
}

/// Drop the adb session.
///
/// # Errors
///
/// Returns an error if `adb disconnect` fails.
pub async fn disconnect(bridge: &impl DeviceBridge, reporter: &impl ProgressReporter) -> Result<()> {
    reporter.step("disconnecting adb...");
    bridge.disconnect().await?;
    reporter.success("adb disconnected");
    Ok(())
}

/// Best-effort teardown: drop adb and return to the previous network.
///
/// Never fails; every problem becomes a warning on `reporter`.
pub async fn exit(
    store: &impl ProfileStore,
    net: NetworkPorts<'_, impl NetworkStateProbe, impl NetworkAssociator>,
    radio: &impl RadioControl,
    bridge: &impl DeviceBridge,
    reporter: &impl ProgressReporter,
) -> ExitReport {
    reporter.step("disconnecting adb...");
    let disconnected = match bridge.disconnect().await {
        Ok(()) => {
            reporter.success("adb disconnected");
            true
        }
        Err(e) => {
            reporter.warn(&format!("failed to disconnect adb: {e:#}"));
            false
        }
    };

    let last = match store.load() {
        Ok(cfg) => cfg.last_wifi,
        Err(e) => {
            reporter.warn(&format!("could not read saved Wi-Fi: {e:#}"));
            String::new()
        }
    };
    let restore = restore_network(&net, radio, reporter, last).await;
    ExitReport {
        disconnected,
        restore,
    }
}

async fn restore_network(
    net: &NetworkPorts<'_, impl NetworkStateProbe, impl NetworkAssociator>,
    radio: &impl RadioControl,
    reporter: &impl ProgressReporter,
    last: String,
) -> RestoreOutcome {
    if last.is_empty() {
        return RestoreOutcome::NothingToRestore;
    }
    if net
        .probe
        .current_network_name()
        .await
        .is_ok_and(|current| current == last)
    {
        return RestoreOutcome::AlreadyConnected(last);
    }

    reporter.step(&format!("restoring Wi-Fi connection to {last}..."));
    // The secret of a non-robot network is never stored; only networks the
    // OS already knows can be re-joined this way.
    let join_err = match net.associator.associate(&last, "").await {
        Ok(()) => return RestoreOutcome::Restored(last),
        Err(e) => e,
    };
    reporter.warn(&format!("could not rejoin {last}: {join_err:#}"));

    reporter.step("power-cycling Wi-Fi so the system can auto-join...");
    match radio.power_cycle().await {
        Ok(()) => RestoreOutcome::PowerCycled(last),
        Err(e) => {
            reporter.warn(&format!("Wi-Fi power-cycle failed: {e:#}"));
            reporter.warn(&format!("please reconnect to {last} manually"));
            RestoreOutcome::Failed(last)
        }
    }
}

/// Online build that installs over USB/adb and warms the Gradle cache.
///
/// # Errors
///
/// Returns an error if the wrapper is missing or the build fails.
pub async fn prepare(
    build: BuildPorts<'_, impl BuildProject, impl BuildRunner, impl OutputSink>,
    reporter: &impl ProgressReporter,
    threads: u32,
    cancel: &CancellationToken,
) -> Result<BuildReport> {
    let command = build.project.build_command(BuildMode::Online, threads)?;
    reporter.step(&format!(
        "preparing build cache with {} ({threads} workers)...",
        command.display_name()
    ));
    let report = build.runner.run(&command, build.sink, cancel).await?;
    reporter.success("dependencies cached; offline builds are ready");
    Ok(report)
}

/// Read-only snapshot of network and bridge state.
///
/// # Errors
///
/// Returns an error if the network probe fails.
pub async fn status(
    probe: &impl NetworkStateProbe,
    bridge: &impl DeviceBridge,
    settings: &Settings,
) -> Result<StatusReport> {
    let ssid = probe
        .current_network_name()
        .await
        .context("reading current Wi-Fi")?;
    let address = InterfaceAddress::from_probe(
        &probe
            .interface_ipv4()
            .await
            .context("reading Wi-Fi interface address")?,
    );
    Ok(StatusReport {
        on_robot_network: settings.subnet.contains(address.as_str()),
        interface: settings.interface.clone(),
        ssid,
        address: address.as_str().to_string(),
        subnet: format!("{}.x", settings.subnet.prefix()),
        bridge_address: bridge.address().to_string(),
        bridge_connected: bridge.is_connected().await,
    })
}

async fn acquire(
    net: &NetworkPorts<'_, impl NetworkStateProbe, impl NetworkAssociator>,
    profile: &NetworkProfile,
    opts: &RunOptions<'_, impl ProgressReporter>,
) -> Result<AcquireOutcome> {
    let policy = AcquirePolicy::from_settings(opts.settings);
    let outcome = ensure_on_robot_network(
        net.probe,
        net.associator,
        opts.reporter,
        profile,
        &policy,
        opts.cancel,
    )
    .await?;
    match &outcome {
        AcquireOutcome::AlreadyOnNetwork { address } => opts.reporter.success(&format!(
            "already on robot subnet ({address}), skipping Wi-Fi connect"
        )),
        AcquireOutcome::Joined { address, .. } => opts
            .reporter
            .success(&format!("on robot Wi-Fi {} ({address})", profile.ssid)),
    }
    Ok(outcome)
}

/// The build must never start off the robot subnet.
async fn verify_still_on_robot_network(
    probe: &impl NetworkStateProbe,
    settings: &Settings,
) -> Result<()> {
    let address = InterfaceAddress::from_probe(
        &probe
            .interface_ipv4()
            .await
            .context("re-reading Wi-Fi interface address")?,
    );
    if settings.subnet.contains(address.as_str()) {
        return Ok(());
    }
    Err(NetworkError::LostRobotNetwork {
        address: address.as_str().to_string(),
        prefix: settings.subnet.prefix().to_string(),
    }
    .into())
}
