//! Network Acquisition Controller — brings the host onto the robot network.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! A successful association proves nothing; only the subnet predicate,
//! re-evaluated after every attempt, decides success.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{NetworkAssociator, NetworkStateProbe, ProgressReporter};
use crate::application::services::wait::{check, pause};
use crate::domain::{InterfaceAddress, NetworkError, NetworkProfile, RetryPolicy, RobotSubnet, Settings};

/// Retry and verification parameters for one acquisition.
#[derive(Debug, Clone)]
pub struct AcquirePolicy {
    pub subnet: RobotSubnet,
    pub retry: RetryPolicy,
    /// Wait after a successful association before re-probing the address.
    pub settle: Duration,
}

impl AcquirePolicy {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            subnet: settings.subnet.clone(),
            retry: settings.network_retry,
            settle: settings.settle,
        }
    }
}

/// Outcome of the `ensure_on_robot_network` use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The host was already on the robot subnet; nothing was joined.
    AlreadyOnNetwork { address: String },
    /// The host joined the robot network and the address was verified.
    Joined { address: String, attempts: u32 },
}

impl AcquireOutcome {
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::AlreadyOnNetwork { address } | Self::Joined { address, .. } => address,
        }
    }
}

/// Ensure the host holds an address on the robot subnet.
///
/// Checks the current address first and returns without associating when it
/// already matches. Otherwise each attempt associates once, waits the settle
/// interval, re-probes and re-evaluates the predicate. A failed association
/// skips the settle wait. Attempts are separated by the policy's backoff.
///
/// # Errors
///
/// Returns [`NetworkError::NotOnRobotSubnet`] naming the last observed
/// address when every attempt fails, `Cancelled` if `cancel` fires, or the
/// probe error if the initial address query fails.
pub async fn ensure_on_robot_network(
    probe: &impl NetworkStateProbe,
    associator: &impl NetworkAssociator,
    reporter: &impl ProgressReporter,
    profile: &NetworkProfile,
    policy: &AcquirePolicy,
    cancel: &CancellationToken,
) -> Result<AcquireOutcome> {
    let initial = InterfaceAddress::from_probe(
        &probe
            .interface_ipv4()
            .await
            .context("reading Wi-Fi interface address")?,
    );
    if policy.subnet.contains(initial.as_str()) {
        tracing::debug!(address = initial.as_str(), "already on robot subnet");
        return Ok(AcquireOutcome::AlreadyOnNetwork {
            address: initial.as_str().to_string(),
        });
    }

    let max = policy.retry.max_attempts();
    let mut last_address = initial;
    let mut last_cause = String::from("no attempt made");

    for attempt in policy.retry.attempts() {
        check(cancel)?;
        reporter.step(&format!(
            "connecting to {} (attempt {attempt}/{max})...",
            profile.ssid
        ));

        match associator.associate(&profile.ssid, &profile.secret).await {
            Err(e) => {
                tracing::debug!(attempt, ssid = %profile.ssid, error = %e, "association failed");
                last_cause = format!("{e:#}");
            }
            Ok(()) => {
                pause(policy.settle, cancel).await?;
                match probe.interface_ipv4().await {
                    Ok(raw) => {
                        last_address = InterfaceAddress::from_probe(&raw);
                        let address = last_address.as_str();
                        tracing::debug!(attempt, address, "probed after association");
                        if policy.subnet.contains(address) {
                            return Ok(AcquireOutcome::Joined {
                                address: address.to_string(),
                                attempts: attempt,
                            });
                        }
                        last_cause = if address.is_empty() {
                            "associated but no address assigned yet".to_string()
                        } else {
                            format!("address {address} is outside the robot subnet")
                        };
                    }
                    Err(e) => last_cause = format!("{e:#}"),
                }
            }
        }

        if policy.retry.has_next(attempt) {
            reporter.warn(&format!("attempt {attempt}/{max} failed: {last_cause}"));
            pause(policy.retry.backoff(), cancel).await?;
        }
    }

    Err(NetworkError::NotOnRobotSubnet {
        address: last_address.as_str().to_string(),
        prefix: policy.subnet.prefix().to_string(),
        attempts: max,
        last_cause,
    }
    .into())
}
