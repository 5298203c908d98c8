//! Wi-Fi infrastructure — probe, join strategies and radio control built on
//! the platform's command-line network tools.
//!
//! macOS uses `networksetup` and `ifconfig`; Linux uses NetworkManager's
//! `nmcli` and `ip`. Every other platform reports `UnsupportedPlatform`.

use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{CommandRunner, JoinStrategy, NetworkStateProbe, RadioControl};
use crate::application::services::wait::pause;
use crate::domain::NetworkError;
use crate::domain::bridge::combined_output;
use crate::domain::network::{
    networksetup_failure, parse_airport_network, parse_inet_address, parse_nmcli_active_ssid,
};

/// Pause between radio off and on.
const RADIO_OFF_DELAY: Duration = Duration::from_secs(1);

/// Which network tooling is available on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Unsupported,
}

impl Platform {
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Unsupported
        }
    }
}

/// One named Wi-Fi interface, driven through the platform's tools.
pub struct SystemWifi<R> {
    runner: R,
    interface: String,
    platform: Platform,
    cancel: CancellationToken,
}

impl<R: CommandRunner + Clone> SystemWifi<R> {
    #[must_use]
    pub fn new(runner: R, interface: impl Into<String>) -> Self {
        Self::with_platform(runner, interface, Platform::current())
    }

    #[must_use]
    pub fn with_platform(runner: R, interface: impl Into<String>, platform: Platform) -> Self {
        Self {
            runner,
            interface: interface.into(),
            platform,
            cancel: CancellationToken::new(),
        }
    }

    /// Let the radio-off pause observe `cancel`.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Join strategies for this platform, in the order they should be tried.
    #[must_use]
    pub fn join_strategies(&self) -> Vec<WifiJoin<R>> {
        let methods: &[JoinMethod] = match self.platform {
            Platform::MacOs => &[JoinMethod::Networksetup, JoinMethod::PowerCycleThenNetworksetup],
            Platform::Linux => &[JoinMethod::NmcliConnect, JoinMethod::NmcliConnectionUp],
            Platform::Unsupported => &[],
        };
        methods
            .iter()
            .map(|&method| WifiJoin {
                method,
                runner: self.runner.clone(),
                interface: self.interface.clone(),
                cancel: self.cancel.clone(),
            })
            .collect()
    }

    /// Join strategies that leave the radio alone, for rejoining a network
    /// the OS already knows. The caller owns any power-cycle fallback.
    #[must_use]
    pub fn restore_strategies(&self) -> Vec<WifiJoin<R>> {
        self.join_strategies()
            .into_iter()
            .filter(|s| !s.method.cycles_radio())
            .collect()
    }

    /// Run a read-only tool; a non-zero exit means the interface is unusable.
    async fn query(&self, program: &str, args: &[&str]) -> Result<String> {
        let out = self.runner.run(program, args).await?;
        let text = combined_output(&out.stdout, &out.stderr);
        if !out.status.success() {
            return Err(NetworkError::InterfaceUnavailable {
                interface: self.interface.clone(),
                detail: text,
            }
            .into());
        }
        Ok(text)
    }
}

impl<R: CommandRunner + Clone> NetworkStateProbe for SystemWifi<R> {
    async fn current_network_name(&self) -> Result<String> {
        match self.platform {
            Platform::MacOs => {
                let text = self
                    .query("networksetup", &["-getairportnetwork", &self.interface])
                    .await?;
                let ssid = parse_airport_network(&text);
                if !ssid.is_empty() {
                    return Ok(ssid);
                }
                if let Some(failure) = networksetup_failure(&text) {
                    return Err(NetworkError::InterfaceUnavailable {
                        interface: self.interface.clone(),
                        detail: failure,
                    }
                    .into());
                }
                Ok(ssid)
            }
            Platform::Linux => {
                let text = self
                    .query("nmcli", &["-t", "-f", "active,ssid", "dev", "wifi"])
                    .await?;
                Ok(parse_nmcli_active_ssid(&text))
            }
            Platform::Unsupported => Err(NetworkError::UnsupportedPlatform.into()),
        }
    }

    async fn interface_ipv4(&self) -> Result<String> {
        let text = match self.platform {
            Platform::MacOs => self.query("ifconfig", &[&self.interface]).await?,
            Platform::Linux => {
                self.query("ip", &["-4", "-o", "addr", "show", "dev", &self.interface])
                    .await?
            }
            Platform::Unsupported => return Err(NetworkError::UnsupportedPlatform.into()),
        };
        Ok(parse_inet_address(&text).unwrap_or_default())
    }
}

impl<R: CommandRunner + Clone> RadioControl for SystemWifi<R> {
    async fn power_cycle(&self) -> Result<()> {
        power_cycle(&self.runner, &self.interface, self.platform, &self.cancel).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinMethod {
    Networksetup,
    PowerCycleThenNetworksetup,
    NmcliConnect,
    NmcliConnectionUp,
}

impl JoinMethod {
    fn cycles_radio(self) -> bool {
        matches!(self, Self::PowerCycleThenNetworksetup)
    }
}

/// A single platform join mechanism.
pub struct WifiJoin<R> {
    method: JoinMethod,
    runner: R,
    interface: String,
    cancel: CancellationToken,
}

impl<R: CommandRunner> JoinStrategy for WifiJoin<R> {
    fn name(&self) -> &str {
        match self.method {
            JoinMethod::Networksetup => "networksetup",
            JoinMethod::PowerCycleThenNetworksetup => "networksetup after radio power-cycle",
            JoinMethod::NmcliConnect => "nmcli device wifi connect",
            JoinMethod::NmcliConnectionUp => "nmcli connection up",
        }
    }

    async fn join(&self, ssid: &str, secret: &str) -> Result<()> {
        match self.method {
            JoinMethod::Networksetup => networksetup_join(&self.runner, &self.interface, ssid, secret).await,
            JoinMethod::PowerCycleThenNetworksetup => {
                power_cycle(&self.runner, &self.interface, Platform::MacOs, &self.cancel).await?;
                networksetup_join(&self.runner, &self.interface, ssid, secret).await
            }
            JoinMethod::NmcliConnect => {
                let mut args = vec!["device", "wifi", "connect", ssid];
                if !secret.is_empty() {
                    args.extend(["password", secret]);
                }
                args.extend(["ifname", self.interface.as_str()]);
                run_checked(&self.runner, "nmcli", &args).await.map(drop)
            }
            JoinMethod::NmcliConnectionUp => {
                run_checked(&self.runner, "nmcli", &["connection", "up", "id", ssid])
                    .await
                    .map(drop)
            }
        }
    }
}

async fn networksetup_join(
    runner: &impl CommandRunner,
    interface: &str,
    ssid: &str,
    secret: &str,
) -> Result<()> {
    let mut args = vec!["-setairportnetwork", interface, ssid];
    if !secret.is_empty() {
        args.push(secret);
    }
    let text = run_checked(runner, "networksetup", &args).await?;
    // networksetup exits 0 for "Could not find network" and similar.
    if let Some(failure) = networksetup_failure(&text) {
        anyhow::bail!(failure);
    }
    Ok(())
}

/// Radio off, pause, radio on. An interrupted pause still turns the radio
/// back on before reporting the cancellation.
async fn power_cycle(
    runner: &impl CommandRunner,
    interface: &str,
    platform: Platform,
    cancel: &CancellationToken,
) -> Result<()> {
    tracing::debug!(interface, ?platform, "power-cycling Wi-Fi radio");
    let (program, off, on): (&str, Vec<&str>, Vec<&str>) = match platform {
        Platform::MacOs => (
            "networksetup",
            vec!["-setairportpower", interface, "off"],
            vec!["-setairportpower", interface, "on"],
        ),
        Platform::Linux => (
            "nmcli",
            vec!["radio", "wifi", "off"],
            vec!["radio", "wifi", "on"],
        ),
        Platform::Unsupported => return Err(NetworkError::UnsupportedPlatform.into()),
    };
    run_checked(runner, program, &off).await?;
    let paused = pause(RADIO_OFF_DELAY, cancel).await;
    run_checked(runner, program, &on).await?;
    paused
}

/// Run a mutating tool and fail with its output on a non-zero exit.
async fn run_checked(runner: &impl CommandRunner, program: &str, args: &[&str]) -> Result<String> {
    let out = runner.run(program, args).await?;
    let text = combined_output(&out.stdout, &out.stderr);
    if !out.status.success() {
        anyhow::bail!(
            "{program} exited with code {}: {text}",
            out.status.code().unwrap_or(-1)
        );
    }
    Ok(text)
}
