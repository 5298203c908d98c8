//! Domain types and pure operations for the pusher configuration file.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::{ConfigError, ProfileError};
use crate::domain::network::{DEFAULT_SUBNET_PREFIX, RobotSubnet};
use crate::domain::retry::RetryPolicy;

// ── Constants ────────────────────────────────────────────────────────────────

/// Gradle worker count used when none is configured.
pub const DEFAULT_THREADS: u32 = 8;

/// Address of the robot controller's adb daemon on its hotspot.
pub const DEFAULT_BRIDGE_ADDRESS: &str = "192.168.43.1:5555";

/// Name given to the profile created by first-run setup.
pub const FIRST_RUN_PROFILE: &str = "default";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.config/pusher/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PusherConfig {
    /// Name of the profile used by `pusher`, `pusher connect`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_profile: String,
    /// Robot profiles keyed by name.
    pub profiles: BTreeMap<String, ProfileEntry>,
    /// Most recent non-robot SSID, restored by `pusher exit`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_wifi: String,
    /// Gradle worker count; `None` means [`DEFAULT_THREADS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    /// Wi-Fi acquisition settings.
    pub network: NetworkSettings,
    /// adb bridge settings.
    pub bridge: BridgeSettings,
}

/// Stored credentials for one robot network.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileEntry {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

/// Wi-Fi acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkSettings {
    /// Wireless interface to probe and associate (`en0` / `wlan0`).
    pub interface: String,
    /// First three octets of the robot subnet.
    pub subnet_prefix: String,
    /// Association attempts before giving up.
    pub attempts: u32,
    /// Seconds to wait after association for an address to be assigned.
    pub settle_secs: u64,
    /// Seconds between failed association attempts.
    pub backoff_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            interface: default_interface().to_string(),
            subnet_prefix: DEFAULT_SUBNET_PREFIX.to_string(),
            attempts: 3,
            settle_secs: 10,
            backoff_secs: 2,
        }
    }
}

/// adb bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeSettings {
    /// `host:port` of the robot controller's adb daemon.
    pub address: String,
    /// Connect attempts before giving up.
    pub attempts: u32,
    /// Seconds between connect attempts.
    pub delay_secs: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            address: DEFAULT_BRIDGE_ADDRESS.to_string(),
            attempts: 5,
            delay_secs: 3,
        }
    }
}

fn default_interface() -> &'static str {
    if cfg!(target_os = "macos") { "en0" } else { "wlan0" }
}

// ── Profiles ─────────────────────────────────────────────────────────────────

/// Immutable snapshot of one robot profile, borrowed for one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub ssid: String,
    pub secret: String,
}

impl PusherConfig {
    /// Returns `true` when at least one profile exists.
    #[must_use]
    pub fn has_profiles(&self) -> bool {
        !self.profiles.is_empty()
    }

    /// Add or replace a profile. The first profile becomes the default.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` or `ssid` is empty.
    pub fn add_profile(&mut self, name: &str, ssid: &str, password: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName.into());
        }
        if ssid.trim().is_empty() {
            return Err(ProfileError::EmptySsid(name.to_string()).into());
        }
        self.profiles.insert(
            name.to_string(),
            ProfileEntry {
                ssid: ssid.to_string(),
                password: password.to_string(),
            },
        );
        if self.default_profile.is_empty() {
            self.default_profile = name.to_string();
        }
        Ok(())
    }

    /// Update an existing profile. `None` keeps the current value.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist.
    pub fn edit_profile(
        &mut self,
        name: &str,
        ssid: Option<&str>,
        password: Option<&str>,
    ) -> Result<()> {
        let entry = self
            .profiles
            .get_mut(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;
        if let Some(ssid) = ssid.filter(|s| !s.is_empty()) {
            entry.ssid = ssid.to_string();
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            entry.password = password.to_string();
        }
        Ok(())
    }

    /// Make `name` the default profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile does not exist.
    pub fn set_default_profile(&mut self, name: &str) -> Result<()> {
        if !self.profiles.contains_key(name) {
            return Err(ProfileError::NotFound(name.to_string()).into());
        }
        self.default_profile = name.to_string();
        Ok(())
    }

    /// Snapshot of the default profile.
    ///
    /// # Errors
    ///
    /// Returns an error if no profile exists, no default is set, the default
    /// points at a missing profile, or that profile has an empty SSID.
    pub fn default_profile(&self) -> Result<NetworkProfile> {
        if self.profiles.is_empty() {
            return Err(ProfileError::NoProfiles.into());
        }
        if self.default_profile.is_empty() {
            return Err(ProfileError::NoDefault.into());
        }
        let entry = self
            .profiles
            .get(&self.default_profile)
            .ok_or_else(|| ProfileError::NotFound(self.default_profile.clone()))?;
        if entry.ssid.trim().is_empty() {
            return Err(ProfileError::EmptySsid(self.default_profile.clone()).into());
        }
        Ok(NetworkProfile {
            name: self.default_profile.clone(),
            ssid: entry.ssid.clone(),
            secret: entry.password.clone(),
        })
    }

    /// Configured Gradle worker count.
    #[must_use]
    pub fn threads(&self) -> u32 {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }
}

/// Parse a user-supplied thread count.
///
/// # Errors
///
/// Returns an error unless `raw` is a positive integer.
pub fn parse_threads(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ConfigError::InvalidThreads(raw.to_string()).into()),
    }
}

// ── Runtime settings ─────────────────────────────────────────────────────────

/// Process-wide settings resolved once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub interface: String,
    pub subnet: RobotSubnet,
    pub network_retry: RetryPolicy,
    pub settle: Duration,
    pub bridge_address: String,
    pub bridge_retry: RetryPolicy,
    pub threads: u32,
}

impl Settings {
    /// Resolve runtime settings from the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured subnet prefix is malformed.
    pub fn from_config(config: &PusherConfig) -> Result<Self> {
        let net = &config.network;
        let bridge = &config.bridge;
        Ok(Self {
            interface: net.interface.clone(),
            subnet: RobotSubnet::new(&net.subnet_prefix)?,
            network_retry: RetryPolicy::new(net.attempts, Duration::from_secs(net.backoff_secs)),
            settle: Duration::from_secs(net.settle_secs),
            bridge_address: bridge.address.clone(),
            bridge_retry: RetryPolicy::new(bridge.attempts, Duration::from_secs(bridge.delay_secs)),
            threads: config.threads(),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
