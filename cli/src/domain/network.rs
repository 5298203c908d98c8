//! Robot-network domain types and pure parsers for OS network tool output.
//!
//! Pure functions only — no I/O, no async, no process spawning.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::error::ConfigError;

/// Default first three octets of the robot controller's hotspot subnet.
pub const DEFAULT_SUBNET_PREFIX: &str = "192.168.43";

static INET_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Pattern is a compile-time constant
    Regex::new(r"\binet (\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})").expect("valid regex")
});

// ── Subnet predicate ──────────────────────────────────────────────────────────

/// The rule deciding whether an address is on the robot's private network.
///
/// An address matches iff its first three octets equal the configured prefix.
/// This is the only correctness gate for "the radio is on the robot's access
/// point"; a successful association call proves nothing about routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotSubnet {
    prefix: String,
}

impl RobotSubnet {
    /// Build a predicate for a three-octet prefix such as `192.168.43`.
    ///
    /// # Errors
    ///
    /// Returns an error if `prefix` is not exactly three dotted octets.
    pub fn new(prefix: &str) -> Result<Self> {
        let prefix = prefix.trim().trim_end_matches('.');
        let octets: Vec<&str> = prefix.split('.').collect();
        let valid = octets.len() == 3 && octets.iter().all(|o| o.parse::<u8>().is_ok());
        if !valid {
            return Err(ConfigError::InvalidSubnetPrefix(prefix.to_string()).into());
        }
        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    /// The configured three-octet prefix, without a trailing dot.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` when `address` lies inside the robot subnet.
    ///
    /// Empty and malformed addresses never match.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        let Some(last) = address
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        else {
            return false;
        };
        last.parse::<u8>().is_ok()
    }
}

impl Default for RobotSubnet {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_SUBNET_PREFIX.to_string(),
        }
    }
}

/// Snapshot of an interface's IPv4 assignment. Recomputed on every probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub ipv4: Option<String>,
}

impl InterfaceAddress {
    /// Wrap probe output, treating an empty string as "no address".
    #[must_use]
    pub fn from_probe(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self {
            ipv4: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// The address, or an empty string when none is assigned.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.ipv4.as_deref().unwrap_or("")
    }
}

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Extract the first IPv4 address from `ifconfig <iface>` or
/// `ip -4 -o addr show dev <iface>` output.
///
/// Both tools print `inet a.b.c.d`, `ip` appends the prefix length
/// (`/24`) which the pattern stops before.
#[must_use]
pub fn parse_inet_address(output: &str) -> Option<String> {
    INET_RE
        .captures_iter(output)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .find(|addr| *addr != "127.0.0.1")
        .map(str::to_owned)
}

/// Parse `networksetup -getairportnetwork <iface>` output.
///
/// Returns an empty string when the interface is not associated.
#[must_use]
pub fn parse_airport_network(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Current Wi-Fi Network:"))
        .map(|ssid| ssid.trim().to_string())
        .unwrap_or_default()
}

/// Parse `nmcli -t -f active,ssid dev wifi` output.
///
/// Lines look like `yes:ROBOT-1` / `no:HomeNet`; colons inside the SSID are
/// escaped by nmcli as `\:`.
#[must_use]
pub fn parse_nmcli_active_ssid(output: &str) -> String {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("yes:"))
        .map(|ssid| ssid.replace("\\:", ":"))
        .unwrap_or_default()
}

/// `networksetup` exits 0 for some association failures and reports them in
/// its output instead. Returns the failure text when one is present.
///
/// Only whole-line markers count, so an SSID that happens to contain
/// "error" is never mistaken for a failure.
#[must_use]
pub fn networksetup_failure(output: &str) -> Option<String> {
    let failed = output.lines().any(|line| {
        let lower = line.trim().trim_start_matches('*').trim_start().to_lowercase();
        NETWORKSETUP_FAILURE_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
    });
    failed.then(|| output.trim().to_string())
}

/// Lowercased line prefixes `networksetup` uses to report a failure.
const NETWORKSETUP_FAILURE_PREFIXES: &[&str] =
    &["error", "could not find network", "failed to join network"];
