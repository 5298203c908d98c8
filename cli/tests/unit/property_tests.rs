//! Property-based tests for the subnet predicate and config parsing.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use pusher_cli::domain::RobotSubnet;
use pusher_cli::domain::config::parse_threads;
use pusher_cli::domain::network::parse_inet_address;

// ============================================================================
// RobotSubnet::contains() property tests
// ============================================================================

proptest! {
    /// Every host on the prefix matches.
    #[test]
    fn prop_hosts_on_prefix_match(a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, host in 0u8..=255) {
        let subnet = RobotSubnet::new(&format!("{a}.{b}.{c}")).expect("valid prefix");
        let address = format!("{a}.{b}.{c}.{host}");
        prop_assert!(subnet.contains(&address), "{address} should match");
    }

    /// Changing any of the first three octets breaks the match.
    #[test]
    fn prop_other_prefixes_never_match(
        host in 0u8..=255,
        third in 0u8..=255,
    ) {
        prop_assume!(third != 43);
        let subnet = RobotSubnet::default();
        let address = format!("192.168.{third}.{host}");
        prop_assert!(!subnet.contains(&address), "{address} should not match");
    }

    /// Arbitrary strings never panic, and only well-formed hosts match.
    #[test]
    fn prop_arbitrary_input_is_safe(raw in ".{0,40}") {
        let subnet = RobotSubnet::default();
        if subnet.contains(&raw) {
            let host = raw.strip_prefix("192.168.43.").expect("prefix present");
            prop_assert!(host.parse::<u8>().is_ok());
        }
    }

    /// A prefix match alone is not enough: `192.168.430.1` is not on `192.168.43`.
    #[test]
    fn prop_longer_octet_does_not_match(extra in 0u8..=9, host in 0u8..=255) {
        let subnet = RobotSubnet::default();
        let address = format!("192.168.43{extra}.{host}");
        prop_assert!(!subnet.contains(&address));
    }
}

#[test]
fn test_empty_and_partial_addresses_never_match() {
    let subnet = RobotSubnet::default();
    for address in ["", "192.168.43", "192.168.43.", "192.168.43.256", "192.168.43.1.5"] {
        assert!(!subnet.contains(address), "{address:?} matched");
    }
}

// ============================================================================
// parse_threads() property tests
// ============================================================================

proptest! {
    /// Every positive integer round-trips.
    #[test]
    fn prop_positive_threads_accepted(n in 1u32..=4096) {
        prop_assert_eq!(parse_threads(&n.to_string()).expect("positive"), n);
    }

    /// Non-numeric input is always rejected.
    #[test]
    fn prop_non_numeric_threads_rejected(raw in "[a-zA-Z_-]{1,10}") {
        prop_assert!(parse_threads(&raw).is_err());
    }
}

#[test]
fn test_zero_and_negative_threads_rejected() {
    for raw in ["0", "-1", "", "1.5"] {
        assert!(parse_threads(raw).is_err(), "{raw:?} accepted");
    }
}

// ============================================================================
// parse_inet_address() property tests
// ============================================================================

proptest! {
    /// The address of an `inet` line is extracted from ifconfig-style output.
    #[test]
    fn prop_inet_line_is_found(a in 1u8..=254, b in 0u8..=255, c in 0u8..=255, d in 1u8..=254) {
        prop_assume!((a, b, c, d) != (127, 0, 0, 1));
        let out = format!(
            "en0: flags=8863<UP,BROADCAST>\n\tinet6 fe80::1%en0 prefixlen 64\n\tinet {a}.{b}.{c}.{d} netmask 0xffffff00\n"
        );
        prop_assert_eq!(parse_inet_address(&out), Some(format!("{a}.{b}.{c}.{d}")));
    }
}
