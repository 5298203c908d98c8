//! Tests for `pusher exit`: best-effort adb teardown and network restore.

#![allow(clippy::expect_used)]

use pusher_cli::application::services::deploy::{self, ExitReport, NetworkPorts, RestoreOutcome};
use pusher_cli::domain::PusherConfig;

use crate::helpers::config_with_robot;
use crate::mocks::{
    BridgeScript, FakeAssociator, FakeBridge, FakeProbe, FakeRadio, Journal, MemoryStore,
    RecordingReporter,
};

struct Case<'a> {
    last_wifi: &'a str,
    current_ssid: &'a str,
    join_fails: bool,
    radio_fails: bool,
    disconnect_fails: bool,
}

impl Default for Case<'_> {
    fn default() -> Self {
        Self {
            last_wifi: "HomeNet",
            current_ssid: "ROBOT-1",
            join_fails: false,
            radio_fails: false,
            disconnect_fails: false,
        }
    }
}

async fn run_exit(case: Case<'_>) -> (ExitReport, Journal, RecordingReporter) {
    let journal = Journal::default();
    let mut config: PusherConfig = config_with_robot();
    config.last_wifi = case.last_wifi.to_string();
    let store = MemoryStore::new(config);
    let probe = FakeProbe::new(&journal, case.current_ssid, &["192.168.43.20"]);
    let associator = if case.join_fails {
        FakeAssociator::failing(&journal, &["network not found"])
    } else {
        FakeAssociator::new(&journal)
    };
    let radio = FakeRadio::new(&journal, case.radio_fails);
    let bridge = FakeBridge::new(
        &journal,
        BridgeScript {
            disconnect_fails: case.disconnect_fails,
            ..BridgeScript::default()
        },
    );
    let reporter = RecordingReporter::default();

    let report = deploy::exit(
        &store,
        NetworkPorts {
            probe: &probe,
            associator: &associator,
        },
        &radio,
        &bridge,
        &reporter,
    )
    .await;
    (report, journal, reporter)
}

#[tokio::test]
async fn exit_rejoins_last_network_without_a_secret() {
    let (report, journal, _) = run_exit(Case::default()).await;

    assert!(report.disconnected);
    assert_eq!(report.restore, RestoreOutcome::Restored("HomeNet".to_string()));
    assert_eq!(
        journal.entries(),
        vec!["adb disconnect", "associate HomeNet secret="]
    );
}

#[tokio::test]
async fn exit_with_nothing_saved_only_disconnects() {
    let (report, journal, _) = run_exit(Case {
        last_wifi: "",
        ..Case::default()
    })
    .await;

    assert_eq!(report.restore, RestoreOutcome::NothingToRestore);
    assert_eq!(journal.entries(), vec!["adb disconnect"]);
}

#[tokio::test]
async fn exit_skips_join_when_already_back_home() {
    let (report, journal, _) = run_exit(Case {
        current_ssid: "HomeNet",
        ..Case::default()
    })
    .await;

    assert_eq!(
        report.restore,
        RestoreOutcome::AlreadyConnected("HomeNet".to_string())
    );
    assert_eq!(journal.count("associate"), 0);
}

#[tokio::test]
async fn exit_power_cycles_when_rejoin_fails() {
    let (report, journal, reporter) = run_exit(Case {
        join_fails: true,
        ..Case::default()
    })
    .await;

    assert_eq!(
        report.restore,
        RestoreOutcome::PowerCycled("HomeNet".to_string())
    );
    assert!(journal.position("power-cycle") > journal.position("associate"));
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("could not rejoin HomeNet"))
    );
}

#[tokio::test]
async fn exit_asks_for_manual_reconnect_when_everything_fails() {
    let (report, _, reporter) = run_exit(Case {
        join_fails: true,
        radio_fails: true,
        ..Case::default()
    })
    .await;

    assert_eq!(report.restore, RestoreOutcome::Failed("HomeNet".to_string()));
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("reconnect to HomeNet manually"))
    );
}

#[tokio::test]
async fn exit_restores_even_if_adb_disconnect_fails() {
    let (report, _, reporter) = run_exit(Case {
        disconnect_fails: true,
        ..Case::default()
    })
    .await;

    assert!(!report.disconnected);
    assert_eq!(report.restore, RestoreOutcome::Restored("HomeNet".to_string()));
    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("failed to disconnect adb"))
    );
}
