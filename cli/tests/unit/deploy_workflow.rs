//! Tests for the push, connect, prepare and status workflows.
//!
//! Each workflow runs against journalled fakes so stage ordering and
//! short-circuiting on failure can be asserted directly.

#![allow(clippy::expect_used)]

use pusher_cli::application::services::deploy::{
    self, BuildPorts, NetworkPorts, RunOptions,
};
use pusher_cli::application::services::network::AcquireOutcome;
use pusher_cli::domain::{
    BridgeError, BuildError, NetworkError, ProfileError, PusherConfig, Settings, StreamKind,
};
use tokio_util::sync::CancellationToken;

use crate::helpers::{config_with_robot, instant_settings};
use crate::mocks::{
    BridgeScript, CollectingSink, FakeAssociator, FakeBridge, FakeBuild, FakeProbe, FakeProject,
    Journal, MemoryStore, RecordingReporter,
};

/// Everything one push run needs, wired to a shared journal.
struct Rig {
    journal: Journal,
    store: MemoryStore,
    probe: FakeProbe,
    associator: FakeAssociator,
    bridge: FakeBridge,
    project: FakeProject,
    build: FakeBuild,
    sink: CollectingSink,
    reporter: RecordingReporter,
    settings: Settings,
    cancel: CancellationToken,
}

impl Rig {
    fn new(current_ssid: &str, addresses: &[&str]) -> Self {
        let journal = Journal::default();
        Self {
            store: MemoryStore::new(config_with_robot()),
            probe: FakeProbe::new(&journal, current_ssid, addresses),
            associator: FakeAssociator::new(&journal),
            bridge: FakeBridge::new(&journal, BridgeScript::default()),
            project: FakeProject::new(&journal, true),
            build: FakeBuild::new(&journal, 0),
            sink: CollectingSink::default(),
            reporter: RecordingReporter::default(),
            settings: instant_settings(3),
            cancel: CancellationToken::new(),
            journal,
        }
    }

    async fn push(&self) -> anyhow::Result<deploy::PushOutcome> {
        deploy::push(
            &self.store,
            NetworkPorts {
                probe: &self.probe,
                associator: &self.associator,
            },
            &self.bridge,
            BuildPorts {
                project: &self.project,
                runner: &self.build,
                sink: &self.sink,
            },
            RunOptions {
                reporter: &self.reporter,
                settings: &self.settings,
                cancel: &self.cancel,
            },
        )
        .await
    }

    fn ran_build(&self) -> bool {
        self.journal.position("build ").is_some()
    }

    fn installed(&self) -> bool {
        self.journal.position("install").is_some()
    }
}

// ── push ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn push_runs_every_stage_in_order() {
    let rig = Rig::new("HomeNet", &["10.0.0.5", "192.168.43.20"]);

    let outcome = rig.push().await.expect("push succeeds");

    assert_eq!(
        outcome.network,
        AcquireOutcome::Joined {
            address: "192.168.43.20".to_string(),
            attempts: 1
        }
    );
    assert_eq!(outcome.apk, rig.project.apk());
    assert_eq!(outcome.build.exit_code, Some(0));

    let associate = rig.journal.position("associate ROBOT-1").expect("associated");
    let connect = rig.journal.position("adb connect").expect("adb connected");
    let build = rig.journal.position("build ").expect("built");
    let install = rig.journal.position("install").expect("installed");
    assert!(associate < connect && connect < build && build < install);
    assert_eq!(rig.store.snapshot().last_wifi, "HomeNet");
}

#[tokio::test]
async fn push_builds_offline_with_configured_workers() {
    let rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.push().await.expect("push succeeds");

    let build = rig
        .journal
        .entries()
        .into_iter()
        .find(|e| e.starts_with("build "))
        .expect("build ran");
    assert!(build.contains("assembleDebug"));
    assert!(build.contains("--offline"));
    assert!(build.contains("-Dorg.gradle.workers.max=4"));
    assert!(!build.contains("installDebug"));
}

#[tokio::test]
async fn push_relays_both_build_streams_to_sink() {
    let rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.push().await.expect("push succeeds");

    let lines = rig.sink.lines.lock().expect("lock").clone();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1].0, StreamKind::Diagnostic);
    assert_eq!(lines[2].1, "BUILD SUCCESSFUL in 12s");
}

#[tokio::test]
async fn push_skips_association_when_already_on_robot_subnet() {
    let rig = Rig::new("ROBOT-1", &["192.168.43.20"]);

    let outcome = rig.push().await.expect("push succeeds");

    assert!(matches!(
        outcome.network,
        AcquireOutcome::AlreadyOnNetwork { .. }
    ));
    assert_eq!(rig.journal.count("associate"), 0);
    assert!(rig.installed());
}

#[tokio::test]
async fn push_does_not_remember_the_robot_network() {
    let rig = Rig::new("ROBOT-1", &["192.168.43.20"]);
    rig.push().await.expect("push succeeds");
    assert_eq!(rig.store.snapshot().last_wifi, "");
}

#[tokio::test]
async fn push_does_not_remember_an_empty_network_name() {
    let mut rig = Rig::new("", &["192.168.43.20"]);
    let mut config = config_with_robot();
    config.last_wifi = "Cafe".to_string();
    rig.store = MemoryStore::new(config);

    rig.push().await.expect("push succeeds");
    assert_eq!(rig.store.snapshot().last_wifi, "Cafe");
}

#[tokio::test]
async fn push_continues_when_last_network_cannot_be_saved() {
    let mut rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.store = MemoryStore::read_only(config_with_robot());

    rig.push().await.expect("push succeeds despite save failure");

    assert!(rig.installed());
    let warnings = rig.reporter.warnings();
    assert!(
        warnings.iter().any(|w| w.contains("failed to save Wi-Fi state")),
        "warnings: {warnings:?}"
    );
}

#[tokio::test]
async fn push_without_profiles_touches_nothing() {
    let mut rig = Rig::new("HomeNet", &["10.0.0.5"]);
    rig.store = MemoryStore::new(PusherConfig::default());

    let err = rig.push().await.expect_err("no profile");

    assert_eq!(
        err.downcast_ref::<ProfileError>(),
        Some(&ProfileError::NoProfiles)
    );
    assert!(rig.journal.entries().is_empty());
}

#[tokio::test]
async fn push_with_empty_ssid_fails_before_associating() {
    let mut rig = Rig::new("HomeNet", &["10.0.0.5"]);
    let mut cfg = config_with_robot();
    cfg.profiles.get_mut("robot").expect("robot profile").ssid.clear();
    rig.store = MemoryStore::new(cfg);

    let err = rig.push().await.expect_err("empty ssid");

    assert_eq!(
        err.downcast_ref::<ProfileError>(),
        Some(&ProfileError::EmptySsid("robot".to_string()))
    );
    assert_eq!(rig.journal.count("associate"), 0);
    assert!(rig.journal.entries().is_empty());
}

#[tokio::test]
async fn push_stops_after_network_exhaustion() {
    let rig = Rig::new("HomeNet", &["10.0.0.5"]);

    let err = rig.push().await.expect_err("never reaches the subnet");

    match err.downcast_ref::<NetworkError>() {
        Some(NetworkError::NotOnRobotSubnet {
            address, attempts, ..
        }) => {
            assert_eq!(address, "10.0.0.5");
            assert_eq!(*attempts, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(rig.journal.count("associate"), 3);
    assert!(rig.journal.position("adb connect").is_none());
    assert!(!rig.ran_build());
}

#[tokio::test]
async fn push_stops_when_adb_cannot_connect() {
    let mut rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.bridge = FakeBridge::new(
        &rig.journal,
        BridgeScript {
            connect_fails: true,
            ..BridgeScript::default()
        },
    );

    let err = rig.push().await.expect_err("adb refuses");

    assert!(matches!(
        err.downcast_ref::<BridgeError>(),
        Some(BridgeError::ConnectFailed { attempts: 5, .. })
    ));
    assert!(!rig.ran_build());
    assert!(!rig.installed());
}

#[tokio::test]
async fn push_refuses_to_build_after_leaving_robot_subnet() {
    let rig = Rig::new("HomeNet", &["10.0.0.5", "192.168.43.20", "10.0.0.9"]);

    let err = rig.push().await.expect_err("network lost");

    match err.downcast_ref::<NetworkError>() {
        Some(NetworkError::LostRobotNetwork { address, prefix }) => {
            assert_eq!(address, "10.0.0.9");
            assert_eq!(prefix, "192.168.43");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!rig.ran_build());
}

#[tokio::test]
async fn push_does_not_install_after_failed_build() {
    let mut rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.build = FakeBuild::new(&rig.journal, 1);

    let err = rig.push().await.expect_err("build fails");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::Failed { code, tail, .. }) => {
            assert_eq!(*code, Some(1));
            assert!(tail[0].contains("FAILURE"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!rig.installed());
}

#[tokio::test]
async fn push_reports_missing_apk() {
    let mut rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.project = FakeProject::new(&rig.journal, false);

    let err = rig.push().await.expect_err("no apk");

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::ArtifactNotFound(_))
    ));
    assert!(rig.ran_build());
    assert!(!rig.installed());
}

#[tokio::test]
async fn push_surfaces_install_failure() {
    let mut rig = Rig::new("HomeNet", &["192.168.43.20"]);
    rig.bridge = FakeBridge::new(
        &rig.journal,
        BridgeScript {
            install_fails: true,
            ..BridgeScript::default()
        },
    );

    let err = rig.push().await.expect_err("install fails");
    assert!(format!("{err:#}").contains("INSTALL_FAILED_INSUFFICIENT_STORAGE"));
}

// ── connect ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_joins_and_remembers_without_touching_adb() {
    let rig = Rig::new("HomeNet", &["", "192.168.43.7"]);

    let outcome = deploy::connect(
        &rig.store,
        NetworkPorts {
            probe: &rig.probe,
            associator: &rig.associator,
        },
        RunOptions {
            reporter: &rig.reporter,
            settings: &rig.settings,
            cancel: &rig.cancel,
        },
    )
    .await
    .expect("connect succeeds");

    assert_eq!(outcome.address(), "192.168.43.7");
    assert_eq!(rig.journal.entries()[1], "associate ROBOT-1 secret=pw");
    assert!(rig.journal.position("adb").is_none());
    assert_eq!(rig.store.snapshot().last_wifi, "HomeNet");
}

#[tokio::test]
async fn connect_retries_failed_associations() {
    let mut rig = Rig::new("HomeNet", &["", "192.168.43.7"]);
    rig.associator = FakeAssociator::failing(&rig.journal, &["radio refused"]);

    let outcome = deploy::connect(
        &rig.store,
        NetworkPorts {
            probe: &rig.probe,
            associator: &rig.associator,
        },
        RunOptions {
            reporter: &rig.reporter,
            settings: &rig.settings,
            cancel: &rig.cancel,
        },
    )
    .await
    .expect("second attempt succeeds");

    assert!(matches!(outcome, AcquireOutcome::Joined { attempts: 2, .. }));
    assert!(
        rig.reporter
            .warnings()
            .iter()
            .any(|w| w.contains("attempt 1/3 failed: radio refused"))
    );
}

#[tokio::test]
async fn connect_stops_when_cancelled() {
    let rig = Rig::new("HomeNet", &["10.0.0.5"]);
    rig.cancel.cancel();

    let err = deploy::connect(
        &rig.store,
        NetworkPorts {
            probe: &rig.probe,
            associator: &rig.associator,
        },
        RunOptions {
            reporter: &rig.reporter,
            settings: &rig.settings,
            cancel: &rig.cancel,
        },
    )
    .await
    .expect_err("cancelled");

    assert!(
        err.downcast_ref::<pusher_cli::domain::Cancelled>()
            .is_some()
    );
    assert_eq!(rig.journal.count("associate"), 0);
}

// ── prepare / status / disconnect ─────────────────────────────────────────────

#[tokio::test]
async fn prepare_runs_an_online_build() {
    let rig = Rig::new("HomeNet", &["10.0.0.5"]);

    let report = deploy::prepare(
        BuildPorts {
            project: &rig.project,
            runner: &rig.build,
            sink: &rig.sink,
        },
        &rig.reporter,
        2,
        &rig.cancel,
    )
    .await
    .expect("prepare succeeds");

    assert_eq!(report.exit_code, Some(0));
    assert_eq!(rig.journal.entries()[0], "build-command Online");
    let build = &rig.journal.entries()[1];
    assert!(build.contains("installDebug"));
    assert!(!build.contains("--offline"));
    assert!(build.contains("-Dorg.gradle.workers.max=2"));
}

#[tokio::test]
async fn status_reports_subnet_and_session() {
    let mut rig = Rig::new("ROBOT-1", &["192.168.43.20"]);
    rig.bridge = FakeBridge::new(
        &rig.journal,
        BridgeScript {
            connected: true,
            ..BridgeScript::default()
        },
    );

    let report = deploy::status(&rig.probe, &rig.bridge, &rig.settings)
        .await
        .expect("status succeeds");

    assert_eq!(report.ssid, "ROBOT-1");
    assert!(report.on_robot_network);
    assert_eq!(report.subnet, "192.168.43.x");
    assert!(report.bridge_connected);
}

#[tokio::test]
async fn status_off_network_serializes_for_json() {
    let rig = Rig::new("HomeNet", &[""]);

    let report = deploy::status(&rig.probe, &rig.bridge, &rig.settings)
        .await
        .expect("status succeeds");

    let value = serde_json::to_value(&report).expect("serializable");
    assert_eq!(value["ssid"], "HomeNet");
    assert_eq!(value["address"], "");
    assert_eq!(value["on_robot_network"], false);
    assert_eq!(value["bridge_connected"], false);
}

#[tokio::test]
async fn disconnect_propagates_failure() {
    let journal = Journal::default();
    let bridge = FakeBridge::new(
        &journal,
        BridgeScript {
            disconnect_fails: true,
            ..BridgeScript::default()
        },
    );
    let reporter = RecordingReporter::default();

    let err = deploy::disconnect(&bridge, &reporter)
        .await
        .expect_err("disconnect fails");

    assert!(matches!(
        err.downcast_ref::<BridgeError>(),
        Some(BridgeError::DisconnectFailed(_))
    ));
}
