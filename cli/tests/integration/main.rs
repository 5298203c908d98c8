//! Integration tests for pusher CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! None of them touch Wi-Fi, adb or Gradle: each points `PUSHER_CONFIG` at a
//! temporary file and exercises only commands that stop before the network.

mod cli_tests;

use assert_cmd::Command;
use tempfile::TempDir;

/// A `pusher` invocation isolated to its own config file.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("pusher").join("config.yaml")
    }

    #[allow(clippy::expect_used)]
    pub fn write_config(&self, yaml: &str) {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, yaml).expect("write config");
    }

    #[allow(clippy::expect_used)]
    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_path()).expect("config written")
    }

    pub fn pusher(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pusher"));
        cmd.env("NO_COLOR", "1")
            .env("PUSHER_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path());
        cmd
    }
}
