//! Shared test helpers for application service tests.
//!
//! Provides cross-platform `exit_status()`, canned `Output` builders and a
//! recording `ProgressReporter`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

use crate::application::ports::{ProfileStore, ProgressReporter};
use crate::domain::PusherConfig;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stderr: &[u8]) -> std::process::Output {
    std::process::Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// Records every reporter call as `"<kind>: <message>"`.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    #[allow(clippy::unwrap_used)]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)]
    fn push(&self, kind: &str, message: &str) {
        self.events.lock().unwrap().push(format!("{kind}: {message}"));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
}

/// In-memory store that counts saves.
#[derive(Default)]
pub struct MemoryStore {
    pub config: Mutex<PusherConfig>,
    pub saves: Mutex<u32>,
    path: PathBuf,
}

impl MemoryStore {
    pub fn with(config: PusherConfig) -> Self {
        Self {
            config: Mutex::new(config),
            ..Self::default()
        }
    }

    #[allow(clippy::unwrap_used)]
    pub fn snapshot(&self) -> PusherConfig {
        self.config.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)]
impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<PusherConfig> {
        Ok(self.config.lock().unwrap().clone())
    }
    fn save(&self, config: &PusherConfig) -> Result<()> {
        *self.config.lock().unwrap() = config.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
    fn path(&self) -> &Path {
        &self.path
    }
}
