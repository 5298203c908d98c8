//! Build invocation types and Gradle argument construction.
//!
//! Pure functions only — no I/O, no async, no process spawning.

use std::path::{Path, PathBuf};

/// Which output channel a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// The child's stdout.
    Primary,
    /// The child's stderr.
    Diagnostic,
}

/// Gradle invocation flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Assemble only, offline, for use on the robot network.
    Offline,
    /// Assemble and install with network access, to warm the dependency cache.
    Online,
}

/// A fully-specified external build process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Extra environment applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl BuildCommand {
    /// Short name of the program for messages.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.program
            .file_name()
            .map_or_else(|| self.program.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            })
    }
}

/// Terminal state of one build run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub exit_code: Option<i32>,
    pub primary_lines: usize,
    pub diagnostic_lines: usize,
}

/// Gradle task and flag list for `mode` with `threads` workers.
#[must_use]
pub fn gradle_args(mode: BuildMode, threads: u32) -> Vec<String> {
    let mut args: Vec<String> = match mode {
        BuildMode::Offline => vec!["assembleDebug".into(), "--offline".into()],
        BuildMode::Online => vec!["assembleDebug".into(), "installDebug".into()],
    };
    args.extend([
        "--parallel".into(),
        "--build-cache".into(),
        format!("-Dorg.gradle.workers.max={threads}"),
    ]);
    args
}

/// Environment to apply when `JAVA_HOME` is unset and a bundled runtime exists.
#[must_use]
pub fn java_env(java_home: &Path, current_path: Option<&str>) -> Vec<(String, String)> {
    let bin = java_home.join("bin");
    let path = match current_path {
        Some(p) if !p.is_empty() => format!("{}:{p}", bin.display()),
        _ => bin.display().to_string(),
    };
    vec![
        ("JAVA_HOME".to_string(), java_home.display().to_string()),
        ("PATH".to_string(), path),
    ]
}

/// Glob patterns, in priority order, for the debug APK under the project root.
///
/// The root is escaped so checkout paths such as `FTC [2025]` match literally.
#[must_use]
pub fn apk_patterns(project_dir: &Path) -> Vec<String> {
    ["TeamCode", "FtcRobotController"]
        .iter()
        .map(|module| {
            let dir = project_dir.join(module).join("build/outputs/apk/debug");
            let escaped = glob::Pattern::escape(&dir.to_string_lossy());
            format!("{escaped}/*.apk")
        })
        .collect()
}
