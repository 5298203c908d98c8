//! Gradle project discovery — implements the `BuildProject` port.
//!
//! Finds the wrapper, makes it executable, builds the invocation and locates
//! the debug APK afterwards.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::BuildProject;
use crate::domain::build::{apk_patterns, gradle_args, java_env};
use crate::domain::{BuildCommand, BuildError, BuildMode};

const WRAPPER_NAME: &str = "gradlew";

/// Parent directories searched above the start directory.
const PARENT_SEARCH_DEPTH: usize = 3;

/// A Gradle project rooted at the directory holding `gradlew`.
pub struct GradleProject {
    start_dir: PathBuf,
    java_home: Option<OsString>,
    java_candidates: Vec<PathBuf>,
}

impl GradleProject {
    /// Project discovered from `start_dir`, inheriting `JAVA_HOME`.
    #[must_use]
    pub fn new(start_dir: PathBuf) -> Self {
        Self {
            start_dir,
            java_home: std::env::var_os("JAVA_HOME").filter(|v| !v.is_empty()),
            java_candidates: default_java_candidates(),
        }
    }

    /// Project discovered from the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be read.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot read current directory")?;
        Ok(Self::new(cwd))
    }

    /// Override the inherited `JAVA_HOME` and the bundled-runtime search list.
    #[must_use]
    pub fn with_java(mut self, java_home: Option<OsString>, candidates: Vec<PathBuf>) -> Self {
        self.java_home = java_home;
        self.java_candidates = candidates;
        self
    }

    fn wrapper(&self) -> Result<PathBuf> {
        find_wrapper(&self.start_dir)
            .ok_or_else(|| BuildError::WrapperNotFound(self.start_dir.display().to_string()).into())
    }

    /// `JAVA_HOME`/`PATH` overrides when no JDK is configured but Android
    /// Studio's bundled runtime is installed.
    fn java_overrides(&self) -> Vec<(String, String)> {
        if self.java_home.is_some() {
            return Vec::new();
        }
        let Some(jbr) = self.java_candidates.iter().find(|p| p.is_dir()) else {
            return Vec::new();
        };
        tracing::debug!(java_home = %jbr.display(), "using bundled Android Studio runtime");
        let path = std::env::var("PATH").ok();
        java_env(jbr, path.as_deref())
    }
}

impl BuildProject for GradleProject {
    fn root(&self) -> Result<PathBuf> {
        let wrapper = self.wrapper()?;
        Ok(wrapper
            .parent()
            .map_or_else(|| self.start_dir.clone(), Path::to_path_buf))
    }

    fn build_command(&self, mode: BuildMode, threads: u32) -> Result<BuildCommand> {
        let wrapper = self.wrapper()?;
        make_executable(&wrapper)?;
        let working_dir = wrapper
            .parent()
            .map_or_else(|| self.start_dir.clone(), Path::to_path_buf);
        Ok(BuildCommand {
            program: wrapper,
            args: gradle_args(mode, threads),
            working_dir,
            env: self.java_overrides(),
        })
    }

    fn locate_artifact(&self) -> Result<PathBuf> {
        let root = self.root()?;
        for pattern in apk_patterns(&root) {
            if let Some(apk) = newest_match(&pattern)? {
                tracing::debug!(apk = %apk.display(), "located artifact");
                return Ok(apk);
            }
        }
        Err(BuildError::ArtifactNotFound(root.display().to_string()).into())
    }
}

/// `gradlew` in `start` or up to three of its parents.
#[must_use]
pub fn find_wrapper(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(PARENT_SEARCH_DEPTH + 1)
        .map(|dir| dir.join(WRAPPER_NAME))
        .find(|candidate| candidate.is_file())
}

/// Most recently modified file matching `pattern`.
fn newest_match(pattern: &str) -> Result<Option<PathBuf>> {
    let newest = glob::glob(pattern)
        .with_context(|| format!("invalid artifact pattern {pattern}"))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .max_by_key(|p| p.metadata().and_then(|m| m.modified()).ok());
    Ok(newest)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("cannot make {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn default_java_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("/Applications/Android Studio.app/Contents/jbr/Contents/Home"),
        PathBuf::from("/opt/android-studio/jbr"),
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join("android-studio").join("jbr"));
    }
    candidates
}
