//! Infrastructure implementation of the `ProfileStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ProfileStore;
use crate::domain::PusherConfig;

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV: &str = "PUSHER_CONFIG";

/// Production implementation of `ProfileStore` backed by one YAML file.
pub struct YamlProfileStore {
    path: PathBuf,
}

impl YamlProfileStore {
    /// Store at `$PUSHER_CONFIG`, or `~/.config/pusher/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        if let Some(val) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_path(PathBuf::from(val)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(
            home.join(".config").join("pusher").join("config.yaml"),
        ))
    }

    /// Create a store with an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ProfileStore for YamlProfileStore {
    fn load(&self) -> Result<PusherConfig> {
        if !self.path.exists() {
            return Ok(PusherConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(PusherConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }

    fn save(&self, config: &PusherConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        // Temp file then rename so a crash never leaves a truncated config.
        let temp_path = self.path.with_extension("yaml.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("cannot write {}", temp_path.display()))?;

        // Profiles hold Wi-Fi passwords.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
