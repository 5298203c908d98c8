//! Application service — profile and thread-count use-cases.
//!
//! Every mutation loads the whole file, edits it and writes it back.

use anyhow::Result;

use crate::application::ports::ProfileStore;
use crate::domain::config::parse_threads;
use crate::domain::PusherConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn load_config(store: &impl ProfileStore) -> Result<PusherConfig> {
    store.load()
}

/// Apply `edit` to the stored configuration and persist the result.
///
/// # Errors
///
/// Returns an error if loading, the edit, or saving fails.
pub fn update_config<T>(
    store: &impl ProfileStore,
    edit: impl FnOnce(&mut PusherConfig) -> Result<T>,
) -> Result<T> {
    let mut config = store.load()?;
    let value = edit(&mut config)?;
    store.save(&config)?;
    Ok(value)
}

/// Add or replace a profile. Returns `true` when it became the default.
///
/// # Errors
///
/// Returns an error if the name is empty or the store fails.
pub fn add_profile(store: &impl ProfileStore, name: &str, ssid: &str, password: &str) -> Result<bool> {
    update_config(store, |cfg| {
        cfg.add_profile(name, ssid, password)?;
        Ok(cfg.default_profile == name.trim())
    })
}

/// Update the SSID and/or password of an existing profile.
///
/// # Errors
///
/// Returns an error if the profile does not exist or the store fails.
pub fn edit_profile(
    store: &impl ProfileStore,
    name: &str,
    ssid: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    update_config(store, |cfg| cfg.edit_profile(name, ssid, password))
}

/// Make `name` the default profile.
///
/// # Errors
///
/// Returns an error if the profile does not exist or the store fails.
pub fn use_profile(store: &impl ProfileStore, name: &str) -> Result<()> {
    update_config(store, |cfg| cfg.set_default_profile(name))
}

/// Persist a validated Gradle worker count and return it.
///
/// # Errors
///
/// Returns an error if `raw` is not a positive integer or the store fails.
pub fn set_threads(store: &impl ProfileStore, raw: &str) -> Result<u32> {
    let threads = parse_threads(raw)?;
    update_config(store, |cfg| {
        cfg.threads = Some(threads);
        Ok(threads)
    })
}

/// Drop the stored worker count so the default applies again.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn reset_threads(store: &impl ProfileStore) -> Result<u32> {
    update_config(store, |cfg| {
        cfg.threads = None;
        Ok(cfg.threads())
    })
}

/// Record the network to restore on `pusher exit`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn save_last_network(store: &impl ProfileStore, ssid: &str) -> Result<()> {
    update_config(store, |cfg| {
        cfg.last_wifi = ssid.to_string();
        Ok(())
    })
}
