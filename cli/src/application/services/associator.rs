//! Network Associator — joins a named network through an ordered list of
//! platform strategies.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{JoinStrategy, NetworkAssociator};
use crate::domain::NetworkError;

/// Tries each strategy in order until one succeeds.
///
/// A strategy failure is never fatal on its own. Only when every strategy
/// has failed does `associate` return, carrying all the causes.
pub struct StrategyAssociator<S> {
    strategies: Vec<S>,
}

impl<S: JoinStrategy> StrategyAssociator<S> {
    #[must_use]
    pub fn new(strategies: Vec<S>) -> Self {
        Self { strategies }
    }

    #[must_use]
    pub fn strategies(&self) -> &[S] {
        &self.strategies
    }
}

impl<S: JoinStrategy> NetworkAssociator for StrategyAssociator<S> {
    async fn associate(&self, ssid: &str, secret: &str) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(NetworkError::UnsupportedPlatform.into());
        }
        let mut causes = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.join(ssid, secret).await {
                Ok(()) => {
                    tracing::debug!(strategy = strategy.name(), ssid, "association succeeded");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "strategy failed");
                    causes.push(format!("{}: {e:#}", strategy.name()));
                }
            }
        }
        Err(NetworkError::AssociationFailed {
            ssid: ssid.to_string(),
            detail: causes.join("; "),
        }
        .into())
    }
}
