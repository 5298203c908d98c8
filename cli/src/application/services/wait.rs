//! Cancellable pauses between retry attempts.

use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::domain::Cancelled;

/// Sleep for `delay` unless `cancel` fires first.
///
/// A zero delay still observes a token that is already cancelled.
///
/// # Errors
///
/// Returns [`Cancelled`] if the token fires before the delay elapses.
pub async fn pause(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Cancelled.into());
    }
    if delay.is_zero() {
        return Ok(());
    }
    tokio::select! {
        () = cancel.cancelled() => Err(Cancelled.into()),
        () = tokio::time::sleep(delay) => Ok(()),
    }
}

/// Fail fast with [`Cancelled`] if the token has fired.
///
/// # Errors
///
/// Returns [`Cancelled`] when `cancel` is cancelled.
pub fn check(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(Cancelled.into())
    } else {
        Ok(())
    }
}
