//! Staff gate
//!
//! Locked until the device owner authenticates. Unlocking is bounded by a
//! timeout, and an unlocked gate locks itself again once its TTL elapses.

use crate::adapters::device_auth::{AuthOutcome, DeviceAuthenticator};
use crate::config::StaffConfig;
use crate::domain::{CatalogError, Result};
use crate::log_staff_gate;
use std::time::Duration;
use tokio::time::Instant;

/// Reason shown by the device when asking for authentication
pub const UNLOCK_REASON: &str = "Unlock staff records";

/// Staff lock state
#[derive(Debug)]
pub struct StaffGate {
    unlocked_at: Option<Instant>,
    auth_timeout: Duration,
    unlock_ttl: Duration,
}

impl StaffGate {
    /// Create a locked gate
    pub fn new(config: &StaffConfig) -> Self {
        Self {
            unlocked_at: None,
            auth_timeout: Duration::from_secs(config.auth_timeout_seconds),
            unlock_ttl: Duration::from_secs(config.unlock_ttl_seconds),
        }
    }

    /// Whether the gate is unlocked, re-locking it first if the TTL has run out
    pub fn is_unlocked(&mut self) -> bool {
        if let Some(at) = self.unlocked_at {
            if at.elapsed() >= self.unlock_ttl {
                self.unlocked_at = None;
                log_staff_gate!("locked", "unlock expired");
            }
        }
        self.unlocked_at.is_some()
    }

    /// Fails with `StaffLocked` unless the gate is unlocked
    pub fn require_unlocked(&mut self) -> Result<()> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(CatalogError::StaffLocked)
        }
    }

    /// Ask the device owner to authenticate
    ///
    /// The gate stays locked on every failure path.
    ///
    /// # Errors
    ///
    /// - `AuthUnavailable` if the device has no owner authentication
    /// - `AuthFailed` if the device refused
    /// - `AuthTimedOut` if no answer came within the configured timeout
    pub async fn unlock(&mut self, authenticator: &dyn DeviceAuthenticator) -> Result<()> {
        if !authenticator.can_authenticate() {
            tracing::warn!("Staff unlock requested but device authentication is unavailable");
            return Err(CatalogError::AuthUnavailable);
        }

        tracing::debug!("Authenticating staff");
        let outcome =
            tokio::time::timeout(self.auth_timeout, authenticator.authenticate(UNLOCK_REASON))
                .await;

        match outcome {
            Ok(AuthOutcome::Success) => {
                self.unlocked_at = Some(Instant::now());
                log_staff_gate!("unlocked", "device authentication");
                Ok(())
            }
            Ok(AuthOutcome::Failure(reason)) => {
                self.unlocked_at = None;
                tracing::warn!(reason = %reason, "Staff authentication failed");
                Err(CatalogError::AuthFailed(reason))
            }
            Err(_) => {
                self.unlocked_at = None;
                tracing::warn!(
                    timeout_secs = self.auth_timeout.as_secs(),
                    "Staff authentication timed out"
                );
                Err(CatalogError::AuthTimedOut(self.auth_timeout.as_secs()))
            }
        }
    }

    /// Lock the gate
    pub fn lock(&mut self, reason: &str) {
        if self.unlocked_at.take().is_some() {
            log_staff_gate!("locked", reason);
        }
    }
}
