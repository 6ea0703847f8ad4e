//! Device owner authentication
//!
//! The staff gate asks the device whether the person holding it is its owner.
//! On a tablet that is biometrics or the passcode sheet; here it is the
//! [`DeviceAuthenticator`] trait, with [`PasscodeAuthenticator`] as the shipped
//! implementation.

pub mod passcode;

pub use passcode::{hash_passcode, PasscodeAuthenticator};

use async_trait::async_trait;

/// Outcome of an authentication request that completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The device owner was verified
    Success,
    /// Verification was refused; carries the reason reported by the device
    Failure(String),
}

/// External device authentication collaborator
///
/// `authenticate` may wait on a human indefinitely. Callers bound it with a
/// timeout; an implementation is never required to return.
#[async_trait]
pub trait DeviceAuthenticator: Send + Sync {
    /// Whether any owner authentication is configured on this device
    fn can_authenticate(&self) -> bool;

    /// Ask the device owner to authenticate, showing `reason`
    async fn authenticate(&self, reason: &str) -> AuthOutcome;
}
