//! Staff passcode authenticator
//!
//! Compares a passcode supplied by the person at the kiosk against the SHA-256
//! digest stored in configuration. The plaintext passcode is never stored.

use super::{AuthOutcome, DeviceAuthenticator};
use crate::config::SecretString;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a passcode
///
/// # Examples
///
/// ```
/// use catalog::adapters::device_auth::hash_passcode;
///
/// let digest = hash_passcode("1234");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn hash_passcode(passcode: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(passcode.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Authenticator backed by a configured passcode digest
pub struct PasscodeAuthenticator {
    expected_sha256: Option<SecretString>,
    attempt: Option<SecretString>,
}

impl PasscodeAuthenticator {
    /// Create an authenticator
    ///
    /// # Arguments
    ///
    /// * `expected_sha256` - Configured digest; `None` means no staff passcode is set up
    /// * `attempt` - Passcode entered by the person at the kiosk, if any
    pub fn new(expected_sha256: Option<SecretString>, attempt: Option<SecretString>) -> Self {
        Self {
            expected_sha256,
            attempt,
        }
    }
}

#[async_trait]
impl DeviceAuthenticator for PasscodeAuthenticator {
    fn can_authenticate(&self) -> bool {
        self.expected_sha256
            .as_ref()
            .is_some_and(|digest| !digest.expose_secret().is_empty())
    }

    async fn authenticate(&self, reason: &str) -> AuthOutcome {
        tracing::debug!(reason = %reason, "Staff passcode requested");

        let Some(expected) = self.expected_sha256.as_ref() else {
            return AuthOutcome::Failure("no staff passcode configured".to_string());
        };
        let Some(attempt) = self.attempt.as_ref() else {
            return AuthOutcome::Failure("no passcode entered".to_string());
        };

        let attempt: &str = attempt.expose_secret().as_ref();
        let expected: &str = expected.expose_secret().as_ref();
        if expected.eq_ignore_ascii_case(&hash_passcode(attempt)) {
            AuthOutcome::Success
        } else {
            AuthOutcome::Failure("passcode mismatch".to_string())
        }
    }
}
