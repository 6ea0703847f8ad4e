//! CLI command implementations
//!
//! Every command returns a process exit code:
//!
//! | code | meaning |
//! |---|---|
//! | 0 | success |
//! | 1 | request rejected (the patient-facing message is printed) |
//! | 2 | configuration error |
//! | 3 | staff authentication failed |
//! | 5 | fatal error |

pub mod check_in;
pub mod export;
pub mod init;
pub mod purge;
pub mod register;
pub mod status;
pub mod submit_form;
pub mod validate;

use crate::adapters::device_auth::PasscodeAuthenticator;
use crate::adapters::secret_store::create_secret_store;
use crate::config::{load_config, secret_string, CatalogConfig};
use crate::core::session::KioskSession;
use crate::core::store::PatientRecordStore;
use crate::domain::CatalogError;

pub(crate) const EXIT_OK: i32 = 0;
pub(crate) const EXIT_REJECTED: i32 = 1;
pub(crate) const EXIT_CONFIG: i32 = 2;
pub(crate) const EXIT_STAFF_AUTH: i32 = 3;
pub(crate) const EXIT_FATAL: i32 = 5;

/// Loads the configuration and opens a logged-out session over the configured store
///
/// On failure the error is printed and the configuration exit code returned.
pub(crate) fn open_session(config_path: &str) -> Result<(CatalogConfig, KioskSession), i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            println!("❌ Failed to load configuration file");
            println!("   Error: {e}");
            return Err(EXIT_CONFIG);
        }
    };

    let store = PatientRecordStore::new(create_secret_store(&config.store), &config.store);
    let session = KioskSession::new(store, &config.staff);
    Ok((config, session))
}

/// Exit code for an error raised by a kiosk operation
///
/// Patient-facing rejections print their kiosk message; anything else is fatal.
pub(crate) fn report_error(error: &CatalogError) -> i32 {
    match error {
        CatalogError::Validation { .. }
        | CatalogError::Conflict(_)
        | CatalogError::NotFound(_)
        | CatalogError::Auth(_)
        | CatalogError::InvalidState(_) => {
            tracing::debug!(error = %error, "Request rejected");
            println!("❌ {}", error.user_message());
            if let CatalogError::Validation { missing_fields } = error {
                if !missing_fields.is_empty() {
                    println!("   Missing: {}", missing_fields.join(", "));
                }
            }
            EXIT_REJECTED
        }
        CatalogError::AuthUnavailable
        | CatalogError::AuthFailed(_)
        | CatalogError::AuthTimedOut(_)
        | CatalogError::StaffLocked => {
            println!("🔒 {}", error.user_message());
            EXIT_STAFF_AUTH
        }
        CatalogError::Configuration(_) => {
            println!("❌ {}", error.user_message());
            println!("   Error: {error}");
            EXIT_CONFIG
        }
        _ => {
            crate::log_error_with_context!(error, "Kiosk operation failed");
            println!("❌ {}", error.user_message());
            EXIT_FATAL
        }
    }
}

/// Unlocks the session's staff gate with the passcode entered on the command line
pub(crate) async fn unlock_staff(
    config: &CatalogConfig,
    session: &mut KioskSession,
    passcode: Option<&str>,
) -> Result<(), i32> {
    let authenticator = PasscodeAuthenticator::new(
        config.staff.passcode_sha256.clone(),
        passcode.map(|p| secret_string(p.to_string())),
    );
    session
        .unlock_staff(&authenticator)
        .await
        .map_err(|e| report_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_exit_one() {
        assert_eq!(report_error(&CatalogError::missing(["name"])), EXIT_REJECTED);
        assert_eq!(
            report_error(&CatalogError::Auth("Alice".to_string())),
            EXIT_REJECTED
        );
    }

    #[test]
    fn test_staff_errors_exit_three() {
        assert_eq!(report_error(&CatalogError::StaffLocked), EXIT_STAFF_AUTH);
        assert_eq!(report_error(&CatalogError::AuthTimedOut(60)), EXIT_STAFF_AUTH);
    }

    #[test]
    fn test_store_errors_are_fatal() {
        assert_eq!(
            report_error(&CatalogError::Write("disk full".to_string())),
            EXIT_FATAL
        );
    }

    #[test]
    fn test_open_session_missing_config() {
        assert!(matches!(
            open_session("does-not-exist.toml"),
            Err(EXIT_CONFIG)
        ));
    }
}
