//! Logging and observability
//!
//! Structured logging through `tracing`, with an optional rotating JSON file.
//! Patient identifiers and form contents are never logged; events carry the
//! patient name at most, and only at debug level.
//!
//! # Example
//!
//! ```no_run
//! use catalog::logging::init_logging;
//! use catalog::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Kiosk started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a kiosk check-in
///
/// # Example
///
/// ```no_run
/// use catalog::log_check_in;
///
/// log_check_in!("returning", true);
/// ```
#[macro_export]
macro_rules! log_check_in {
    ($kind:expr, $complete:expr) => {
        tracing::info!(kind = $kind, complete = $complete, "Patient checked in");
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use catalog::log_error_with_context;
/// use catalog::domain::CatalogError;
///
/// let error = CatalogError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a staff gate transition
///
/// # Example
///
/// ```no_run
/// use catalog::log_staff_gate;
///
/// log_staff_gate!("locked", "ttl expired");
/// ```
#[macro_export]
macro_rules! log_staff_gate {
    ($state:expr, $reason:expr) => {
        tracing::info!(state = $state, reason = $reason, "Staff gate changed");
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::CatalogError;

    #[test]
    fn test_macros_expand() {
        let error = CatalogError::Write("disk full".to_string());
        log_check_in!("new", false);
        log_error_with_context!(&error, "Saving record");
        log_staff_gate!("unlocked", "passcode");
    }
}
