//! Core kiosk logic for Catalog.
//!
//! # Modules
//!
//! - [`codec`] - Length-prefixed blob encoding of patient records
//! - [`store`] - Patient record store: registration, lookup, consent submission
//! - [`intake`] - Intake form sanitisation and validation
//! - [`session`] - Patient session flow and the staff gate
//! - [`export`] - Staff export snapshots with checksums
//!
//! # Check-in Workflow
//!
//! 1. **Check in**: a new patient registers (an ID is assigned if none is
//!    given) or a returning patient enters their name and ID
//! 2. **Intake**: the consent form is opened, pre-filled from any previous
//!    submission, and every keystroke is sanitised
//! 3. **Submit**: a fully filled form is written to the patient's record,
//!    which marks it complete
//! 4. **Log out**: the session forgets the patient
//!
//! Staff unlock the gate with device authentication to export or purge records.
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog::adapters::secret_store::create_secret_store;
//! use catalog::config::load_config;
//! use catalog::core::session::KioskSession;
//! use catalog::core::store::PatientRecordStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("catalog.toml")?;
//! let store = PatientRecordStore::new(create_secret_store(&config.store), &config.store);
//! let mut session = KioskSession::new(store, &config.staff);
//!
//! session.check_in_returning("Alice", "3000")?;
//! let draft = session.begin_intake()?;
//! // ... patient fills in the form ...
//! session.submit_intake(&draft)?;
//! session.logout();
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod export;
pub mod intake;
pub mod session;
pub mod store;
