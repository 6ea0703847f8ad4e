// Catalog - Clinic check-in kiosk
// Copyright (c) 2025 Catalog Contributors
// Licensed under the MIT License

//! # Catalog - Clinic check-in kiosk
//!
//! Catalog is the core of a patient check-in kiosk: patients register or check
//! in with their name and an ID, fill in a consent form, and staff can export
//! or purge the stored records after authenticating on the device.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Record codec, record store, intake validation, session state
//! - [`adapters`] - Secret store backends and device authentication
//! - [`domain`] - Patient records, consent forms, identifiers, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use catalog::adapters::secret_store::InMemorySecretStore;
//! use catalog::config::CatalogConfig;
//! use catalog::core::intake::TextField;
//! use catalog::core::session::KioskSession;
//! use catalog::core::store::PatientRecordStore;
//! use catalog::domain::Gender;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), catalog::domain::CatalogError> {
//! let config = CatalogConfig::default();
//! let store = PatientRecordStore::new(Arc::new(InMemorySecretStore::new()), &config.store);
//! let mut session = KioskSession::new(store, &config.staff);
//!
//! session.check_in_new("Alice Smith", "")?;
//! let mut form = session.begin_intake()?;
//! form.set_birth_date_str("1985-04-12")?;
//! form.set_gender(Gender::Female);
//! for field in TextField::ALL {
//!     form.set_text(field, "1");
//! }
//! session.submit_intake(&form)?;
//! assert!(session.current_patient().unwrap().is_complete());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`]. Each
//! [`domain::CatalogError`] maps to the message shown on the kiosk through
//! `user_message()`; an unknown name and a wrong ID share one message.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
