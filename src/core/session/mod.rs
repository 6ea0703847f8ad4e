//! Kiosk session state machine
//!
//! A [`KioskSession`] tracks two independent things:
//!
//! - the patient flow: logged out, logged in, or filling in the intake form
//! - the [`StaffGate`], which guards the administrative operations
//!
//! The session keeps only the current patient's key (name and ID) and a
//! completeness flag. Records are always read from and written through the
//! [`PatientRecordStore`].
//!
//! # Example
//!
//! ```rust
//! use catalog::adapters::secret_store::InMemorySecretStore;
//! use catalog::config::CatalogConfig;
//! use catalog::core::session::{KioskSession, PatientState};
//! use catalog::core::store::PatientRecordStore;
//! use std::sync::Arc;
//!
//! let config = CatalogConfig::default();
//! let store = PatientRecordStore::new(Arc::new(InMemorySecretStore::new()), &config.store);
//! let mut session = KioskSession::new(store, &config.staff);
//!
//! let patient = session.check_in_new("Alice", "").unwrap();
//! assert_eq!(patient.id().as_str(), "3000");
//! session.logout();
//! assert_eq!(*session.state(), PatientState::LoggedOut);
//! ```

pub mod gate;

pub use gate::StaffGate;

use crate::adapters::device_auth::DeviceAuthenticator;
use crate::config::StaffConfig;
use crate::core::export::ExportSnapshot;
use crate::core::intake::IntakeForm;
use crate::core::store::PatientRecordStore;
use crate::domain::{CatalogError, PatientId, PatientName, PatientRecord, Result, COUNTER_KEY};
use crate::{log_check_in, log_error_with_context};
use chrono::NaiveDate;
use serde::Serialize;

/// Key of the logged-in patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPatient {
    name: PatientName,
    id: PatientId,
    complete: bool,
}

impl CurrentPatient {
    fn from_record(record: &PatientRecord) -> Result<Self> {
        Ok(Self {
            name: PatientName::new(record.name.as_str())?,
            id: PatientId::new(record.id.as_str())?,
            complete: record.is_complete(),
        })
    }

    pub fn name(&self) -> &PatientName {
        &self.name
    }

    pub fn id(&self) -> &PatientId {
        &self.id
    }

    /// Whether the consent form has been completed
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Patient flow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientState {
    LoggedOut,
    LoggedIn(CurrentPatient),
    IntakeInProgress(CurrentPatient),
}

/// Store summary shown to staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub backend: String,
    pub patients: usize,
    pub complete: usize,
    pub unreadable: usize,
    pub next_id: Option<u64>,
}

/// Single kiosk session
pub struct KioskSession {
    store: PatientRecordStore,
    patient: PatientState,
    staff: StaffGate,
}

impl KioskSession {
    /// Start a logged-out session with a locked staff gate
    pub fn new(store: PatientRecordStore, staff: &StaffConfig) -> Self {
        Self {
            store,
            patient: PatientState::LoggedOut,
            staff: StaffGate::new(staff),
        }
    }

    pub fn state(&self) -> &PatientState {
        &self.patient
    }

    pub fn store(&self) -> &PatientRecordStore {
        &self.store
    }

    /// The logged-in patient, whether or not a form is open
    pub fn current_patient(&self) -> Option<&CurrentPatient> {
        match &self.patient {
            PatientState::LoggedOut => None,
            PatientState::LoggedIn(p) | PatientState::IntakeInProgress(p) => Some(p),
        }
    }

    /// Register a new patient and log them in
    ///
    /// # Errors
    ///
    /// `InvalidState` if someone is already logged in, otherwise any error from
    /// [`PatientRecordStore::register`]. The session stays logged out on failure.
    pub fn check_in_new(&mut self, name: &str, supplied_id: &str) -> Result<&CurrentPatient> {
        self.require_logged_out()?;
        tracing::debug!(phase = "registering", "Patient check-in");
        let record = self.store.register(name, supplied_id)?;
        log_check_in!("new", record.is_complete());
        self.log_in(&record)
    }

    /// Log in a returning patient
    ///
    /// # Errors
    ///
    /// `InvalidState` if someone is already logged in, otherwise any error from
    /// [`PatientRecordStore::find`]. The session stays logged out on failure.
    pub fn check_in_returning(&mut self, name: &str, supplied_id: &str) -> Result<&CurrentPatient> {
        self.require_logged_out()?;
        tracing::debug!(phase = "authenticating", "Patient check-in");
        let record = self.store.find(name, supplied_id)?;
        log_check_in!("returning", record.is_complete());
        self.log_in(&record)
    }

    /// Open the intake form, pre-filled from a previous submission if any
    ///
    /// # Errors
    ///
    /// `InvalidState` unless a patient is logged in with no form open.
    pub fn begin_intake(&mut self) -> Result<IntakeForm> {
        let PatientState::LoggedIn(patient) = &self.patient else {
            return Err(CatalogError::InvalidState(
                "no logged-in patient to start a form for".to_string(),
            ));
        };

        let record = self.store.find(patient.name.as_str(), patient.id.as_str())?;
        let draft = match record.consent() {
            Ok(Some(previous)) => IntakeForm::from_consent(&previous),
            Ok(None) => IntakeForm::default(),
            Err(e) => {
                log_error_with_context!(&e, "Stored consent form unreadable; starting blank");
                IntakeForm::default()
            }
        };

        self.patient = PatientState::IntakeInProgress(patient.clone());
        Ok(draft)
    }

    /// Submit the open form, dated today
    ///
    /// # Errors
    ///
    /// See [`submit_intake_on`](Self::submit_intake_on).
    pub fn submit_intake(&mut self, draft: &IntakeForm) -> Result<()> {
        self.submit_intake_on(draft, chrono::Local::now().date_naive())
    }

    /// Submit the open form with an explicit submission date
    ///
    /// On success the patient returns to logged-in and is marked complete. On
    /// failure the form stays open.
    ///
    /// # Errors
    ///
    /// `InvalidState` if no form is open, `Validation` for empty fields,
    /// `Write` if the record could not be saved.
    pub fn submit_intake_on(&mut self, draft: &IntakeForm, submitted_on: NaiveDate) -> Result<()> {
        let PatientState::IntakeInProgress(patient) = &self.patient else {
            return Err(CatalogError::InvalidState("no intake form is open".to_string()));
        };

        let record = self.store.submit_intake(&patient.name, draft, submitted_on)?;
        let mut patient = patient.clone();
        patient.complete = record.is_complete();
        self.patient = PatientState::LoggedIn(patient);
        Ok(())
    }

    /// Close the open form without saving
    pub fn cancel_intake(&mut self) {
        if let PatientState::IntakeInProgress(patient) = &self.patient {
            self.patient = PatientState::LoggedIn(patient.clone());
        }
    }

    /// Documents the logged-in patient has completed
    pub fn completed_documents(&self) -> Result<Vec<&'static str>> {
        let patient = self.current_patient().ok_or_else(|| {
            CatalogError::InvalidState("no logged-in patient".to_string())
        })?;
        let record = self.store.find(patient.name.as_str(), patient.id.as_str())?;
        Ok(PatientRecordStore::completed_documents(&record))
    }

    /// End the patient's session
    pub fn logout(&mut self) {
        if !matches!(self.patient, PatientState::LoggedOut) {
            tracing::info!("Patient logged out");
        }
        self.patient = PatientState::LoggedOut;
    }

    /// Unlock the staff gate through device authentication
    ///
    /// # Errors
    ///
    /// See [`StaffGate::unlock`].
    pub async fn unlock_staff(&mut self, authenticator: &dyn DeviceAuthenticator) -> Result<()> {
        self.staff.unlock(authenticator).await
    }

    pub fn lock_staff(&mut self) {
        self.staff.lock("staff request");
    }

    /// The kiosk app went to the background
    pub fn on_background(&mut self) {
        self.staff.lock("app backgrounded");
    }

    pub fn is_staff_unlocked(&mut self) -> bool {
        self.staff.is_unlocked()
    }

    /// Snapshot every stored record
    ///
    /// # Errors
    ///
    /// `StaffLocked` unless the staff gate is unlocked.
    pub fn export_records(&mut self) -> Result<ExportSnapshot> {
        self.staff.require_unlocked()?;
        let snapshot = ExportSnapshot::from_listing(&self.store.list_all()?)?;
        tracing::info!(
            export_id = %snapshot.export_id,
            entries = snapshot.entries.len(),
            malformed = snapshot.malformed.len(),
            "Records exported"
        );
        Ok(snapshot)
    }

    /// Delete every record and the counter, logging out the current patient
    ///
    /// # Errors
    ///
    /// `StaffLocked` unless the staff gate is unlocked.
    pub fn purge_records(&mut self) -> Result<()> {
        self.staff.require_unlocked()?;
        self.store.delete_all()?;
        self.logout();
        Ok(())
    }

    /// Summarise the store
    ///
    /// # Errors
    ///
    /// `StaffLocked` unless the staff gate is unlocked.
    pub fn store_status(&mut self) -> Result<StoreStatus> {
        self.staff.require_unlocked()?;
        let listing = self.store.list_all()?;

        let mut status = StoreStatus {
            backend: self.store.backend_name().to_string(),
            patients: 0,
            complete: 0,
            unreadable: 0,
            next_id: self.store.counter()?,
        };
        for (name, blob) in listing.iter().filter(|(name, _)| *name != COUNTER_KEY) {
            match crate::core::codec::is_complete_blob(blob) {
                Ok(complete) => {
                    status.patients += 1;
                    if complete {
                        status.complete += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!(entry = %name, "Unreadable entry");
                    tracing::warn!(error = %e, "Unreadable entry in store");
                    status.unreadable += 1;
                }
            }
        }
        Ok(status)
    }

    fn require_logged_out(&self) -> Result<()> {
        match self.patient {
            PatientState::LoggedOut => Ok(()),
            _ => Err(CatalogError::InvalidState(
                "a patient is already logged in".to_string(),
            )),
        }
    }

    fn log_in(&mut self, record: &PatientRecord) -> Result<&CurrentPatient> {
        self.patient = PatientState::LoggedIn(CurrentPatient::from_record(record)?);
        match &self.patient {
            PatientState::LoggedIn(p) => Ok(p),
            _ => Err(CatalogError::InvalidState("login did not take effect".to_string())),
        }
    }
}
