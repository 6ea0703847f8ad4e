//! Patient record store
//!
//! The sole reader and writer of patient records. Records live in a
//! [`SecretStore`] keyed by patient name, encoded with [`codec`]. The
//! sequential ID counter is kept in the same store under the reserved name
//! [`COUNTER_KEY`].
//!
//! `register` updates the counter with an unguarded read-modify-write, so only
//! one registration may be in flight at a time. The kiosk runs a single session,
//! which satisfies this.

use crate::adapters::secret_store::SecretStore;
use crate::config::{DuplicateNamePolicy, StoreConfig};
use crate::core::codec;
use crate::core::intake::IntakeForm;
use crate::domain::{
    CatalogError, ConsentForm, PatientId, PatientName, PatientRecord, Result, StoreError,
    COUNTER_KEY,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Record store over a secret store backend
pub struct PatientRecordStore {
    backend: Arc<dyn SecretStore>,
    counter_start: u64,
    duplicate_names: DuplicateNamePolicy,
}

impl PatientRecordStore {
    /// Create a store using the counter start and duplicate-name policy from config
    pub fn new(backend: Arc<dyn SecretStore>, config: &StoreConfig) -> Self {
        Self {
            backend,
            counter_start: config.counter_start,
            duplicate_names: config.duplicate_names,
        }
    }

    /// Name of the backend in use, for status output
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Register a new patient
    ///
    /// An empty `supplied_id` assigns the next sequential ID. A numeric
    /// `supplied_id` moves the counter past it; any other ID leaves the counter
    /// alone.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is blank
    /// - `Conflict` for the reserved counter name, or for an existing name when
    ///   duplicates are rejected
    /// - `Store`/`MalformedRecord` if the backend or the stored counter is broken
    pub fn register(&self, name: &str, supplied_id: &str) -> Result<PatientRecord> {
        let name = PatientName::new(name)?;
        if name.is_reserved() {
            return Err(CatalogError::Conflict(name.into_inner()));
        }

        tracing::debug!(patient = %name, "Registering patient");

        let supplied = supplied_id.trim();
        let (id, next_counter) = if supplied.is_empty() {
            let current = self.counter()?.unwrap_or(self.counter_start);
            let next = current.checked_add(1).ok_or_else(|| {
                CatalogError::Store(StoreError::Other("ID counter exhausted".to_string()))
            })?;
            (PatientId::from_sequence(current), Some(next))
        } else {
            let id = PatientId::new(supplied)?;
            let next = match id.sequence_number() {
                Some(n) => self.advance_counter_past(n)?,
                None => None,
            };
            (id, next)
        };

        let record = PatientRecord::new(&name, &id);
        let blob = codec::encode(&record);

        match self.backend.add(name.as_str(), &blob) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => match self.duplicate_names {
                DuplicateNamePolicy::Reject => {
                    return Err(CatalogError::Conflict(name.into_inner()));
                }
                DuplicateNamePolicy::Replace => {
                    tracing::debug!(patient = %name, "Replacing stored record");
                    tracing::warn!("Name already registered; replacing stored record");
                    self.backend.update(name.as_str(), &blob)?;
                }
            },
            Err(e) => return Err(e.into()),
        }

        if let Some(next) = next_counter {
            self.write_counter(next)?;
        }

        tracing::info!(assigned = supplied.is_empty(), "Patient registered");
        Ok(record)
    }

    /// Look up a returning patient
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record exists for the name
    /// - `Auth` if the stored ID does not match `supplied_id`
    /// - `Conflict` for the reserved counter name
    pub fn find(&self, name: &str, supplied_id: &str) -> Result<PatientRecord> {
        let name = PatientName::new(name)?;
        if name.is_reserved() {
            return Err(CatalogError::Conflict(name.into_inner()));
        }
        let id = PatientId::new(supplied_id)?;

        let record = self.fetch_record(&name)?;
        if record.id != id.as_str() {
            tracing::debug!(patient = %name, "Patient ID mismatch");
            return Err(CatalogError::Auth(name.into_inner()));
        }
        Ok(record)
    }

    /// Store a submitted consent form on an existing record
    ///
    /// Every field is checked before any I/O, including the character rules
    /// the intake form applies while typing. The record's name, ID and invoice
    /// are preserved.
    ///
    /// # Errors
    ///
    /// - `Validation` if any form field is empty or breaks its character rules
    /// - `Write` if the record cannot be read back or rewritten
    pub fn submit_consent_form(
        &self,
        name: &PatientName,
        form: &ConsentForm,
    ) -> Result<PatientRecord> {
        let form = IntakeForm::from_consent(form).validate(form.submitted_on)?;

        let existing = self.fetch_record(name).map_err(|e| {
            tracing::debug!(patient = %name, error = %e, "Consent form target unreadable");
            CatalogError::Write(format!("could not load record: {e}"))
        })?;
        let updated = existing.with_consent_form(&form);

        self.backend
            .update(name.as_str(), &codec::encode(&updated))
            .map_err(|e| {
                tracing::debug!(patient = %name, error = %e, "Consent form write failed");
                CatalogError::Write(format!("could not save record: {e}"))
            })?;

        tracing::info!(complete = updated.is_complete(), "Consent form submitted");
        Ok(updated)
    }

    /// Validate a draft and store it
    ///
    /// # Errors
    ///
    /// Same as [`submit_consent_form`](Self::submit_consent_form).
    pub fn submit_intake(
        &self,
        name: &PatientName,
        draft: &IntakeForm,
        submitted_on: chrono::NaiveDate,
    ) -> Result<PatientRecord> {
        let form = draft.validate(submitted_on)?;
        self.submit_consent_form(name, &form)
    }

    /// Every stored entry, counter included, sorted by name
    pub fn list_all(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        Ok(self.backend.list_all()?)
    }

    /// Remove every record, counter included
    pub fn delete_all(&self) -> Result<()> {
        self.backend.delete_all_of_class()?;
        tracing::warn!("All patient records deleted");
        Ok(())
    }

    /// Whether a record has a submitted consent form with a reason for visit
    pub fn is_complete(record: &PatientRecord) -> bool {
        record.is_complete()
    }

    /// Documents the patient has completed
    pub fn completed_documents(record: &PatientRecord) -> Vec<&'static str> {
        record.completed_documents()
    }

    /// Next sequential ID to be assigned, if the counter exists
    ///
    /// # Errors
    ///
    /// Returns `MalformedRecord` if the stored counter is not a number.
    pub fn counter(&self) -> Result<Option<u64>> {
        let blob = match self.backend.fetch(COUNTER_KEY) {
            Ok(blob) => blob,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let counter = codec::decode(&blob)?;
        counter.id.parse().map(Some).map_err(|_| {
            CatalogError::MalformedRecord(format!("counter value '{}' is not a number", counter.id))
        })
    }

    /// Returns the counter value to store after a numeric ID was supplied,
    /// or `None` if the stored counter is already past it
    ///
    /// An ID with no successor is treated like a non-numeric one.
    fn advance_counter_past(&self, supplied: u64) -> Result<Option<u64>> {
        let Some(candidate) = supplied.checked_add(1) else {
            return Ok(None);
        };
        Ok(match self.counter()? {
            Some(current) if current >= candidate => None,
            Some(_) => Some(candidate),
            None => Some(candidate.max(self.counter_start)),
        })
    }

    fn write_counter(&self, value: u64) -> Result<()> {
        let counter = PatientRecord {
            name: COUNTER_KEY.to_string(),
            id: value.to_string(),
            consent_form: Vec::new(),
            invoice: Vec::new(),
        };
        self.backend.upsert(COUNTER_KEY, &codec::encode(&counter))?;
        tracing::debug!(next_id = value, "Counter updated");
        Ok(())
    }

    fn fetch_record(&self, name: &PatientName) -> Result<PatientRecord> {
        match self.backend.fetch(name.as_str()) {
            Ok(blob) => codec::decode(&blob),
            Err(StoreError::NotFound(_)) => Err(CatalogError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::secret_store::InMemorySecretStore;
    use crate::domain::{Gender, INVALID_CREDENTIALS_MESSAGE};
    use chrono::NaiveDate;

    fn store() -> PatientRecordStore {
        store_with(StoreConfig::default())
    }

    fn store_with(config: StoreConfig) -> PatientRecordStore {
        PatientRecordStore::new(Arc::new(InMemorySecretStore::new()), &config)
    }

    fn consent() -> ConsentForm {
        ConsentForm {
            birth_date: NaiveDate::from_ymd_opt(1985, 4, 12).unwrap(),
            gender: Gender::Female,
            address: "12 Elm St.".to_string(),
            postal_code: "A1B2C3".to_string(),
            home_phone: "555 1234".to_string(),
            cell_phone: "555 9876".to_string(),
            email: "alice@example.com".to_string(),
            emergency_contact: "Bob".to_string(),
            relationship: "Brother".to_string(),
            contact_phone: "555 0000".to_string(),
            reason_for_visit: "Checkup".to_string(),
            submitted_on: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
        }
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let store = store();
        assert_eq!(store.counter().unwrap(), None);

        let alice = store.register("Alice", "").unwrap();
        assert_eq!(alice.id, "3000");
        assert_eq!(store.counter().unwrap(), Some(3001));

        let bob = store.register("Bob", "  ").unwrap();
        assert_eq!(bob.id, "3001");
        assert_eq!(store.counter().unwrap(), Some(3002));
    }

    #[test]
    fn test_register_reserved_name_conflicts() {
        let store = store();
        for id in ["", "1234", "secret"] {
            let err = store.register(COUNTER_KEY, id).unwrap_err();
            assert!(matches!(err, CatalogError::Conflict(_)));
            assert_eq!(err.user_message(), "Conflicting name.");
        }
        assert_eq!(store.counter().unwrap(), None);
    }

    #[test]
    fn test_register_blank_name() {
        let err = store().register("   ", "").unwrap_err();
        assert_eq!(err.user_message(), "Missing information.");
    }

    #[test]
    fn test_numeric_ids_advance_counter_monotonically() {
        let store = store();
        store.register("Alice", "5000").unwrap();
        assert_eq!(store.counter().unwrap(), Some(5001));

        store.register("Bob", "4000").unwrap();
        assert_eq!(store.counter().unwrap(), Some(5001));

        let carol = store.register("Carol", "").unwrap();
        assert_eq!(carol.id, "5001");
    }

    #[test]
    fn test_small_numeric_id_initialises_counter_at_start() {
        let store = store();
        store.register("Alice", "12").unwrap();
        assert_eq!(store.counter().unwrap(), Some(3000));
    }

    #[test]
    fn test_non_numeric_id_leaves_counter() {
        let store = store();
        store.register("Alice", "pa55word").unwrap();
        assert_eq!(store.counter().unwrap(), None);
    }

    #[test]
    fn test_custom_counter_start() {
        let store = store_with(StoreConfig {
            counter_start: 100,
            ..StoreConfig::default()
        });
        assert_eq!(store.register("Alice", "").unwrap().id, "100");
    }

    #[test]
    fn test_duplicate_name_replaces_by_default() {
        let store = store();
        store.register("Alice", "1111").unwrap();
        store.register("Alice", "2222").unwrap();

        assert!(store.find("Alice", "2222").is_ok());
        assert!(matches!(
            store.find("Alice", "1111"),
            Err(CatalogError::Auth(_))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected_by_policy() {
        let store = store_with(StoreConfig {
            duplicate_names: DuplicateNamePolicy::Reject,
            ..StoreConfig::default()
        });
        store.register("Alice", "secret").unwrap();
        let err = store.register("Alice", "").unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));

        // rejected registration consumed no ID
        assert_eq!(store.counter().unwrap(), None);
        assert!(store.find("Alice", "secret").is_ok());
    }

    #[test]
    fn test_find_after_register() {
        let store = store();
        store.register("Alice", "").unwrap();
        let found = store.find(" Alice ", "3000").unwrap();
        assert!(found.consent_form.is_empty());
        assert!(!PatientRecordStore::is_complete(&found));
    }

    #[test]
    fn test_find_failures_share_message() {
        let store = store();
        store.register("Alice", "").unwrap();

        let wrong_id = store.find("Alice", "wrong").unwrap_err();
        let unknown = store.find("Bob", "anything").unwrap_err();
        assert!(matches!(wrong_id, CatalogError::Auth(_)));
        assert!(matches!(unknown, CatalogError::NotFound(_)));
        assert_eq!(wrong_id.user_message(), unknown.user_message());
        assert_eq!(unknown.user_message(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn test_find_counter_conflicts() {
        let store = store();
        store.register("Alice", "").unwrap();
        assert!(matches!(
            store.find(COUNTER_KEY, "3001"),
            Err(CatalogError::Conflict(_))
        ));
    }

    #[test]
    fn test_submit_consent_form_completes_record() {
        let store = store();
        let alice = store.register("Alice", "").unwrap();
        let name = PatientName::new("Alice").unwrap();

        let updated = store.submit_consent_form(&name, &consent()).unwrap();
        assert_eq!(updated.id, alice.id);
        assert!(PatientRecordStore::is_complete(&updated));
        assert_eq!(
            PatientRecordStore::completed_documents(&updated),
            vec!["Patient Consent Form"]
        );

        let found = store.find("Alice", &alice.id).unwrap();
        assert_eq!(found.consent().unwrap(), Some(consent()));
    }

    #[test]
    fn test_submit_with_empty_field_writes_nothing() {
        let store = store();
        store.register("Alice", "").unwrap();
        let before = store.list_all().unwrap();

        let mut form = consent();
        form.email.clear();
        let err = store
            .submit_consent_form(&PatientName::new("Alice").unwrap(), &form)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));
        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn test_submit_for_unknown_patient_is_write_error() {
        let err = store()
            .submit_consent_form(&PatientName::new("Ghost").unwrap(), &consent())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Write(_)));
        assert_eq!(err.user_message(), "Could not submit entries.");
    }

    #[test]
    fn test_resubmission_overwrites() {
        let store = store();
        store.register("Alice", "").unwrap();
        let name = PatientName::new("Alice").unwrap();
        store.submit_consent_form(&name, &consent()).unwrap();

        let mut second = consent();
        second.reason_for_visit = "Follow up".to_string();
        store.submit_consent_form(&name, &second).unwrap();

        let found = store.find("Alice", "3000").unwrap();
        assert_eq!(found.consent().unwrap().unwrap().reason_for_visit, "Follow up");
    }

    #[test]
    fn test_list_all_includes_counter() {
        let store = store();
        store.register("Bob", "").unwrap();
        store.register("Alice", "").unwrap();

        let names: Vec<_> = store.list_all().unwrap().into_keys().collect();
        assert_eq!(names, vec!["Alice", "Bob", COUNTER_KEY]);
    }

    #[test]
    fn test_delete_all_then_find() {
        let store = store();
        store.register("Alice", "").unwrap();
        store.delete_all().unwrap();

        assert!(matches!(
            store.find("Alice", "3000"),
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(store.counter().unwrap(), None);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_largest_numeric_id_leaves_counter() {
        let store = store();
        store.register("Alice", "18446744073709551615").unwrap();
        assert_eq!(store.counter().unwrap(), None);

        let bob = store.register("Bob", "").unwrap();
        assert_eq!(bob.id, "3000");
        assert_eq!(store.counter().unwrap(), Some(3001));
    }

    #[test]
    fn test_exhausted_counter_is_an_error_not_a_wrap() {
        let store = store();
        store.register("Alice", "18446744073709551614").unwrap();
        assert_eq!(store.counter().unwrap(), Some(u64::MAX));

        let err = store.register("Bob", "").unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::Other(_))));
        assert_eq!(store.counter().unwrap(), Some(u64::MAX));
        assert!(matches!(
            store.find("Bob", "18446744073709551615"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_submit_rejects_text_outside_character_rules() {
        let store = store();
        store.register("Alice", "").unwrap();
        let before = store.list_all().unwrap();
        let name = PatientName::new("Alice").unwrap();

        let mut form = consent();
        form.postal_code = "a1b2c3d4e5".to_string();
        form.address = "12 Elm St; DROP".to_string();
        form.reason_for_visit = "Cough; fever?".to_string();

        match store.submit_consent_form(&name, &form).unwrap_err() {
            CatalogError::Validation { missing_fields } => assert_eq!(
                missing_fields,
                vec!["address", "postal code", "reason for visit"]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn test_write_error_omits_patient_name() {
        let err = store()
            .submit_consent_form(&PatientName::new("Jane Roe").unwrap(), &consent())
            .unwrap_err();
        assert!(matches!(err, CatalogError::Write(_)));
        assert!(!err.to_string().contains("Jane Roe"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_patient_names_stay_out_of_info_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let store = store();
            store.register("Jane Roe", "").unwrap();
            store.register("Jane Roe", "").unwrap();
            let _ = store.submit_consent_form(&PatientName::new("John Doe").unwrap(), &consent());
        });

        let output = logs.contents();
        assert!(output.contains("Name already registered"));
        assert!(!output.contains("Jane Roe"));
        assert!(!output.contains("John Doe"));
    }
}
