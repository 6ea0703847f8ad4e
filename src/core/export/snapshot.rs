//! Export snapshot
//!
//! Decodes every stored blob into an [`ExportEntry`]. Blobs that fail to decode
//! are listed by name in `malformed` instead of aborting the export.

use super::checksum::calculate_checksum;
use crate::core::codec;
use crate::domain::context::ResultExt;
use crate::domain::{CatalogError, ConsentForm, Result, COUNTER_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Output format for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// `Name: ...` / `Data: ...` lines
    #[default]
    Text,
    /// Pretty-printed JSON snapshot
    Json,
}

impl FromStr for ExportFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(CatalogError::Configuration(format!(
                "Invalid export format '{other}'. Must be one of: text, json"
            ))),
        }
    }
}

/// One exported patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub name: String,
    pub id: String,
    pub complete: bool,
    pub documents: Vec<String>,
    /// Typed consent form; `None` before submission or if the fields don't parse
    pub consent: Option<ConsentForm>,
    /// Stored consent fields as-is
    pub consent_fields: Vec<String>,
}

/// Point-in-time export of the record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub export_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Next sequential ID at export time
    pub counter: Option<u64>,
    pub entries: Vec<ExportEntry>,
    /// Names whose blobs could not be decoded
    pub malformed: Vec<String>,
    /// SHA-256 over `entries`
    pub checksum: String,
}

impl ExportSnapshot {
    /// Build a snapshot from the raw store listing
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the checksum cannot be computed.
    pub fn from_listing(listing: &BTreeMap<String, Vec<u8>>) -> Result<Self> {
        let mut entries = Vec::new();
        let mut malformed = Vec::new();
        let mut counter = None;

        for (name, blob) in listing {
            let record = match codec::decode(blob) {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(entry = %name, "Undecodable entry");
                    tracing::warn!(error = %e, "Skipping undecodable entry");
                    malformed.push(name.clone());
                    continue;
                }
            };

            if name == COUNTER_KEY {
                counter = record.id.parse().ok();
                continue;
            }

            entries.push(ExportEntry {
                complete: record.is_complete(),
                documents: record
                    .completed_documents()
                    .into_iter()
                    .map(String::from)
                    .collect(),
                consent: record.consent().ok().flatten(),
                consent_fields: record.consent_form,
                name: record.name,
                id: record.id,
            });
        }

        let checksum = calculate_checksum(&entries)?;

        Ok(Self {
            export_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            counter,
            entries,
            malformed,
            checksum,
        })
    }

    /// Checks that `checksum` still matches the entries
    pub fn verify(&self) -> Result<bool> {
        Ok(calculate_checksum(&self.entries)? == self.checksum)
    }

    /// Renders one `Name:` / `Data:` block per patient
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let status = if entry.complete {
                "complete"
            } else {
                "incomplete"
            };
            out.push_str(&format!(
                "Name: {}\nData: id={}; consent form {}; fields=[{}]\n\n",
                entry.name,
                entry.id,
                status,
                entry.consent_fields.join(" | ")
            ));
        }
        for name in &self.malformed {
            out.push_str(&format!("Name: {name}\nData: <unreadable>\n\n"));
        }
        out
    }

    /// Renders the snapshot as pretty-printed JSON
    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders in the requested format
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Text => Ok(self.render_text()),
            ExportFormat::Json => self.render_json(),
        }
    }

    /// Writes the rendered snapshot to `path`
    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<()> {
        let rendered = self.render(format)?;
        std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write export to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PatientRecord;

    fn listing() -> BTreeMap<String, Vec<u8>> {
        let mut consent = vec!["x".to_string(); 12];
        consent[0] = "1985-04-12".to_string();
        consent[1] = "Female".to_string();
        consent[11] = "2024-06-14".to_string();

        let alice = PatientRecord {
            name: "Alice".to_string(),
            id: "3000".to_string(),
            consent_form: consent,
            invoice: Vec::new(),
        };
        let bob = PatientRecord {
            name: "Bob".to_string(),
            id: "3001".to_string(),
            consent_form: Vec::new(),
            invoice: Vec::new(),
        };
        let counter = PatientRecord {
            name: COUNTER_KEY.to_string(),
            id: "3002".to_string(),
            consent_form: Vec::new(),
            invoice: Vec::new(),
        };

        let mut map = BTreeMap::new();
        map.insert("Alice".to_string(), codec::encode(&alice));
        map.insert("Bob".to_string(), codec::encode(&bob));
        map.insert(COUNTER_KEY.to_string(), codec::encode(&counter));
        map.insert("Broken".to_string(), b"Alice,3000".to_vec());
        map
    }

    #[test]
    fn test_snapshot_from_listing() {
        let snapshot = ExportSnapshot::from_listing(&listing()).unwrap();
        assert_eq!(snapshot.counter, Some(3002));
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.malformed, vec!["Broken".to_string()]);

        let alice = &snapshot.entries[0];
        assert!(alice.complete);
        assert_eq!(alice.documents, vec!["Patient Consent Form".to_string()]);
        assert!(alice.consent.is_some());

        assert!(!snapshot.entries[1].complete);
        assert!(snapshot.verify().unwrap());
    }

    #[test]
    fn test_tampering_breaks_checksum() {
        let mut snapshot = ExportSnapshot::from_listing(&listing()).unwrap();
        snapshot.entries[1].id = "9999".to_string();
        assert!(!snapshot.verify().unwrap());
    }

    #[test]
    fn test_render_text() {
        let text = ExportSnapshot::from_listing(&listing())
            .unwrap()
            .render_text();
        assert!(text.contains("Name: Alice\nData: id=3000; consent form complete;"));
        assert!(text.contains("Name: Bob\nData: id=3001; consent form incomplete; fields=[]"));
        assert!(text.contains("Name: Broken\nData: <unreadable>"));
        assert!(!text.contains("Name: Count"));
    }

    #[test]
    fn test_render_json_roundtrip() {
        let snapshot = ExportSnapshot::from_listing(&listing()).unwrap();
        let json = snapshot.render(ExportFormat::Json).unwrap();
        let parsed: ExportSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entries, snapshot.entries);
        assert_eq!(parsed.checksum, snapshot.checksum);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        let snapshot = ExportSnapshot::from_listing(&listing()).unwrap();
        snapshot.write_to(&path, ExportFormat::Text).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), snapshot.render_text());
    }

    #[test]
    fn test_write_to_missing_dir_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("export.txt");
        let snapshot = ExportSnapshot::from_listing(&BTreeMap::new()).unwrap();
        assert!(matches!(
            snapshot.write_to(&path, ExportFormat::Text),
            Err(CatalogError::Io(_))
        ));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
