//! Record codec
//!
//! Converts a [`PatientRecord`] to and from the opaque blob kept in the secret
//! store. A blob is the magic prefix `CKR1` followed by netstrings:
//!
//! ```text
//! blob      := "CKR1" netstring*
//! netstring := <decimal byte length> ":" <utf-8 bytes> ","
//! sequence  := name, id, <consent count>, consent..., <invoice count>, invoice...
//! ```
//!
//! Values may contain any character, delimiters included, because field
//! boundaries come from the length prefix.
//!
//! # Examples
//!
//! ```
//! use catalog::core::codec::{decode, encode};
//! use catalog::domain::PatientRecord;
//!
//! let record = PatientRecord {
//!     name: "Alice".to_string(),
//!     id: "3000".to_string(),
//!     consent_form: Vec::new(),
//!     invoice: Vec::new(),
//! };
//! let blob = encode(&record);
//! assert_eq!(blob, b"CKR15:Alice,4:3000,1:0,1:0,");
//! assert_eq!(decode(&blob).unwrap(), record);
//! ```

use crate::domain::consent::COMPLETENESS_FIELD_INDEX;
use crate::domain::{CatalogError, PatientRecord, Result};

/// Magic prefix identifying the blob format version
pub const MAGIC: &[u8] = b"CKR1";

/// Minimum number of fields in a valid blob: name, id and both section counts
pub const MIN_FIELDS: usize = 4;

/// Encodes a record into its stored blob
pub fn encode(record: &PatientRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAGIC.len() + 16 * (4 + record.consent_form.len()));
    out.extend_from_slice(MAGIC);

    write_field(&mut out, &record.name);
    write_field(&mut out, &record.id);
    write_section(&mut out, &record.consent_form);
    write_section(&mut out, &record.invoice);

    out
}

/// Decodes a stored blob into a record
///
/// # Errors
///
/// Returns `CatalogError::MalformedRecord` if the blob is not a well-formed
/// encoding of a record.
pub fn decode(blob: &[u8]) -> Result<PatientRecord> {
    let fields = decode_fields(blob)?;
    let mut fields = fields.into_iter();

    // decode_fields guarantees at least MIN_FIELDS
    let name = fields.next().unwrap_or_default();
    let id = fields.next().unwrap_or_default();
    let rest: Vec<String> = fields.collect();

    let (consent_form, rest) = take_section(&rest, "consent form")?;
    let (invoice, rest) = take_section(rest, "invoice")?;

    if !rest.is_empty() {
        return Err(CatalogError::MalformedRecord(format!(
            "{} trailing field(s) after invoice section",
            rest.len()
        )));
    }

    Ok(PatientRecord {
        name,
        id,
        consent_form,
        invoice,
    })
}

/// Returns the flat list of fields stored in a blob
///
/// # Errors
///
/// Returns `CatalogError::MalformedRecord` if the framing is invalid or fewer
/// than [`MIN_FIELDS`] fields are present.
pub fn decode_fields(blob: &[u8]) -> Result<Vec<String>> {
    let body = blob
        .strip_prefix(MAGIC)
        .ok_or_else(|| CatalogError::MalformedRecord("missing CKR1 prefix".to_string()))?;

    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < body.len() {
        let (value, next) = read_field(body, pos)?;
        fields.push(value);
        pos = next;
    }

    if fields.len() < MIN_FIELDS {
        return Err(CatalogError::MalformedRecord(format!(
            "blob has {} field(s), expected at least {}",
            fields.len(),
            MIN_FIELDS
        )));
    }

    Ok(fields)
}

/// Number of fields stored in a blob
///
/// # Errors
///
/// Same as [`decode_fields`].
pub fn field_count(blob: &[u8]) -> Result<usize> {
    decode_fields(blob).map(|fields| fields.len())
}

/// Completeness check on an encoded record
///
/// Uses the section structure, so a reason-for-visit value containing
/// delimiters is still read as one field.
///
/// # Errors
///
/// Returns `CatalogError::MalformedRecord` if the blob does not decode.
pub fn is_complete_blob(blob: &[u8]) -> Result<bool> {
    let fields = decode_fields(blob)?;
    let (consent, _) = take_section(&fields[2..], "consent form")?;
    Ok(consent
        .get(COMPLETENESS_FIELD_INDEX)
        .is_some_and(|field| !field.is_empty()))
}

fn write_field(out: &mut Vec<u8>, value: &str) {
    out.extend_from_slice(value.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(value.as_bytes());
    out.push(b',');
}

fn write_section(out: &mut Vec<u8>, fields: &[String]) {
    write_field(out, &fields.len().to_string());
    for field in fields {
        write_field(out, field);
    }
}

/// Reads one netstring starting at `pos`, returning the value and the offset
/// just past its terminator
fn read_field(body: &[u8], pos: usize) -> Result<(String, usize)> {
    let colon = body[pos..]
        .iter()
        .position(|&b| b == b':')
        .map(|offset| pos + offset)
        .ok_or_else(|| {
            CatalogError::MalformedRecord(format!("missing length separator at byte {pos}"))
        })?;

    let len = parse_canonical(&body[pos..colon]).ok_or_else(|| {
        CatalogError::MalformedRecord(format!("invalid length prefix at byte {pos}"))
    })?;

    let start = colon + 1;
    let end = start
        .checked_add(len)
        .filter(|&end| end < body.len())
        .ok_or_else(|| {
            CatalogError::MalformedRecord(format!("field at byte {pos} overruns the blob"))
        })?;

    if body[end] != b',' {
        return Err(CatalogError::MalformedRecord(format!(
            "missing terminator after field at byte {pos}"
        )));
    }

    let value = std::str::from_utf8(&body[start..end]).map_err(|e| {
        CatalogError::MalformedRecord(format!("field at byte {pos} is not UTF-8: {e}"))
    })?;

    Ok((value.to_string(), end + 1))
}

/// Parses a decimal integer with no sign, no leading zeros and no padding
fn parse_canonical(digits: &[u8]) -> Option<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn take_section<'a>(fields: &'a [String], label: &str) -> Result<(Vec<String>, &'a [String])> {
    let (count, rest) = fields.split_first().ok_or_else(|| {
        CatalogError::MalformedRecord(format!("missing {label} count"))
    })?;

    let count = parse_canonical(count.as_bytes())
        .ok_or_else(|| CatalogError::MalformedRecord(format!("invalid {label} count")))?;

    if count > rest.len() {
        return Err(CatalogError::MalformedRecord(format!(
            "{label} declares {count} field(s) but only {} remain",
            rest.len()
        )));
    }

    let (section, rest) = rest.split_at(count);
    Ok((section.to_vec(), rest))
}
