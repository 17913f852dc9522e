use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::domain::{Incident, ValidationWarning};
use crate::error::AppError;
use crate::normalize::timestamps::normalize_timestamp;

/// Envelope keys the incident endpoint has been seen to wrap its list in.
const ENVELOPE_KEYS: [&str; 3] = ["data", "incidents", "items"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestedIncident {
    pub fingerprint: String,
    pub incident: Incident,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConflict {
    /// Zero-based position in the source array.
    pub index: usize,
    pub reason: String,
    pub id: Option<String>,
    pub fingerprint: String,
    /// Position of the document that was kept.
    pub kept_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentBatch {
    pub incidents: Vec<IngestedIncident>,
    pub skipped: usize,
    pub conflicts: Vec<IngestConflict>,
    pub warnings: Vec<ValidationWarning>,
}

fn normalize_for_fingerprint(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Stable fingerprint from normalized title, location, and createdAt.
///
/// `createdAt` is hashed in its canonical RFC3339 UTC form, so the same instant written with a
/// different offset collides. Unparseable values fall back to the trimmed raw text.
pub fn fingerprint(incident: &Incident) -> String {
    let raw_created = incident.created_at.as_deref().unwrap_or("");
    let created = normalize_timestamp("createdAt", raw_created, &mut Vec::new());
    let payload = format!(
        "title={}|location={}|created={}",
        normalize_for_fingerprint(&incident.title),
        normalize_for_fingerprint(incident.location.as_deref().unwrap_or("")),
        created
            .canonical_rfc3339_utc
            .as_deref()
            .unwrap_or(raw_created.trim())
    );
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Documents kept so far, by id and by fingerprint.
#[derive(Default)]
struct SeenDocuments {
    ids: BTreeMap<String, usize>,
    fingerprints: BTreeMap<String, Vec<(usize, Option<String>)>>,
}

impl SeenDocuments {
    /// Index of the kept document this one duplicates, with the reason.
    ///
    /// Equal ids always collide. A fingerprint match only counts when one side has no id;
    /// two documents with distinct ids are distinct incidents.
    fn duplicate_of(&self, id: Option<&str>, fp: &str) -> Option<(usize, &'static str)> {
        if let Some(&kept) = id.and_then(|id| self.ids.get(id)) {
            return Some((kept, "Duplicate id in batch"));
        }
        self.fingerprints
            .get(fp)?
            .iter()
            .find(|(_, kept_id)| id.is_none() || kept_id.is_none())
            .map(|(kept, _)| (*kept, "Duplicate fingerprint in batch"))
    }

    fn insert(&mut self, index: usize, id: Option<&str>, fp: &str) {
        if let Some(id) = id {
            self.ids.insert(id.to_string(), index);
        }
        self.fingerprints
            .entry(fp.to_string())
            .or_default()
            .push((index, id.map(str::to_string)));
    }
}

fn unwrap_envelope(root: Value) -> Result<Vec<Value>, AppError> {
    match root {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ENVELOPE_KEYS {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return Ok(items);
                }
            }
            Err(AppError::new(
                "INGEST_SHAPE_INVALID",
                "Expected an array of incidents or an object wrapping one",
            )
            .with_details(format!("accepted keys: {}", ENVELOPE_KEYS.join(", "))))
        }
        other => Err(AppError::new(
            "INGEST_SHAPE_INVALID",
            "Expected an array of incidents or an object wrapping one",
        )
        .with_details(format!("got {}", json_kind(&other)))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode incident documents as returned by the incident endpoint.
///
/// Contract:
/// - Malformed JSON or an unexpected top-level shape is an error.
/// - A single undecodable document is skipped with an `INGEST_DOCUMENT_INVALID` warning.
/// - A document repeating a kept id, or matching a kept fingerprint where either side has no
///   id, is skipped and reported as a conflict; the first occurrence wins.
pub fn parse_incident_documents(json_text: &str) -> Result<IncidentBatch, AppError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| {
        AppError::new("INGEST_JSON_INVALID", "Failed to parse incident JSON")
            .with_details(e.to_string())
    })?;
    let documents = unwrap_envelope(root)?;

    let mut incidents = Vec::with_capacity(documents.len());
    let mut conflicts = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped = 0usize;
    let mut seen = SeenDocuments::default();

    for (index, doc) in documents.into_iter().enumerate() {
        let incident: Incident = match serde_json::from_value(doc) {
            Ok(inc) => inc,
            Err(e) => {
                skipped += 1;
                warnings.push(
                    ValidationWarning::new(
                        "INGEST_DOCUMENT_INVALID",
                        format!("Skipped incident document at index {index}"),
                    )
                    .with_details(e.to_string()),
                );
                continue;
            }
        };

        let fp = fingerprint(&incident);
        if let Some((kept_index, reason)) = seen.duplicate_of(incident.id.as_deref(), &fp) {
            skipped += 1;
            conflicts.push(IngestConflict {
                index,
                reason: reason.to_string(),
                id: incident.id.clone(),
                fingerprint: fp,
                kept_index,
            });
            continue;
        }
        seen.insert(index, incident.id.as_deref(), &fp);
        incidents.push(IngestedIncident {
            fingerprint: fp,
            incident,
        });
    }

    info!(
        accepted = incidents.len(),
        skipped,
        conflicts = conflicts.len(),
        "parsed incident documents"
    );

    Ok(IncidentBatch {
        incidents,
        skipped,
        conflicts,
        warnings,
    })
}
