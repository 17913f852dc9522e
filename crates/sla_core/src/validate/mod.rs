use time::OffsetDateTime;
use tracing::debug;

use crate::domain::{Incident, ValidationWarning};
use crate::normalize::labels::{normalize_severity, normalize_status};
use crate::normalize::timestamps::parse_timestamp;

fn parse_ts(
    field: &str,
    raw: Option<&str>,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<OffsetDateTime> {
    let s = raw?;
    let parsed = parse_timestamp(s);
    if parsed.is_none() {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_TS_UNPARSEABLE",
                format!("Failed to parse {field}"),
            )
            .with_details(format!("value={s}")),
        );
    }
    parsed
}

/// Data-quality checks for an incident document.
///
/// Evaluation degrades silently on the same problems; this surfaces them so the data producer
/// can be asked to fix them. Nothing here changes evaluation results.
pub fn validate_incident(incident: &Incident) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let created_raw = incident
        .created_at
        .as_deref()
        .filter(|s| !s.trim().is_empty());
    if created_raw.is_none() {
        warnings.push(ValidationWarning::new(
            "VALIDATION_CREATED_AT_MISSING",
            "createdAt is missing; elapsed time is UNKNOWN",
        ));
    }
    let updated_raw = incident
        .updated_at
        .as_deref()
        .filter(|s| !s.trim().is_empty());

    let created = parse_ts("createdAt", created_raw, &mut warnings);
    let updated = parse_ts("updatedAt", updated_raw, &mut warnings);

    if let (Some(c), Some(u)) = (created, updated) {
        if u < c {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_TS_ORDER_VIOLATION",
                    "Timestamp order violation: createdAt must be <= updatedAt",
                )
                .with_details(format!("createdAt={c}; updatedAt={u}")),
            );
        }
    }

    let severity_raw = incident.severity.as_deref().unwrap_or("");
    if normalize_severity(severity_raw).is_none() {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_SEVERITY_UNKNOWN",
                "Unrecognized severity; no SLA policy applies",
            )
            .with_details(format!("value={severity_raw}")),
        );
    }

    let status_raw = incident.status.as_deref().unwrap_or("");
    match normalize_status(status_raw) {
        None => warnings.push(
            ValidationWarning::new(
                "VALIDATION_STATUS_UNKNOWN",
                "Unrecognized status; incident treated as open",
            )
            .with_details(format!("value={status_raw}")),
        ),
        Some(status) if status.is_terminal() && updated.is_none() => warnings.push(
            ValidationWarning::new(
                "VALIDATION_CLOSED_WITHOUT_UPDATED_AT",
                "Terminal incident has no usable updatedAt; elapsed time is measured to now",
            )
            .with_details(format!("status={}", status.key())),
        ),
        Some(_) => {}
    }

    if !warnings.is_empty() {
        debug!(id = ?incident.id, count = warnings.len(), "incident has validation warnings");
    }
    warnings
}
