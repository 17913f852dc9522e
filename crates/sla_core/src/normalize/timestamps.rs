use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::ValidationWarning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// Canonical RFC3339 UTC string, if deterministically parseable.
    pub canonical_rfc3339_utc: Option<String>,
    /// Raw input preserved for non-RFC3339 (or unparseable) inputs.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsedAs {
    Rfc3339,
    Iso8601,
    /// Matched an allowlisted format that carries no offset; UTC was assumed.
    AssumedUtc(&'static str),
}

fn parse_assume_utc(raw: &str) -> Option<(OffsetDateTime, &'static str)> {
    // Deterministic allowlist only (no fuzzy parsing). Offset-less values are read as UTC.
    let with_time = [
        (
            "YYYY-MM-DDTHH:MM:SS.fff",
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        ),
        (
            "YYYY-MM-DDTHH:MM:SS",
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ),
        (
            "YYYY-MM-DDTHH:MM",
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        ),
        (
            "YYYY-MM-DD HH:MM:SS",
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        ),
        (
            "YYYY-MM-DD HH:MM",
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        ),
    ];
    for (name, fmt) in with_time {
        if let Ok(pdt) = PrimitiveDateTime::parse(raw, fmt) {
            return Some((pdt.assume_utc(), name));
        }
    }

    let date_only = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(raw, date_only) {
        return Some((date.midnight().assume_utc(), "YYYY-MM-DD"));
    }

    None
}

fn parse_classified(raw: &str) -> Option<(OffsetDateTime, ParsedAs)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some((dt, ParsedAs::Rfc3339));
    }
    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Iso8601::DEFAULT) {
        return Some((dt, ParsedAs::Iso8601));
    }
    parse_assume_utc(trimmed).map(|(dt, name)| (dt, ParsedAs::AssumedUtc(name)))
}

/// Parse an incident timestamp (ISO 8601) into an instant.
///
/// Returns `None` for empty or unparseable input; callers treat that as "unknown" and never
/// substitute a default instant.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    parse_classified(raw).map(|(dt, _)| dt)
}

fn canonicalize_rfc3339_utc(dt: OffsetDateTime) -> Option<String> {
    dt.to_offset(UtcOffset::UTC).format(&Rfc3339).ok()
}

/// Normalize a timestamp into canonical RFC3339 UTC while preserving raw inputs.
///
/// Contract:
/// - RFC3339 input: canonical only, `raw=None`, no warning.
/// - Other ISO 8601 or allowlisted input: canonical plus preserved `raw`, with an explicit
///   `INGEST_TS_NORMALIZED` warning (and `INGEST_TS_TZ_ASSUMED_UTC` when the offset was missing).
/// - Unparseable input: `raw` preserved, canonical `None`, `INGEST_TS_UNPARSEABLE`.
pub fn normalize_timestamp(
    field: &str,
    raw_input: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> NormalizedTimestamp {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: None,
            raw: None,
        };
    }

    let Some((dt, parsed_as)) = parse_classified(trimmed) else {
        warnings.push(
            ValidationWarning::new(
                "INGEST_TS_UNPARSEABLE",
                format!("Unparseable timestamp for {field}; preserved raw"),
            )
            .with_details(format!("raw={trimmed}")),
        );
        return NormalizedTimestamp {
            canonical_rfc3339_utc: None,
            raw: Some(trimmed.to_string()),
        };
    };

    let canonical = canonicalize_rfc3339_utc(dt);
    if parsed_as == ParsedAs::Rfc3339 {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: canonical,
            raw: None,
        };
    }

    if let ParsedAs::AssumedUtc(fmt) = parsed_as {
        warnings.push(
            ValidationWarning::new(
                "INGEST_TS_TZ_ASSUMED_UTC",
                format!("Assumed UTC timezone for {field}"),
            )
            .with_details(format!("value={trimmed}; fmt={fmt}")),
        );
    }
    warnings.push(
        ValidationWarning::new(
            "INGEST_TS_NORMALIZED",
            format!("Normalized non-RFC3339 timestamp for {field}"),
        )
        .with_details(format!(
            "raw={trimmed}; canonical={}",
            canonical.as_deref().unwrap_or("UNKNOWN")
        )),
    );

    NormalizedTimestamp {
        canonical_rfc3339_utc: canonical,
        raw: Some(trimmed.to_string()),
    }
}
