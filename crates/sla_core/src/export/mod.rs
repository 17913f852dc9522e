use crate::analytics::SlaRow;
use crate::error::AppError;

pub const SLA_CSV_HEADERS: [&str; 13] = [
    "key",
    "title",
    "location",
    "severity",
    "status",
    "budget_minutes",
    "elapsed_ms",
    "elapsed",
    "compliance",
    "remaining_ms",
    "remaining",
    "warning_count",
    "is_closed",
];

fn opt_num(v: Option<i64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

/// Export evaluated rows as a CSV SLA register, one line per row, in the given order.
pub fn export_sla_csv(rows: &[SlaRow]) -> Result<String, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(SLA_CSV_HEADERS).map_err(|e| {
        AppError::new("EXPORT_CSV_FAILED", "Failed to write CSV header").with_details(e.to_string())
    })?;

    for row in rows {
        let ev = &row.evaluation;
        let record = [
            row.key.clone(),
            row.title.clone(),
            row.location.clone().unwrap_or_default(),
            ev.severity.map(|s| s.key()).unwrap_or_default().to_string(),
            ev.status.map(|s| s.key()).unwrap_or_default().to_string(),
            opt_num(ev.budget_minutes),
            opt_num(ev.elapsed_ms),
            ev.elapsed_label.clone(),
            ev.compliance_tag.key().to_string(),
            opt_num(ev.remaining_ms),
            ev.remaining_label.clone().unwrap_or_default(),
            row.warning_count.to_string(),
            ev.is_closed.to_string(),
        ];
        wtr.write_record(&record).map_err(|e| {
            AppError::new("EXPORT_CSV_FAILED", "Failed to write CSV row")
                .with_details(format!("key={}; err={e}", row.key))
        })?;
    }

    let bytes = wtr.into_inner().map_err(|e| {
        AppError::new("EXPORT_CSV_FAILED", "Failed to flush CSV writer").with_details(e.to_string())
    })?;
    String::from_utf8(bytes).map_err(|e| {
        AppError::new("EXPORT_CSV_FAILED", "CSV output was not valid UTF-8")
            .with_details(e.to_string())
    })
}
