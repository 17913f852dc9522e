use pretty_assertions::assert_eq;
use time::macros::datetime;

use sla_core::analytics::{evaluate_all, sort_by_urgency};
use sla_core::ingest::parse_incident_documents;
use sla_core::{ComplianceTag, SlaEvaluator};

fn fixture() -> &'static str {
    include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/demo/incidents.json"
    ))
}

#[test]
fn fixture_ingests_with_dedupe_and_per_document_warnings() {
    let batch = parse_incident_documents(fixture()).expect("parse");

    assert_eq!(batch.incidents.len(), 6);
    assert_eq!(batch.skipped, 2);

    assert_eq!(batch.conflicts.len(), 1);
    let conflict = &batch.conflicts[0];
    assert_eq!(conflict.index, 5);
    assert_eq!(conflict.kept_index, 0);
    // Re-export without an id, createdAt in +07:00 for the same instant.
    assert_eq!(conflict.id, None);
    assert_eq!(conflict.reason, "Duplicate fingerprint in batch");

    let codes: Vec<&str> = batch.warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(codes, vec!["INGEST_DOCUMENT_INVALID"]);

    // Numeric ids are carried as opaque strings.
    assert!(batch
        .incidents
        .iter()
        .any(|i| i.incident.id.as_deref() == Some("4")));
}

#[test]
fn fixture_rows_sort_by_urgency() {
    let batch = parse_incident_documents(fixture()).expect("parse");
    let incidents: Vec<_> = batch.incidents.into_iter().map(|i| i.incident).collect();
    let now = datetime!(2026-03-10 10:00:00 UTC);

    let mut rows = evaluate_all(&incidents, now, &SlaEvaluator::default());
    sort_by_urgency(&mut rows);

    let order: Vec<(&str, ComplianceTag)> = rows
        .iter()
        .map(|r| (r.key.as_str(), r.evaluation.compliance_tag))
        .collect();
    assert_eq!(
        order,
        vec![
            ("665f1a2b9c1d4e0012a1b002", ComplianceTag::Overdue),
            ("665f1a2b9c1d4e0012a1b001", ComplianceTag::WithinSla),
            ("4", ComplianceTag::OutOfPolicy),
            ("665f1a2b9c1d4e0012a1b005", ComplianceTag::CompletedOverSla),
            ("665f1a2b9c1d4e0012a1b008", ComplianceTag::CompletedOverSla),
            ("665f1a2b9c1d4e0012a1b003", ComplianceTag::CompletedWithinSla),
        ]
    );

    // +07:00 offset is honoured: 05:00+07:00 is 22:00Z the previous day.
    let offset_row = rows.iter().find(|r| r.key == "4").expect("row");
    assert_eq!(offset_row.evaluation.elapsed_label, "12 giờ 0 phút");

    // Closed without updatedAt measures to now and is flagged by validation.
    let closed_row = rows
        .iter()
        .find(|r| r.key == "665f1a2b9c1d4e0012a1b005")
        .expect("row");
    assert_eq!(closed_row.evaluation.elapsed_label, "5 ngày 2 giờ 0 phút");
    assert_eq!(closed_row.warning_count, 1);
}
