use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use time::macros::datetime;

use sla_core::analytics::build_sla_dashboard;
use sla_core::demo::demo_incidents;
use sla_core::export::{export_sla_csv, SLA_CSV_HEADERS};
use sla_core::format::Locale;
use sla_core::policy::SlaPolicy;
use sla_core::report::generate_sla_markdown;
use sla_core::SlaEvaluator;

fn assert_reconciles_to_total(buckets: Vec<(i64, Vec<String>)>, total: i64) {
    let sum: i64 = buckets.iter().map(|(c, _)| *c).sum();
    assert_eq!(sum, total, "expected bucket counts to reconcile to total");

    let all: BTreeSet<String> = buckets.into_iter().flat_map(|(_, keys)| keys).collect();
    assert_eq!(all.len() as i64, total, "expected union of row keys == total");
}

#[test]
fn demo_dashboard_covers_every_tag_and_reconciles() {
    let now = datetime!(2026-03-10 10:00:00 UTC);
    let incidents = demo_incidents(now);
    let dash = build_sla_dashboard(&incidents, now, &SlaEvaluator::default());

    assert_eq!(dash.version, 1);
    assert_eq!(dash.incident_count, 11);
    assert_eq!(dash.generated_at.as_deref(), Some("2026-03-10T10:00:00Z"));

    let counts: Vec<(&str, i64)> = dash
        .compliance_buckets
        .iter()
        .map(|b| (b.key.as_str(), b.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("compliance:Overdue", 2),
            ("compliance:WithinSLA", 2),
            ("compliance:OutOfPolicy", 2),
            ("compliance:CompletedOverSLA", 2),
            ("compliance:CompletedWithinSLA", 3),
        ]
    );
    assert_eq!(dash.breach_count, 4);

    assert_reconciles_to_total(
        dash.compliance_buckets
            .iter()
            .map(|b| (b.count, b.row_keys.clone()))
            .collect(),
        dash.incident_count,
    );
    assert_reconciles_to_total(
        dash.severity_buckets
            .iter()
            .map(|b| (b.count, b.row_keys.clone()))
            .collect(),
        dash.incident_count,
    );

    let severity_keys: Vec<&str> = dash.severity_buckets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(
        severity_keys,
        vec![
            "severity:critical",
            "severity:high",
            "severity:medium",
            "severity:low",
            "severity:unknown",
        ]
    );

    // Most overdue first.
    assert_eq!(dash.rows[0].key, "HSE-006");
    assert_eq!(dash.rows[1].key, "HSE-002");
}

#[test]
fn demo_dashboard_surfaces_data_quality_warnings() {
    let now = datetime!(2026-03-10 10:00:00 UTC);
    let dash = build_sla_dashboard(&demo_incidents(now), now, &SlaEvaluator::default());

    let warned: BTreeSet<&str> = dash
        .rows
        .iter()
        .filter(|r| r.warning_count > 0)
        .map(|r| r.key.as_str())
        .collect();
    // HSE-004: empty severity; HSE-008: resolved without updatedAt;
    // HSE-010: updatedAt before createdAt; HSE-011: unparseable createdAt.
    assert_eq!(
        warned,
        BTreeSet::from(["HSE-004", "HSE-008", "HSE-010", "HSE-011"])
    );
}

#[test]
fn markdown_report_is_deterministic_and_localized() {
    let now = datetime!(2026-03-10 10:00:00 UTC);
    let incidents = demo_incidents(now);

    let vi = build_sla_dashboard(&incidents, now, &SlaEvaluator::default());
    let md = generate_sla_markdown(&vi);
    assert_eq!(md, generate_sla_markdown(&vi));
    assert!(md.starts_with("# Báo cáo SLA sự cố\n"));
    assert!(md.contains("| Quá hạn | 2 |"));
    assert!(md.contains("| Rất nghiêm trọng | 8 giờ 0 phút | 4 | 1 |"));
    assert!(md.contains("| HSE-006 | Forklift near miss | Trung bình | Đang xử lý | 2 ngày 12 giờ 0 phút | 12 giờ 0 phút |"));

    let en = build_sla_dashboard(
        &incidents,
        now,
        &SlaEvaluator::new(SlaPolicy::default(), Locale::En),
    );
    let md_en = generate_sla_markdown(&en);
    assert!(md_en.starts_with("# Incident SLA report\n"));
    assert!(md_en.contains("| HSE-002 | Rò rỉ hóa chất khu pha chế | Critical | New | 9 hours 0 minutes | 1 hour 0 minutes |"));
}

#[test]
fn csv_export_has_header_and_one_line_per_row() {
    let now = datetime!(2026-03-10 10:00:00 UTC);
    let dash = build_sla_dashboard(&demo_incidents(now), now, &SlaEvaluator::default());
    let csv_text = export_sla_csv(&dash.rows).expect("export");

    let mut rdr = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = rdr.headers().expect("headers").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), SLA_CSV_HEADERS.to_vec());

    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.expect("record")).collect();
    assert_eq!(records.len(), 11);
    assert_eq!(&records[0][0], "HSE-006");
    assert_eq!(&records[0][8], "Overdue");

    let unknown = records
        .iter()
        .find(|r| &r[0] == "HSE-011")
        .expect("unknown row");
    assert_eq!(&unknown[6], "");
    assert_eq!(&unknown[7], "-");
    assert_eq!(&unknown[8], "OutOfPolicy");
}

#[test]
fn dashboard_json_uses_camel_case_throughout() {
    let now = datetime!(2026-03-10 10:00:00 UTC);
    let dash = build_sla_dashboard(&demo_incidents(now), now, &SlaEvaluator::default());
    let json = serde_json::to_value(&dash).expect("serialize");

    for key in [
        "generatedAt",
        "incidentCount",
        "breachCount",
        "warningCount",
        "complianceBuckets",
        "severityBuckets",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json.get("incident_count").is_none());
    assert!(json["complianceBuckets"][0].get("rowKeys").is_some());
    assert!(json["severityBuckets"][0].get("budgetMinutes").is_some());
    assert!(json["severityBuckets"][0].get("breachCount").is_some());

    let row = &json["rows"][0];
    assert!(row.get("warningCount").is_some());
    assert!(row["evaluation"].get("elapsedLabel").is_some());

    let back: sla_core::analytics::SlaDashboard =
        serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, dash);
}
