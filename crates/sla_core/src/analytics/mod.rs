use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::compliance::ComplianceTag;
use crate::domain::{Incident, Severity};
use crate::evaluate::{SlaEvaluation, SlaEvaluator};
use crate::format::Locale;
use crate::normalize::labels::severity_label;
use crate::validate::validate_incident;

pub const SLA_DASHBOARD_VERSION: u32 = 1;

const UNKNOWN_SEVERITY_KEY: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlaRow {
    /// Source id, or `#<index>` when the document carried none.
    pub key: String,
    pub id: Option<String>,
    pub title: String,
    pub location: Option<String>,
    pub evaluation: SlaEvaluation,
    pub warning_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceBucket {
    pub key: String,
    pub label: String,
    pub count: i64,
    pub row_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeverityBucket {
    pub key: String,
    pub label: String,
    pub budget_minutes: Option<i64>,
    pub count: i64,
    pub breach_count: i64,
    pub row_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlaDashboard {
    pub version: u32,
    pub generated_at: Option<String>,
    pub locale: Locale,
    pub incident_count: i64,
    pub breach_count: i64,
    pub warning_count: i64,
    pub compliance_buckets: Vec<ComplianceBucket>,
    pub severity_buckets: Vec<SeverityBucket>,
    /// Urgency order, see `sort_by_urgency`.
    pub rows: Vec<SlaRow>,
}

pub fn evaluate_all(
    incidents: &[Incident],
    now: OffsetDateTime,
    evaluator: &SlaEvaluator,
) -> Vec<SlaRow> {
    incidents
        .iter()
        .enumerate()
        .map(|(idx, inc)| SlaRow {
            key: inc.id.clone().unwrap_or_else(|| format!("#{idx}")),
            id: inc.id.clone(),
            title: inc.title.clone(),
            location: inc.location.clone(),
            evaluation: evaluator.evaluate(inc, now),
            warning_count: validate_incident(inc).len() as i64,
        })
        .collect()
}

fn urgency_rank(tag: ComplianceTag) -> u8 {
    match tag {
        ComplianceTag::Overdue => 0,
        ComplianceTag::WithinSla => 1,
        ComplianceTag::OutOfPolicy => 2,
        ComplianceTag::CompletedOverSla => 3,
        ComplianceTag::CompletedWithinSla => 4,
    }
}

/// Order rows for a triage list.
///
/// Overdue first (largest deficit first), then open incidents with the least time left,
/// then out-of-policy (longest running first, unknown durations last), then completed ones
/// (latest finishers first). Ties fall back to key and title so the order is total.
pub fn sort_by_urgency(rows: &mut [SlaRow]) {
    rows.sort_by(|a, b| {
        let ka = (
            urgency_rank(a.evaluation.compliance_tag),
            a.evaluation.remaining_ms.unwrap_or(i64::MAX),
            Reverse(a.evaluation.elapsed_ms.unwrap_or(-1)),
        );
        let kb = (
            urgency_rank(b.evaluation.compliance_tag),
            b.evaluation.remaining_ms.unwrap_or(i64::MAX),
            Reverse(b.evaluation.elapsed_ms.unwrap_or(-1)),
        );
        ka.cmp(&kb)
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.title.cmp(&b.title))
    });
}

fn severity_bucket_key(severity: Option<Severity>) -> &'static str {
    severity.map(Severity::key).unwrap_or(UNKNOWN_SEVERITY_KEY)
}

/// Build the SLA dashboard payload.
///
/// Compliance buckets list every tag (zero counts included) and severity buckets list every
/// severity plus `unknown`, so both reconcile to `incident_count` and the badge layout never
/// shifts between refreshes.
pub fn build_sla_dashboard(
    incidents: &[Incident],
    now: OffsetDateTime,
    evaluator: &SlaEvaluator,
) -> SlaDashboard {
    let locale = evaluator.locale();
    let mut rows = evaluate_all(incidents, now, evaluator);
    sort_by_urgency(&mut rows);

    let mut by_tag: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    let mut by_severity: BTreeMap<&'static str, (Vec<String>, i64)> = BTreeMap::new();
    for row in &rows {
        let ev = &row.evaluation;
        by_tag
            .entry(ev.compliance_tag.key())
            .or_default()
            .push(row.key.clone());
        let entry = by_severity
            .entry(severity_bucket_key(ev.severity))
            .or_default();
        entry.0.push(row.key.clone());
        if ev.compliance_tag.is_breach() {
            entry.1 += 1;
        }
    }

    let compliance_buckets = ComplianceTag::ALL
        .into_iter()
        .map(|tag| {
            let mut keys = by_tag.remove(tag.key()).unwrap_or_default();
            keys.sort();
            ComplianceBucket {
                key: format!("compliance:{}", tag.key()),
                label: tag.label(locale).to_string(),
                count: keys.len() as i64,
                row_keys: keys,
            }
        })
        .collect::<Vec<_>>();

    let mut severity_buckets = Vec::new();
    for severity in Severity::ALL.into_iter().rev() {
        let (mut keys, breaches) = by_severity.remove(severity.key()).unwrap_or_default();
        keys.sort();
        severity_buckets.push(SeverityBucket {
            key: format!("severity:{}", severity.key()),
            label: severity_label(severity, locale).to_string(),
            budget_minutes: evaluator.policy().budget_minutes_for(Some(severity)),
            count: keys.len() as i64,
            breach_count: breaches,
            row_keys: keys,
        });
    }
    let (mut unknown_keys, unknown_breaches) = by_severity
        .remove(UNKNOWN_SEVERITY_KEY)
        .unwrap_or_default();
    unknown_keys.sort();
    severity_buckets.push(SeverityBucket {
        key: format!("severity:{UNKNOWN_SEVERITY_KEY}"),
        label: match locale {
            Locale::Vi => "Không xác định".to_string(),
            Locale::En => "Unknown".to_string(),
        },
        budget_minutes: None,
        count: unknown_keys.len() as i64,
        breach_count: unknown_breaches,
        row_keys: unknown_keys,
    });

    let breach_count = rows
        .iter()
        .filter(|r| r.evaluation.compliance_tag.is_breach())
        .count() as i64;
    let warning_count = rows.iter().map(|r| r.warning_count).sum();

    SlaDashboard {
        version: SLA_DASHBOARD_VERSION,
        generated_at: now.format(&Rfc3339).ok(),
        locale,
        incident_count: rows.len() as i64,
        breach_count,
        warning_count,
        compliance_buckets,
        severity_buckets,
        rows,
    }
}
