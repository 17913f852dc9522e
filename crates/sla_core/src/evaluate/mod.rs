use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

use crate::compliance::{classify, remaining_ms, ComplianceTag};
use crate::config::SlaConfig;
use crate::domain::{Incident, Severity, Status};
use crate::duration::elapsed_ms;
use crate::format::{format_duration_ms, Locale};
use crate::normalize::labels::{normalize_severity, normalize_status};
use crate::policy::SlaPolicy;

/// Display payload for one incident row/card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlaEvaluation {
    pub elapsed_label: String,
    pub elapsed_ms: Option<i64>,
    pub compliance_tag: ComplianceTag,
    /// Present only when `compliance_tag != OutOfPolicy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_ms: Option<i64>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub is_closed: bool,
    pub budget_minutes: Option<i64>,
}

fn remaining_label(tag: ComplianceTag, remaining: i64, locale: Locale) -> Option<String> {
    let d = format_duration_ms(Some(remaining.saturating_abs()), locale);
    let label = match (locale, tag) {
        (_, ComplianceTag::OutOfPolicy) => return None,
        (Locale::Vi, ComplianceTag::WithinSla) => format!("còn {d}"),
        (Locale::Vi, ComplianceTag::Overdue) => format!("quá hạn {d}"),
        (Locale::Vi, ComplianceTag::CompletedWithinSla) => format!("sớm {d}"),
        (Locale::Vi, ComplianceTag::CompletedOverSla) => format!("trễ {d}"),
        (Locale::En, ComplianceTag::WithinSla) => format!("{d} left"),
        (Locale::En, ComplianceTag::Overdue) => format!("{d} overdue"),
        (Locale::En, ComplianceTag::CompletedWithinSla) => format!("{d} early"),
        (Locale::En, ComplianceTag::CompletedOverSla) => format!("{d} late"),
    };
    Some(label)
}

/// Stateless SLA evaluator bound to a policy and display locale.
///
/// Every call is independent: the incident snapshot and `now` are the only inputs, and no
/// input makes evaluation fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlaEvaluator {
    policy: SlaPolicy,
    locale: Locale,
}

impl SlaEvaluator {
    pub fn new(policy: SlaPolicy, locale: Locale) -> Self {
        Self { policy, locale }
    }

    pub fn from_config(config: &SlaConfig) -> Self {
        Self::new(config.policy(), config.locale)
    }

    pub fn policy(&self) -> &SlaPolicy {
        &self.policy
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn evaluate(&self, incident: &Incident, now: OffsetDateTime) -> SlaEvaluation {
        let severity = incident.severity.as_deref().and_then(normalize_severity);
        if severity.is_none() {
            debug!(id = ?incident.id, severity = ?incident.severity, "unrecognized severity; no SLA policy");
        }
        let status = incident.status.as_deref().and_then(normalize_status);
        let is_closed = status.is_some_and(Status::is_terminal);

        let elapsed = elapsed_ms(
            incident.created_at.as_deref(),
            incident.updated_at.as_deref(),
            is_closed,
            now,
        );
        let budget_minutes = self.policy.budget_minutes_for(severity);
        let compliance_tag = classify(elapsed, budget_minutes, is_closed);

        let remaining = match (compliance_tag, elapsed, budget_minutes) {
            (ComplianceTag::OutOfPolicy, _, _) => None,
            (_, Some(e), Some(b)) => Some(remaining_ms(e, b)),
            _ => None,
        };

        SlaEvaluation {
            elapsed_label: format_duration_ms(elapsed, self.locale),
            elapsed_ms: elapsed,
            compliance_tag,
            remaining_label: remaining.and_then(|r| remaining_label(compliance_tag, r, self.locale)),
            remaining_ms: remaining,
            severity,
            status,
            is_closed,
            budget_minutes,
        }
    }
}

/// Evaluate one incident with the built-in SLA table and Vietnamese labels.
pub fn evaluate_incident_sla(incident: &Incident, now: OffsetDateTime) -> SlaEvaluation {
    SlaEvaluator::default().evaluate(incident, now)
}
