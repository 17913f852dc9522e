use serde::{Deserialize, Serialize};

use crate::format::Locale;

const MS_PER_MINUTE: i64 = 60_000;

/// Badge state for an incident's SLA standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceTag {
    OutOfPolicy,
    #[serde(rename = "WithinSLA")]
    WithinSla,
    Overdue,
    #[serde(rename = "CompletedWithinSLA")]
    CompletedWithinSla,
    #[serde(rename = "CompletedOverSLA")]
    CompletedOverSla,
}

impl ComplianceTag {
    pub const ALL: [ComplianceTag; 5] = [
        ComplianceTag::Overdue,
        ComplianceTag::WithinSla,
        ComplianceTag::OutOfPolicy,
        ComplianceTag::CompletedOverSla,
        ComplianceTag::CompletedWithinSla,
    ];

    /// Stable wire name, identical to the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            ComplianceTag::OutOfPolicy => "OutOfPolicy",
            ComplianceTag::WithinSla => "WithinSLA",
            ComplianceTag::Overdue => "Overdue",
            ComplianceTag::CompletedWithinSla => "CompletedWithinSLA",
            ComplianceTag::CompletedOverSla => "CompletedOverSLA",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Vi, ComplianceTag::OutOfPolicy) => "Không áp dụng SLA",
            (Locale::Vi, ComplianceTag::WithinSla) => "Trong hạn",
            (Locale::Vi, ComplianceTag::Overdue) => "Quá hạn",
            (Locale::Vi, ComplianceTag::CompletedWithinSla) => "Hoàn thành đúng hạn",
            (Locale::Vi, ComplianceTag::CompletedOverSla) => "Hoàn thành trễ hạn",
            (Locale::En, ComplianceTag::OutOfPolicy) => "No SLA",
            (Locale::En, ComplianceTag::WithinSla) => "Within SLA",
            (Locale::En, ComplianceTag::Overdue) => "Overdue",
            (Locale::En, ComplianceTag::CompletedWithinSla) => "Completed within SLA",
            (Locale::En, ComplianceTag::CompletedOverSla) => "Completed over SLA",
        }
    }

    pub fn is_breach(self) -> bool {
        matches!(
            self,
            ComplianceTag::Overdue | ComplianceTag::CompletedOverSla
        )
    }
}

/// Signed time left against the budget; negative means the budget is exceeded.
pub fn remaining_ms(elapsed_ms: i64, budget_minutes: i64) -> i64 {
    budget_minutes
        .saturating_mul(MS_PER_MINUTE)
        .saturating_sub(elapsed_ms)
}

/// Classify an incident against its SLA budget.
///
/// Total over every input. No budget, or an unknown elapsed time, yields `OutOfPolicy` so no
/// compliance claim is made. `remaining == 0` counts as compliant for open and closed alike.
pub fn classify(
    elapsed_ms: Option<i64>,
    budget_minutes: Option<i64>,
    is_closed: bool,
) -> ComplianceTag {
    let (Some(elapsed), Some(budget)) = (elapsed_ms, budget_minutes) else {
        return ComplianceTag::OutOfPolicy;
    };
    let within = remaining_ms(elapsed, budget) >= 0;
    match (is_closed, within) {
        (true, true) => ComplianceTag::CompletedWithinSla,
        (true, false) => ComplianceTag::CompletedOverSla,
        (false, true) => ComplianceTag::WithinSla,
        (false, false) => ComplianceTag::Overdue,
    }
}
