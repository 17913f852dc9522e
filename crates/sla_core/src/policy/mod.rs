use std::collections::BTreeMap;

use crate::domain::Severity;

/// Built-in handling budget per severity, in minutes.
pub const fn default_budget_minutes(severity: Severity) -> i64 {
    match severity {
        Severity::Critical => 8 * 60,
        Severity::High => 24 * 60,
        Severity::Medium => 48 * 60,
        Severity::Low => 72 * 60,
    }
}

/// Allowed handling duration per canonical severity.
///
/// A severity with no entry has no SLA policy: evaluation renders the duration only and
/// makes no compliance claim. The table is fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaPolicy {
    budgets_minutes: BTreeMap<Severity, i64>,
}

impl SlaPolicy {
    pub fn new(budgets_minutes: BTreeMap<Severity, i64>) -> Self {
        Self { budgets_minutes }
    }

    /// `None` means "no SLA policy applies", which is a valid outcome rather than an error.
    pub fn budget_minutes_for(&self, severity: Option<Severity>) -> Option<i64> {
        severity.and_then(|s| self.budgets_minutes.get(&s).copied())
    }

    pub fn budgets_minutes(&self) -> &BTreeMap<Severity, i64> {
        &self.budgets_minutes
    }
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self::new(
            Severity::ALL
                .into_iter()
                .map(|s| (s, default_budget_minutes(s)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let policy = SlaPolicy::default();
        assert_eq!(policy.budget_minutes_for(Some(Severity::Critical)), Some(480));
        assert_eq!(policy.budget_minutes_for(Some(Severity::High)), Some(1440));
        assert_eq!(policy.budget_minutes_for(Some(Severity::Medium)), Some(2880));
        assert_eq!(policy.budget_minutes_for(Some(Severity::Low)), Some(4320));
    }

    #[test]
    fn unknown_severity_has_no_policy() {
        assert_eq!(SlaPolicy::default().budget_minutes_for(None), None);
    }

    #[test]
    fn missing_entries_have_no_policy() {
        let policy = SlaPolicy::new(BTreeMap::from([(Severity::Critical, 60)]));
        assert_eq!(policy.budget_minutes_for(Some(Severity::Critical)), Some(60));
        assert_eq!(policy.budget_minutes_for(Some(Severity::Low)), None);
    }
}
