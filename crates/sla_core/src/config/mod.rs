use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::Severity;
use crate::error::AppError;
use crate::format::Locale;
use crate::policy::{default_budget_minutes, SlaPolicy};

/// On-disk configuration. Every field is optional.
///
/// `budgetsMinutes` overrides the built-in table per severity; an explicit `null` removes the
/// policy for that severity so its incidents evaluate as out of policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SlaConfigFile {
    pub locale: Option<Locale>,
    pub budgets_minutes: BTreeMap<Severity, Option<i64>>,
}

/// Resolved evaluator settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SlaConfig {
    pub locale: Locale,
    pub budgets_minutes: BTreeMap<Severity, i64>,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            budgets_minutes: SlaPolicy::default().budgets_minutes().clone(),
        }
    }
}

impl SlaConfig {
    pub fn policy(&self) -> SlaPolicy {
        SlaPolicy::new(self.budgets_minutes.clone())
    }

    fn resolve(file: SlaConfigFile) -> Result<Self, AppError> {
        let mut budgets_minutes = BTreeMap::new();
        for severity in Severity::ALL {
            let budget = match file.budgets_minutes.get(&severity) {
                None => Some(default_budget_minutes(severity)),
                Some(explicit) => *explicit,
            };
            let Some(budget) = budget else { continue };
            if budget < 0 {
                return Err(AppError::new(
                    "CONFIG_INVALID",
                    format!("SLA budget for {} must not be negative", severity.key()),
                )
                .with_details(format!("value={budget}")));
            }
            budgets_minutes.insert(severity, budget);
        }

        Ok(Self {
            locale: file.locale.unwrap_or_default(),
            budgets_minutes,
        })
    }
}

pub fn parse_config(text: &str) -> Result<SlaConfig, AppError> {
    let file: SlaConfigFile = serde_json::from_str(text).map_err(|e| {
        AppError::new("CONFIG_PARSE_FAILED", "Failed to parse SLA config JSON")
            .with_details(e.to_string())
    })?;
    SlaConfig::resolve(file)
}

pub fn load_config(path: &Path) -> Result<SlaConfig, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new("CONFIG_READ_FAILED", "Failed to read SLA config file")
            .with_details(format!("path={}; err={e}", path.display()))
    })?;
    let config = parse_config(&text)?;
    info!(
        path = %path.display(),
        locale = ?config.locale,
        policies = config.budgets_minutes.len(),
        "loaded SLA config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = parse_config("{}").expect("parse");
        assert_eq!(cfg, SlaConfig::default());
        assert_eq!(cfg.locale, Locale::Vi);
    }

    #[test]
    fn overrides_and_removals_merge_with_defaults() {
        let cfg = parse_config(r#"{"locale":"en","budgetsMinutes":{"critical":240,"low":null}}"#)
            .expect("parse");
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.budgets_minutes.get(&Severity::Critical), Some(&240));
        assert_eq!(cfg.budgets_minutes.get(&Severity::High), Some(&1440));
        assert_eq!(cfg.budgets_minutes.get(&Severity::Low), None);
    }

    #[test]
    fn negative_budget_is_rejected() {
        let err = parse_config(r#"{"budgetsMinutes":{"high":-1}}"#).unwrap_err();
        assert_eq!(err.code, "CONFIG_INVALID");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_config(r#"{"budgets":{}}"#).unwrap_err();
        assert_eq!(err.code, "CONFIG_PARSE_FAILED");
        let err = parse_config(r#"{"budgetsMinutes":{"sev0":10}}"#).unwrap_err();
        assert_eq!(err.code, "CONFIG_PARSE_FAILED");
    }
}
