use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: i64 = 60_000;
const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Placeholder rendered for an unknown duration.
pub const UNKNOWN_DURATION: &str = "-";

/// Display locale for every user-facing label produced by this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

fn unit(locale: Locale, n: i64, vi: &str, en_one: &str, en_many: &str) -> String {
    match locale {
        Locale::Vi => format!("{n} {vi}"),
        Locale::En if n == 1 => format!("{n} {en_one}"),
        Locale::En => format!("{n} {en_many}"),
    }
}

/// Render a millisecond duration as days/hours/minutes.
///
/// Zero days/hours are omitted, minutes are always present, seconds are truncated.
/// `None` renders as `"-"`. Negative input is clamped to zero; callers format a deficit by
/// passing its absolute value.
pub fn format_duration_ms(ms: Option<i64>, locale: Locale) -> String {
    let Some(ms) = ms else {
        return UNKNOWN_DURATION.to_string();
    };
    let total_minutes = ms.max(0) / MS_PER_MINUTE;
    let days = total_minutes / MINUTES_PER_DAY;
    let hours = (total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    let minutes = total_minutes % MINUTES_PER_HOUR;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(unit(locale, days, "ngày", "day", "days"));
    }
    if hours > 0 {
        parts.push(unit(locale, hours, "giờ", "hour", "hours"));
    }
    parts.push(unit(locale, minutes, "phút", "minute", "minutes"));
    parts.join(" ")
}
