use unicode_normalization::UnicodeNormalization;

use crate::domain::{Severity, Status};
use crate::format::Locale;

/// Result of resolving a free-text label against both dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalKey {
    Severity(Severity),
    Status(Status),
    Unknown,
}

// Every accepted spelling, Vietnamese and English side by side. Keys are already folded.
const SEVERITY_LABELS: &[(&str, Severity)] = &[
    ("low", Severity::Low),
    ("nhẹ", Severity::Low),
    ("medium", Severity::Medium),
    ("trung bình", Severity::Medium),
    ("high", Severity::High),
    ("nặng", Severity::High),
    ("nghiêm trọng", Severity::High),
    ("critical", Severity::Critical),
    ("rất nghiêm trọng", Severity::Critical),
];

const STATUS_LABELS: &[(&str, Status)] = &[
    ("new", Status::New),
    ("mới ghi nhận", Status::New),
    ("in_progress", Status::InProgress),
    ("in progress", Status::InProgress),
    ("in-progress", Status::InProgress),
    ("đang xử lý", Status::InProgress),
    ("đang xử lí", Status::InProgress),
    ("resolved", Status::Resolved),
    ("đã giải quyết", Status::Resolved),
    ("closed", Status::Closed),
    ("đã đóng", Status::Closed),
];

// NFC so decomposed Vietnamese diacritics match the composed table keys.
fn fold(label: &str) -> String {
    label
        .nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn lookup<T: Copy>(table: &[(&str, T)], folded: &str) -> Option<T> {
    table
        .iter()
        .find(|(label, _)| *label == folded)
        .map(|(_, value)| *value)
}

/// Resolve a label against the severity dictionary, then the status dictionary.
/// Anything else, including empty input, is `CanonicalKey::Unknown`.
pub fn normalize_label(label: &str) -> CanonicalKey {
    let folded = fold(label);
    if let Some(sev) = lookup(SEVERITY_LABELS, &folded) {
        return CanonicalKey::Severity(sev);
    }
    if let Some(status) = lookup(STATUS_LABELS, &folded) {
        return CanonicalKey::Status(status);
    }
    CanonicalKey::Unknown
}

pub fn normalize_severity(label: &str) -> Option<Severity> {
    lookup(SEVERITY_LABELS, &fold(label))
}

pub fn normalize_status(label: &str) -> Option<Status> {
    lookup(STATUS_LABELS, &fold(label))
}

pub fn severity_label(severity: Severity, locale: Locale) -> &'static str {
    match (locale, severity) {
        (Locale::Vi, Severity::Low) => "Nhẹ",
        (Locale::Vi, Severity::Medium) => "Trung bình",
        (Locale::Vi, Severity::High) => "Nặng",
        (Locale::Vi, Severity::Critical) => "Rất nghiêm trọng",
        (Locale::En, Severity::Low) => "Low",
        (Locale::En, Severity::Medium) => "Medium",
        (Locale::En, Severity::High) => "High",
        (Locale::En, Severity::Critical) => "Critical",
    }
}

pub fn status_label(status: Status, locale: Locale) -> &'static str {
    match (locale, status) {
        (Locale::Vi, Status::New) => "Mới ghi nhận",
        (Locale::Vi, Status::InProgress) => "Đang xử lý",
        (Locale::Vi, Status::Resolved) => "Đã giải quyết",
        (Locale::Vi, Status::Closed) => "Đã đóng",
        (Locale::En, Status::New) => "New",
        (Locale::En, Status::InProgress) => "In progress",
        (Locale::En, Status::Resolved) => "Resolved",
        (Locale::En, Status::Closed) => "Closed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_synonyms_collapse_to_one_key() {
        assert_eq!(normalize_severity("nặng"), Some(Severity::High));
        assert_eq!(normalize_severity("Nghiêm trọng"), Some(Severity::High));
        assert_eq!(normalize_severity("HIGH"), Some(Severity::High));
        assert_eq!(normalize_severity("  Rất   nghiêm trọng "), Some(Severity::Critical));
        assert_eq!(normalize_severity("Trung bình"), Some(Severity::Medium));
        assert_eq!(normalize_severity("nhẹ"), Some(Severity::Low));
    }

    #[test]
    fn status_synonyms_collapse_to_one_key() {
        assert_eq!(normalize_status("Mới ghi nhận"), Some(Status::New));
        assert_eq!(normalize_status("IN_PROGRESS"), Some(Status::InProgress));
        assert_eq!(normalize_status("in progress"), Some(Status::InProgress));
        assert_eq!(normalize_status("Đang xử lý"), Some(Status::InProgress));
        assert_eq!(normalize_status("Đã giải quyết"), Some(Status::Resolved));
        assert_eq!(normalize_status("Đã đóng"), Some(Status::Closed));
    }

    #[test]
    fn unknown_labels_do_not_panic() {
        assert_eq!(normalize_label(""), CanonicalKey::Unknown);
        assert_eq!(normalize_label("   "), CanonicalKey::Unknown);
        assert_eq!(normalize_label("sev0"), CanonicalKey::Unknown);
        assert_eq!(normalize_severity("closed"), None);
    }

    #[test]
    fn normalize_label_tags_the_dictionary_it_matched() {
        assert_eq!(
            normalize_label("critical"),
            CanonicalKey::Severity(Severity::Critical)
        );
        assert_eq!(normalize_label("Đã đóng"), CanonicalKey::Status(Status::Closed));
    }

    #[test]
    fn decomposed_diacritics_match_composed_keys() {
        assert_eq!(normalize_severity("na\u{0306}\u{0323}ng"), Some(Severity::High));
        assert_eq!(normalize_severity("nhe\u{0323}"), Some(Severity::Low));
        assert_eq!(
            normalize_status("\u{0110}a\u{0303} \u{0111}o\u{0301}ng"),
            Some(Status::Closed)
        );
    }

    #[test]
    fn display_labels_round_trip_through_the_normalizer() {
        for locale in [Locale::Vi, Locale::En] {
            for sev in Severity::ALL {
                assert_eq!(normalize_severity(severity_label(sev, locale)), Some(sev));
            }
            for status in [Status::New, Status::InProgress, Status::Resolved, Status::Closed] {
                assert_eq!(normalize_status(status_label(status, locale)), Some(status));
            }
        }
    }
}
