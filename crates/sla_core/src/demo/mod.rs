use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::domain::Incident;

fn ts(at: OffsetDateTime) -> Option<String> {
    at.format(&Rfc3339).ok()
}

/// Deterministic demo incidents relative to `now`.
///
/// Covers every compliance tag, both label languages, and the data-quality cases the
/// validator reports (missing updatedAt on a closed incident, unparseable createdAt).
pub fn demo_incidents(now: OffsetDateTime) -> Vec<Incident> {
    // (id, title, location, severity, status, created hours ago, updated hours after created)
    let rows: [(&str, &str, &str, &str, &str, i64, Option<i64>); 10] = [
        ("HSE-001", "Trượt ngã tại kho vật tư", "Kho A", "nặng", "Đang xử lý", 10, None),
        ("HSE-002", "Rò rỉ hóa chất khu pha chế", "Xưởng 2", "rất nghiêm trọng", "Mới ghi nhận", 9, None),
        ("HSE-003", "Chập điện tủ phân phối", "Trạm điện", "rất nghiêm trọng", "Đã đóng", 30, Some(7)),
        ("HSE-004", "Thiếu kính bảo hộ ca đêm", "Xưởng 1", "", "Mới ghi nhận", 5, None),
        ("HSE-005", "Vấp dây điện hành lang", "Văn phòng", "low", "resolved", 100, Some(80)),
        ("HSE-006", "Forklift near miss", "Dock 3", "medium", "in_progress", 60, None),
        ("HSE-007", "Hand injury on press", "Line 4", "high", "closed", 50, Some(30)),
        ("HSE-008", "Đứt găng tay chống cắt", "Xưởng 1", "trung bình", "Đã giải quyết", 3, None),
        ("HSE-009", "Scaffold guardrail missing", "Site B", "critical", "new", 2, None),
        ("HSE-010", "Ngã từ thang", "Kho B", "nghiêm trọng", "Đã đóng", 20, Some(-1)),
    ];

    let mut out: Vec<Incident> = rows
        .into_iter()
        .map(|(id, title, location, severity, status, hours_ago, updated_after)| {
            let created = now - Duration::hours(hours_ago);
            Incident {
                id: Some(id.to_string()),
                title: title.to_string(),
                location: Some(location.to_string()),
                severity: Some(severity.to_string()),
                status: Some(status.to_string()),
                created_at: ts(created),
                updated_at: updated_after.and_then(|h| ts(created + Duration::hours(h))),
                ..Incident::default()
            }
        })
        .collect();

    out.push(Incident {
        id: Some("HSE-011".to_string()),
        title: "Thiếu thông tin thời điểm".to_string(),
        severity: Some("critical".to_string()),
        status: Some("new".to_string()),
        created_at: Some("không rõ".to_string()),
        ..Incident::default()
    });

    out
}
