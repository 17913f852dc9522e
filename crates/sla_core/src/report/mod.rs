use crate::analytics::SlaDashboard;
use crate::compliance::ComplianceTag;
use crate::format::{format_duration_ms, Locale};
use crate::normalize::labels::{severity_label, status_label};

struct Headings {
    title: &'static str,
    generated: &'static str,
    incidents: &'static str,
    breaches: &'static str,
    warnings: &'static str,
    compliance: &'static str,
    compliance_cols: &'static str,
    severity: &'static str,
    severity_cols: &'static str,
    overdue: &'static str,
    overdue_cols: &'static str,
    none: &'static str,
    no_policy: &'static str,
}

const VI: Headings = Headings {
    title: "# Báo cáo SLA sự cố",
    generated: "Thời điểm lập",
    incidents: "Số sự cố",
    breaches: "Vi phạm SLA",
    warnings: "Cảnh báo dữ liệu",
    compliance: "## Tình trạng SLA",
    compliance_cols: "| Tình trạng | Số lượng |\n|---|---:|\n",
    severity: "## Theo mức độ",
    severity_cols: "| Mức độ | Hạn xử lý | Số sự cố | Vi phạm |\n|---|---|---:|---:|\n",
    overdue: "## Sự cố quá hạn",
    overdue_cols: "| Mã | Tiêu đề | Mức độ | Trạng thái | Thời gian xử lý | Quá hạn |\n|---|---|---|---|---|---|\n",
    none: "_Không có_",
    no_policy: "-",
};

const EN: Headings = Headings {
    title: "# Incident SLA report",
    generated: "Generated at",
    incidents: "Incidents",
    breaches: "SLA breaches",
    warnings: "Data warnings",
    compliance: "## SLA standing",
    compliance_cols: "| Standing | Count |\n|---|---:|\n",
    severity: "## By severity",
    severity_cols: "| Severity | Budget | Incidents | Breaches |\n|---|---|---:|---:|\n",
    overdue: "## Overdue incidents",
    overdue_cols: "| ID | Title | Severity | Status | Elapsed | Overdue by |\n|---|---|---|---|---|---|\n",
    none: "_None_",
    no_policy: "-",
};

fn headings(locale: Locale) -> &'static Headings {
    match locale {
        Locale::Vi => &VI,
        Locale::En => &EN,
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Render a dashboard as Markdown.
///
/// Output depends only on the dashboard, so identical inputs produce identical reports.
pub fn generate_sla_markdown(dash: &SlaDashboard) -> String {
    let locale = dash.locale;
    let h = headings(locale);
    let mut out = String::new();

    out.push_str(h.title);
    out.push_str("\n\n");
    out.push_str(&format!(
        "- {}: {}\n",
        h.generated,
        dash.generated_at.as_deref().unwrap_or("UNKNOWN")
    ));
    out.push_str(&format!("- {}: {}\n", h.incidents, dash.incident_count));
    out.push_str(&format!("- {}: {}\n", h.breaches, dash.breach_count));
    out.push_str(&format!("- {}: {}\n\n", h.warnings, dash.warning_count));

    out.push_str(h.compliance);
    out.push_str("\n\n");
    out.push_str(h.compliance_cols);
    for b in &dash.compliance_buckets {
        out.push_str(&format!("| {} | {} |\n", cell(&b.label), b.count));
    }
    out.push('\n');

    out.push_str(h.severity);
    out.push_str("\n\n");
    out.push_str(h.severity_cols);
    for b in &dash.severity_buckets {
        let budget = match b.budget_minutes {
            Some(m) => format_duration_ms(Some(m.saturating_mul(60_000)), locale),
            None => h.no_policy.to_string(),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            cell(&b.label),
            budget,
            b.count,
            b.breach_count
        ));
    }
    out.push('\n');

    out.push_str(h.overdue);
    out.push_str("\n\n");
    let overdue = dash
        .rows
        .iter()
        .filter(|r| r.evaluation.compliance_tag == ComplianceTag::Overdue)
        .collect::<Vec<_>>();
    if overdue.is_empty() {
        out.push_str(h.none);
        out.push('\n');
    } else {
        out.push_str(h.overdue_cols);
        for row in overdue {
            let ev = &row.evaluation;
            let severity = ev
                .severity
                .map(|s| severity_label(s, locale))
                .unwrap_or("-");
            let status = ev.status.map(|s| status_label(s, locale)).unwrap_or("-");
            let deficit = ev.remaining_ms.map(i64::saturating_abs);
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                cell(&row.key),
                cell(&row.title),
                severity,
                status,
                ev.elapsed_label,
                format_duration_ms(deficit, locale)
            ));
        }
    }

    out
}
