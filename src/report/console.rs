use crate::fill::session::FillStatus;
use crate::report::report_model::{DetectionReport, FillReport};
use crate::screen::field_model::{Category, FormDescriptor, FormKind};

// ============================================================================
// Console reporter
// ============================================================================

/// Format a detection report for terminal output.
///
/// Produces output like:
/// ```text
/// === Forms on http://localhost/apply (government site) ===
///
/// ✓ TARGET  form #0: scholarship, score 75 (4 fields: personal, education)
/// ✓ ACCEPT  form #1: benefit, score 55 (3 fields: personal, income)
/// ✗ REJECT  loose fields: unknown, score 30 (1 field)
///
/// === Results: 2 accepted, 1 rejected (threshold 40) ===
/// ```
pub fn format_detection_report(report: &DetectionReport) -> String {
    let mut out = String::new();

    let site = if report.government_site {
        " (government site)"
    } else {
        ""
    };
    out.push_str(&format!("=== Forms on {}{} ===\n\n", report.url, site));

    if report.forms.is_empty() {
        out.push_str("No forms found.\n");
    }

    for form in &report.forms {
        let marker = if form.is_target_form {
            "\u{2713} TARGET"
        } else if form.accepted {
            "\u{2713} ACCEPT"
        } else {
            "\u{2717} REJECT"
        };

        out.push_str(&format!("{}  {}\n", marker, describe_form(form)));
    }

    let accepted = report.accepted().count();
    out.push_str(&format!(
        "\n=== Results: {} accepted, {} rejected (threshold {}) ===\n",
        accepted,
        report.forms.len() - accepted,
        report.threshold
    ));

    out
}

/// Format a fill report: one line per written control, then the outcome.
pub fn format_fill_report(report: &FillReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Fill: {} ===\n\n", report.url));

    for value in &report.values {
        let label = if value.name.is_empty() {
            &value.id
        } else {
            &value.name
        };
        out.push_str(&format!("  {} = {:?}\n", label, value.value));
    }

    for toast in &report.toasts {
        out.push_str(&format!("  [{:?}] {}\n", toast.level, toast.text));
    }

    let result = &report.result;
    let marker = if result.success {
        "\u{2713}"
    } else {
        "\u{2717}"
    };
    out.push_str(&format!(
        "\n=== {} {}: {} of {} fields filled",
        marker,
        status_label(result.status),
        result.filled_count,
        result.total_count
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    if let Some(ref error) = result.error {
        out.push_str(&format!("    [ERROR] {}\n", error));
    }

    out
}

fn describe_form(form: &FormDescriptor) -> String {
    let count = form.fields.len();
    let noun = if count == 1 { "field" } else { "fields" };
    let hits: Vec<&str> = form.category_hits.iter().map(|c| category_name(*c)).collect();

    let mut line = format!(
        "{}: {}, score {} ({} {}",
        form.key,
        kind_name(form.kind),
        form.confidence_score,
        count,
        noun
    );
    if !hits.is_empty() {
        line.push_str(&format!(": {}", hits.join(", ")));
    }
    line.push(')');
    line
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Personal => "personal",
        Category::Education => "education",
        Category::Income => "income",
        Category::Documents => "documents",
    }
}

fn kind_name(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Scholarship => "scholarship",
        FormKind::Benefit => "benefit",
        FormKind::Unknown => "unknown",
    }
}

fn status_label(status: FillStatus) -> &'static str {
    match status {
        FillStatus::Idle => "Idle",
        FillStatus::Filling => "Filling",
        FillStatus::Completed => "Completed",
        FillStatus::Stopped => "Stopped",
        FillStatus::Error => "Error",
    }
}
