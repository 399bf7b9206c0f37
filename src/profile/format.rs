use chrono::NaiveDate;

use crate::screen::field_model::ControlType;

/// Formats tried, in order, when a date is not already `YYYY-MM-DD`.
/// Numeric dates are read day-first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Shape a resolved profile value for the control it is going into.
/// `None` means the value is unusable for this control and the field is
/// skipped.
pub fn format_for_control(value: &str, control_type: ControlType) -> Option<String> {
    match control_type {
        ControlType::Email => value.contains('@').then(|| value.to_string()),
        ControlType::Tel => normalize_phone(value),
        ControlType::Date => normalize_date(value),
        ControlType::Number => {
            let digits: String = value.chars().filter(char::is_ascii_digit).collect();
            (!digits.is_empty()).then_some(digits)
        }
        ControlType::Text | ControlType::Textarea | ControlType::Select => Some(value.to_string()),
    }
}

/// Digits only, keeping a `+` when the number starts with one.
pub fn normalize_phone(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return None;
    }

    if trimmed.starts_with('+') {
        Some(format!("+{}", digits))
    } else {
        Some(digits)
    }
}

/// `YYYY-MM-DD` calendar dates pass through untouched; other recognised
/// formats are rewritten to `YYYY-MM-DD`; anything else is rejected.
pub fn normalize_date(value: &str) -> Option<String> {
    let trimmed = value.trim();

    if is_iso_shaped(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .map(|_| trimmed.to_string());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn is_iso_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
