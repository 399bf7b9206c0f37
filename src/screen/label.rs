use crate::dom::extract::collapse_whitespace;
use crate::dom::surface::{ControlSnapshot, FormSurface};

/// Parent text at or beyond this many characters is treated as a container,
/// not a label.
pub const MAX_NEARBY_LABEL_CHARS: usize = 100;

/// Best-effort human-readable label for a control.
///
/// Tries, in order: the natively associated `<label>`, a `label[for=id]`
/// anywhere in the document, then the parent element's text with the
/// control's own value removed. An empty string means no label was found.
pub fn resolve_label<S: FormSurface + ?Sized>(surface: &S, control: &ControlSnapshot) -> String {
    if let Some(text) = surface.native_label(control.control) {
        return text;
    }

    if let Some(text) = surface.label_for(&control.id) {
        return text;
    }

    surface
        .parent_text(control.control)
        .and_then(|text| nearby_text(&text, &control.value))
        .unwrap_or_default()
}

fn nearby_text(parent_text: &str, value: &str) -> Option<String> {
    let stripped = if value.is_empty() {
        parent_text.to_string()
    } else {
        parent_text.replacen(value, "", 1)
    };

    let text = collapse_whitespace(&stripped);
    let len = text.chars().count();

    if len > 0 && len < MAX_NEARBY_LABEL_CHARS {
        Some(text)
    } else {
        None
    }
}
