use crate::dom::surface::FormSurface;
use crate::screen::classifier::classify;
use crate::screen::field_model::{ControlType, FieldDescriptor, FormKey, field_signature};
use crate::screen::label::resolve_label;

/// Fields grouped by the form that owns them.
#[derive(Debug, Clone)]
pub struct ScannedForm {
    pub key: FormKey,
    pub fields: Vec<FieldDescriptor>,
}

/// Walk every control on the page and group fillable ones by form.
///
/// One entry per `<form>` in document order (even when it holds no fillable
/// field), followed by a `Loose` entry when controls exist outside any form.
pub fn scan_forms<S: FormSurface + ?Sized>(surface: &S) -> Vec<ScannedForm> {
    let mut forms: Vec<ScannedForm> = (0..surface.form_count())
        .map(|i| ScannedForm {
            key: FormKey::Form(i),
            fields: Vec::new(),
        })
        .collect();
    let mut loose = Vec::new();

    for control in surface.controls() {
        if control.disabled {
            continue;
        }

        let Some(control_type) = ControlType::from_html(&control.tag, control.input_type.as_deref())
        else {
            continue;
        };

        let label = resolve_label(surface, &control);
        let categories = classify(&field_signature(
            &control.name,
            &control.id,
            &control.placeholder,
            &label,
        ));

        let field = FieldDescriptor {
            control: control.control,
            control_type,
            name: control.name,
            id: control.id,
            placeholder: control.placeholder,
            label,
            required: control.required,
            categories,
        };

        match control.form_index.and_then(|i| forms.get_mut(i)) {
            Some(form) => form.fields.push(field),
            None => loose.push(field),
        }
    }

    if !loose.is_empty() {
        forms.push(ScannedForm {
            key: FormKey::Loose,
            fields: loose,
        });
    }

    forms
}
