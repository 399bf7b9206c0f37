use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::surface::ControlId;

/// Fillable control kinds. Anything else on the page is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Text,
    Email,
    Tel,
    Date,
    Number,
    Select,
    Textarea,
}

impl ControlType {
    /// Map an HTML tag and `type` attribute onto a fillable control type.
    pub fn from_html(tag: &str, input_type: Option<&str>) -> Option<ControlType> {
        match tag {
            "select" => Some(ControlType::Select),
            "textarea" => Some(ControlType::Textarea),
            "input" => match input_type {
                None | Some("") | Some("text") | Some("search") | Some("url") | Some("password") => {
                    Some(ControlType::Text)
                }
                Some("email") => Some(ControlType::Email),
                Some("tel") => Some(ControlType::Tel),
                Some("date") => Some(ControlType::Date),
                Some("number") => Some(ControlType::Number),

                // submit, button, reset, image, hidden, file, checkbox, radio, ...
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Personal,
    Education,
    Income,
    Documents,
}

/// Which kind of government form the category mix suggests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Scholarship,
    Benefit,
    Unknown,
}

/// Identifies a form on the page: the n-th `<form>` in document order, or
/// the synthetic group of controls that sit outside any `<form>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormKey {
    Form(usize),
    Loose,
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKey::Form(index) => write!(f, "form #{}", index),
            FormKey::Loose => write!(f, "loose fields"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub control: ControlId,
    pub control_type: ControlType,
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub label: String,
    pub required: bool,
    pub categories: BTreeSet<Category>,
}

impl FieldDescriptor {
    /// Lower-cased `name id placeholder label`, the text every heuristic reads.
    pub fn signature(&self) -> String {
        field_signature(&self.name, &self.id, &self.placeholder, &self.label)
    }
}

pub fn field_signature(name: &str, id: &str, placeholder: &str, label: &str) -> String {
    format!("{} {} {} {}", name, id, placeholder, label).to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    pub key: FormKey,
    pub fields: Vec<FieldDescriptor>,
    pub category_hits: BTreeSet<Category>,
    pub kind: FormKind,
    pub confidence_score: u32,
    /// Score reached the configured threshold.
    pub accepted: bool,
    pub is_target_form: bool,
    /// SHA-1 over the ordered field identities.
    pub fingerprint: String,
}
