use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Capability interface over the page a fill session writes to
// ============================================================================

/// Opaque handle to one form control, stable for the lifetime of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlId(pub usize);

/// Synthetic events dispatched after a value write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEvent {
    Input,
    Change,
    Blur,
}

/// Read-only view of a control as seen at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSnapshot {
    pub control: ControlId,
    pub tag: String,
    pub input_type: Option<String>,
    pub name: String,
    pub id: String,
    pub placeholder: String,
    pub value: String,
    pub required: bool,
    pub disabled: bool,
    /// Index of the owning `<form>` in document order, `None` for loose controls.
    pub form_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("control {0:?} is not attached to the page")]
    Detached(ControlId),

    #[error("control {control:?} has no option at index {index}")]
    NoSuchOption { control: ControlId, index: usize },

    #[error("control {control:?} rejected the write: {reason}")]
    Rejected { control: ControlId, reason: String },
}

/// The operations the engine needs from a page. Everything above this trait
/// (scanning, scoring, value mapping, the fill loop) is DOM-agnostic.
pub trait FormSurface {
    fn page_url(&self) -> &str;

    /// Number of `<form>` elements on the page.
    fn form_count(&self) -> usize;

    /// All `input`, `select` and `textarea` controls in document order.
    fn controls(&self) -> Vec<ControlSnapshot>;

    /// Text of the `<label>` natively associated with the control.
    fn native_label(&self, control: ControlId) -> Option<String>;

    /// Text of the first `label[for=<id>]` in the document.
    fn label_for(&self, id: &str) -> Option<String>;

    /// Full text content of the control's parent element.
    fn parent_text(&self, control: ControlId) -> Option<String>;

    fn options(&self, control: ControlId) -> Vec<SelectOption>;

    fn focus(&mut self, control: ControlId) -> Result<(), SurfaceError>;

    fn set_value(&mut self, control: ControlId, value: &str) -> Result<(), SurfaceError>;

    /// Mark the option at `index` as selected.
    fn select_option(&mut self, control: ControlId, index: usize) -> Result<(), SurfaceError>;

    fn dispatch_event(&mut self, control: ControlId, event: DomEvent) -> Result<(), SurfaceError>;
}
