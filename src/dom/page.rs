use serde::Serialize;

use crate::dom::surface::{ControlId, ControlSnapshot, DomEvent, FormSurface, SelectOption, SurfaceError};

/// One control as parsed from the page's HTML.
#[derive(Debug, Clone)]
pub struct PageControl {
    pub snapshot: ControlSnapshot,
    pub native_label: Option<String>,
    pub parent_text: Option<String>,
    pub options: Vec<SelectOption>,
}

/// A `<label for=...>` element.
#[derive(Debug, Clone)]
pub struct PageLabel {
    pub for_id: String,
    pub text: String,
}

/// Every mutation the engine performed, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum JournalEntry {
    Focus { control: ControlId },
    SetValue { control: ControlId, value: String },
    SelectOption { control: ControlId, index: usize },
    Event { control: ControlId, event: DomEvent },
}

/// Final value of one control, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlValue {
    pub control: ControlId,
    pub name: String,
    pub id: String,
    pub value: String,
}

/// In-memory page backed by parsed HTML.
///
/// Built by [`crate::dom::extract::parse_page`]. Writes go to the control
/// values held here and are journaled, so a caller can inspect both the end
/// state and the exact event sequence a fill produced.
#[derive(Debug, Clone)]
pub struct PageDocument {
    url: String,
    form_count: usize,
    controls: Vec<PageControl>,
    labels: Vec<PageLabel>,
    focused: Option<ControlId>,
    journal: Vec<JournalEntry>,
}

impl PageDocument {
    pub fn new(url: &str, form_count: usize, controls: Vec<PageControl>, labels: Vec<PageLabel>) -> Self {
        Self {
            url: url.to_string(),
            form_count,
            controls,
            labels,
            focused: None,
            journal: Vec::new(),
        }
    }

    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub fn focused(&self) -> Option<ControlId> {
        self.focused
    }

    pub fn value_of(&self, control: ControlId) -> Option<&str> {
        self.controls
            .get(control.0)
            .map(|c| c.snapshot.value.as_str())
    }

    /// First control whose `name` (or, failing that, `id`) equals `key`.
    pub fn control_named(&self, key: &str) -> Option<ControlId> {
        self.controls
            .iter()
            .find(|c| c.snapshot.name == key)
            .or_else(|| self.controls.iter().find(|c| c.snapshot.id == key))
            .map(|c| c.snapshot.control)
    }

    pub fn values(&self) -> Vec<ControlValue> {
        self.controls
            .iter()
            .map(|c| ControlValue {
                control: c.snapshot.control,
                name: c.snapshot.name.clone(),
                id: c.snapshot.id.clone(),
                value: c.snapshot.value.clone(),
            })
            .collect()
    }

    fn control_mut(&mut self, control: ControlId) -> Result<&mut PageControl, SurfaceError> {
        self.controls
            .get_mut(control.0)
            .ok_or(SurfaceError::Detached(control))
    }

    fn control(&self, control: ControlId) -> Option<&PageControl> {
        self.controls.get(control.0)
    }
}

impl FormSurface for PageDocument {
    fn page_url(&self) -> &str {
        &self.url
    }

    fn form_count(&self) -> usize {
        self.form_count
    }

    fn controls(&self) -> Vec<ControlSnapshot> {
        self.controls.iter().map(|c| c.snapshot.clone()).collect()
    }

    fn native_label(&self, control: ControlId) -> Option<String> {
        self.control(control).and_then(|c| c.native_label.clone())
    }

    fn label_for(&self, id: &str) -> Option<String> {
        if id.is_empty() {
            return None;
        }
        self.labels
            .iter()
            .find(|l| l.for_id == id)
            .map(|l| l.text.clone())
    }

    fn parent_text(&self, control: ControlId) -> Option<String> {
        self.control(control).and_then(|c| c.parent_text.clone())
    }

    fn options(&self, control: ControlId) -> Vec<SelectOption> {
        self.control(control)
            .map(|c| c.options.clone())
            .unwrap_or_default()
    }

    fn focus(&mut self, control: ControlId) -> Result<(), SurfaceError> {
        self.control_mut(control)?;
        self.focused = Some(control);
        self.journal.push(JournalEntry::Focus { control });
        Ok(())
    }

    fn set_value(&mut self, control: ControlId, value: &str) -> Result<(), SurfaceError> {
        let target = self.control_mut(control)?;
        target.snapshot.value = value.to_string();

        // A select's value follows the option carrying it, like the DOM.
        if !target.options.is_empty() {
            for option in &mut target.options {
                option.selected = option.value == value;
            }
        }

        self.journal.push(JournalEntry::SetValue {
            control,
            value: value.to_string(),
        });
        Ok(())
    }

    fn select_option(&mut self, control: ControlId, index: usize) -> Result<(), SurfaceError> {
        let target = self.control_mut(control)?;
        if index >= target.options.len() {
            return Err(SurfaceError::NoSuchOption { control, index });
        }

        for (i, option) in target.options.iter_mut().enumerate() {
            option.selected = i == index;
        }
        target.snapshot.value = target.options[index].value.clone();

        self.journal.push(JournalEntry::SelectOption { control, index });
        Ok(())
    }

    fn dispatch_event(&mut self, control: ControlId, event: DomEvent) -> Result<(), SurfaceError> {
        self.control_mut(control)?;
        if event == DomEvent::Blur && self.focused == Some(control) {
            self.focused = None;
        }
        self.journal.push(JournalEntry::Event { control, event });
        Ok(())
    }
}
