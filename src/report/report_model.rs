use serde::Serialize;

use crate::dom::page::ControlValue;
use crate::fill::feedback::Toast;
use crate::fill::session::FillResult;
use crate::screen::field_model::FormDescriptor;
use crate::screen::scorer::{is_government_site, select_target};

// ============================================================================
// Report models
// ============================================================================

/// Everything the scorer concluded about one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub url: String,

    /// URL matches a known government or local test host.
    pub government_site: bool,

    pub threshold: u32,

    /// Every form on the page in document order, accepted or not.
    pub forms: Vec<FormDescriptor>,
}

impl DetectionReport {
    /// Build from every scored form and flag the one a fill would target.
    pub fn new(url: &str, threshold: u32, mut forms: Vec<FormDescriptor>) -> Self {
        let target = select_target(&forms).map(|f| f.key);
        for form in &mut forms {
            form.is_target_form = Some(form.key) == target;
        }

        Self {
            url: url.to_string(),
            government_site: is_government_site(url),
            threshold,
            forms,
        }
    }

    pub fn accepted(&self) -> impl Iterator<Item = &FormDescriptor> {
        self.forms.iter().filter(|f| f.accepted)
    }

    pub fn target(&self) -> Option<&FormDescriptor> {
        self.forms.iter().find(|f| f.is_target_form)
    }
}

/// Outcome of one fill run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub url: String,
    pub result: FillResult,
    pub toasts: Vec<Toast>,

    /// Final value of every control on the page.
    pub values: Vec<ControlValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl FillReport {
    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}
