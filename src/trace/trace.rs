use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{dom::surface::ControlId, screen::field_model::FormKey};

/// What happened to one field during a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOutcome {
    Filled,
    /// No pattern produced a value.
    Unresolved,
    /// A pattern matched but the value did not suit the control.
    Rejected,
    /// Select had no option matching the value.
    NoOption,
    /// The page refused the write.
    Failed,
    /// Session was cancelled before this field.
    Cancelled,
}

/// One line of the fill trace. Profile values are never recorded.
#[derive(Debug, Serialize)]
pub struct FillTraceEvent {
    pub timestamp_ms: u128,
    pub step: usize,
    pub form: String,

    pub control: Option<usize>,
    pub signature: Option<String>,

    pub pattern: Option<String>,
    pub outcome: Option<FieldOutcome>,
    pub error: Option<String>,
}

impl FillTraceEvent {
    pub fn now(step: usize, form: FormKey) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            form: form.to_string(),
            control: None,
            signature: None,
            pattern: None,
            outcome: None,
            error: None,
        }
    }

    pub fn with_field(mut self, control: ControlId, signature: &str) -> Self {
        self.control = Some(control.0);
        self.signature = Some(signature.trim().to_string());
        self
    }

    pub fn with_pattern(mut self, pattern: Option<&str>) -> Self {
        self.pattern = pattern.map(str::to_string);
        self
    }

    pub fn with_outcome(mut self, outcome: FieldOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
