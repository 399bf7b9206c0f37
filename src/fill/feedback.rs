use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::dom::surface::ControlId;

/// How long a filled field stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(2000);

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Transient page message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub text: String,
}

impl Toast {
    pub fn filling() -> Self {
        Self {
            level: ToastLevel::Info,
            text: "Filling the form...".into(),
        }
    }

    pub fn completed(filled: usize) -> Self {
        Self {
            level: ToastLevel::Success,
            text: format!("Form filled successfully! {} fields completed.", filled),
        }
    }

    pub fn stopped() -> Self {
        Self {
            level: ToastLevel::Info,
            text: "Form filling stopped by user".into(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: ToastLevel::Error,
            text: format!("Error: {}", message),
        }
    }
}

/// Visual feedback rendered while a session runs.
pub trait FeedbackSink {
    fn highlight(&mut self, control: ControlId, duration: Duration);
    fn toast(&mut self, toast: &Toast, duration: Duration);
}

/// Feedback written to the log only.
#[derive(Debug, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn highlight(&mut self, control: ControlId, _duration: Duration) {
        info!(control = control.0, "highlight");
    }

    fn toast(&mut self, toast: &Toast, _duration: Duration) {
        info!(level = ?toast.level, "{}", toast.text);
    }
}

/// Keeps every highlight and toast, in order. Clones share the same record,
/// so a caller can hand one clone to a session and read the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    record: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Default)]
struct Recorded {
    highlights: Vec<ControlId>,
    toasts: Vec<Toast>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlights(&self) -> Vec<ControlId> {
        self.lock().map(|r| r.highlights.clone()).unwrap_or_default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().map(|r| r.toasts.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Recorded>> {
        self.record.lock().ok()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn highlight(&mut self, control: ControlId, _duration: Duration) {
        if let Some(mut record) = self.lock() {
            record.highlights.push(control);
        }
    }

    fn toast(&mut self, toast: &Toast, _duration: Duration) {
        if let Some(mut record) = self.lock() {
            record.toasts.push(toast.clone());
        }
    }
}
