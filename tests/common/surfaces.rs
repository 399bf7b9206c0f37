use std::time::Duration;

use form_autofill::{
    dom::{
        page::PageDocument,
        surface::{ControlId, ControlSnapshot, DomEvent, FormSurface, SelectOption, SurfaceError},
    },
    fill::{
        feedback::{FeedbackSink, RecordingFeedback, Toast},
        session::CancelHandle,
    },
};

/// A page whose writes to one control always fail.
pub struct FlakySurface {
    pub inner: PageDocument,
    pub broken: ControlId,
}

impl FormSurface for FlakySurface {
    fn page_url(&self) -> &str {
        self.inner.page_url()
    }

    fn form_count(&self) -> usize {
        self.inner.form_count()
    }

    fn controls(&self) -> Vec<ControlSnapshot> {
        self.inner.controls()
    }

    fn native_label(&self, control: ControlId) -> Option<String> {
        self.inner.native_label(control)
    }

    fn label_for(&self, id: &str) -> Option<String> {
        self.inner.label_for(id)
    }

    fn parent_text(&self, control: ControlId) -> Option<String> {
        self.inner.parent_text(control)
    }

    fn options(&self, control: ControlId) -> Vec<SelectOption> {
        self.inner.options(control)
    }

    fn focus(&mut self, control: ControlId) -> Result<(), SurfaceError> {
        self.inner.focus(control)
    }

    fn set_value(&mut self, control: ControlId, value: &str) -> Result<(), SurfaceError> {
        if control == self.broken {
            return Err(SurfaceError::Rejected {
                control,
                reason: "read-only".into(),
            });
        }
        self.inner.set_value(control, value)
    }

    fn select_option(&mut self, control: ControlId, index: usize) -> Result<(), SurfaceError> {
        self.inner.select_option(control, index)
    }

    fn dispatch_event(&mut self, control: ControlId, event: DomEvent) -> Result<(), SurfaceError> {
        self.inner.dispatch_event(control, event)
    }
}

/// Records like [`RecordingFeedback`] and fires `cancel` after the n-th
/// highlight, the way a user pressing stop mid-fill would.
pub struct StopAfter {
    pub record: RecordingFeedback,
    pub cancel: CancelHandle,
    pub after: usize,
    seen: usize,
}

impl StopAfter {
    pub fn new(cancel: CancelHandle, after: usize) -> Self {
        Self {
            record: RecordingFeedback::new(),
            cancel,
            after,
            seen: 0,
        }
    }
}

impl FeedbackSink for StopAfter {
    fn highlight(&mut self, control: ControlId, duration: Duration) {
        self.record.highlight(control, duration);
        self.seen += 1;
        if self.seen == self.after {
            self.cancel.cancel();
        }
    }

    fn toast(&mut self, toast: &Toast, duration: Duration) {
        self.record.toast(toast, duration);
    }
}
