use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    dom::surface::{DomEvent, FormSurface, SurfaceError},
    fill::{
        feedback::{FeedbackSink, HIGHLIGHT_DURATION, TOAST_DURATION, Toast},
        select::match_option,
        session::{FillResult, FillSession},
    },
    profile::{
        form_data::FormData,
        resolver::{Resolution, resolve},
    },
    screen::field_model::{ControlType, FieldDescriptor, FormDescriptor},
    trace::{
        logger::TraceLogger,
        trace::{FieldOutcome, FillTraceEvent},
    },
};

/// Delay between filled fields when nothing else is configured.
pub const DEFAULT_FILL_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillConfig {
    /// Pause after each filled field; 0 disables pacing.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// JSONL file receiving one trace line per field decision.
    #[serde(default)]
    pub trace_file: Option<String>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_FILL_DELAY_MS,
            trace_file: None,
        }
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_FILL_DELAY_MS
}

/// Receives `(filled, total)` after every filled field.
pub type ProgressFn<'a> = &'a mut (dyn FnMut(usize, usize) + Send);

/// Drives the sequential, paced, cancellable fill loop.
#[derive(Clone)]
pub struct FillExecutor {
    delay: Duration,
    tracer: Arc<TraceLogger>,
}

impl FillExecutor {
    pub fn new(config: &FillConfig) -> Self {
        let tracer = match &config.trace_file {
            Some(path) => TraceLogger::open(path),
            None => TraceLogger::disabled(),
        };
        Self {
            delay: Duration::from_millis(config.delay_ms),
            tracer: Arc::new(tracer),
        }
    }

    /// No pacing, no trace. Handy for tests and batch use.
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            tracer: Arc::new(TraceLogger::disabled()),
        }
    }

    /// Fill `form` from `data`, one field at a time.
    ///
    /// Cancellation is polled before each field and once more before the
    /// session completes, so a stop takes effect after at most the field
    /// already in flight. A field that cannot be written is logged and
    /// skipped. The session ends `completed` or `stopped`.
    pub async fn run<S: FormSurface + ?Sized>(
        &self,
        surface: &mut S,
        feedback: &mut (dyn FeedbackSink + Send),
        form: &FormDescriptor,
        data: &FormData,
        session: &mut FillSession,
        progress: ProgressFn<'_>,
    ) -> FillResult {
        session.start(form.fields.len());
        feedback.toast(&Toast::filling(), TOAST_DURATION);
        info!(form = %form.key, fields = form.fields.len(), "starting fill");

        for (step, field) in form.fields.iter().enumerate() {
            let signature = field.signature();
            let trace = FillTraceEvent::now(step, form.key).with_field(field.control, &signature);

            if session.is_cancelled() {
                session.stop();
                self.tracer.log(&trace.with_outcome(FieldOutcome::Cancelled));
                return stopped(session, feedback);
            }

            let resolution = resolve(&signature, field.control_type, data);
            let trace = trace.with_pattern(resolution.pattern());

            let value = match resolution {
                Resolution::Value { value, .. } => value,
                Resolution::Rejected { pattern } => {
                    debug!(control = field.control.0, pattern, "value rejected for control type");
                    self.tracer.log(&trace.with_outcome(FieldOutcome::Rejected));
                    continue;
                }
                Resolution::Unmatched => {
                    debug!(control = field.control.0, signature = signature.trim(), "no value");
                    self.tracer.log(&trace.with_outcome(FieldOutcome::Unresolved));
                    continue;
                }
            };

            match fill_control(surface, field, &value) {
                Ok(true) => {
                    session.record_fill();
                    feedback.highlight(field.control, HIGHLIGHT_DURATION);
                    progress(session.filled_fields(), session.total_fields());
                    debug!(control = field.control.0, "filled");
                    self.tracer.log(&trace.with_outcome(FieldOutcome::Filled));
                    self.pause().await;
                }
                Ok(false) => {
                    debug!(control = field.control.0, "no select option matched");
                    self.tracer.log(&trace.with_outcome(FieldOutcome::NoOption));
                }
                Err(e) => {
                    warn!(control = field.control.0, "fill failed: {}", e);
                    self.tracer
                        .log(&trace.with_outcome(FieldOutcome::Failed).with_error(&e));
                }
            }
        }

        if session.is_cancelled() {
            return stopped(session, feedback);
        }

        session.complete();
        feedback.toast(&Toast::completed(session.filled_fields()), TOAST_DURATION);
        info!(
            filled = session.filled_fields(),
            total = session.total_fields(),
            "fill complete"
        );
        session.result()
    }

    async fn pause(&self) {
        if self.delay.is_zero() {
            // Still yield so stop requests get a chance to run.
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn stopped(session: &mut FillSession, feedback: &mut (dyn FeedbackSink + Send)) -> FillResult {
    session.stop();
    feedback.toast(&Toast::stopped(), TOAST_DURATION);
    info!(
        filled = session.filled_fields(),
        total = session.total_fields(),
        "fill stopped"
    );
    session.result()
}

/// Write `value` into one field with the event sequence a user would cause.
///
/// Returns `Ok(false)` when a select has no option matching `value`; the
/// control is left untouched in that case.
pub fn fill_control<S: FormSurface + ?Sized>(
    surface: &mut S,
    field: &FieldDescriptor,
    value: &str,
) -> Result<bool, SurfaceError> {
    let control = field.control;

    if field.control_type == ControlType::Select {
        let options = surface.options(control);
        let Some(index) = match_option(&options, value) else {
            return Ok(false);
        };

        surface.focus(control)?;
        surface.set_value(control, &options[index].value)?;
        surface.select_option(control, index)?;
    } else {
        surface.focus(control)?;
        surface.set_value(control, "")?;
        surface.dispatch_event(control, DomEvent::Input)?;
        surface.set_value(control, value)?;
    }

    surface.dispatch_event(control, DomEvent::Input)?;
    surface.dispatch_event(control, DomEvent::Change)?;
    surface.dispatch_event(control, DomEvent::Blur)?;
    Ok(true)
}
