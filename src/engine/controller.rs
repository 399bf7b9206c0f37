use std::sync::Arc;

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    dom::surface::FormSurface,
    engine::{
        command::{EngineRequest, EngineResponse, Notification},
        error::EngineError,
        notify::Notifier,
    },
    fill::{
        executor::FillExecutor,
        feedback::{FeedbackSink, TOAST_DURATION, Toast},
        session::{CancelHandle, FillResult, FillSession, FillStatus},
    },
    profile::form_data::FormData,
    screen::{
        field_model::{FormDescriptor, FormKey},
        scorer::{ScoringConfig, rank, score_page},
    },
};

/// The page plus where its visual feedback goes.
pub struct PageContext<S> {
    pub surface: S,
    pub feedback: Box<dyn FeedbackSink + Send>,
}

/// What a `fillForm` request asks for.
#[derive(Debug, Clone, Default)]
pub struct FillRequest {
    pub form: Option<FormKey>,
    pub fingerprint: Option<String>,
    pub form_data: FormData,
}

struct ActiveFill {
    cancel: CancelHandle,
    task: JoinHandle<FillResult>,
}

/// Handles host requests against one page.
///
/// Each `fillForm` gets its own [`FillSession`] running on a spawned task;
/// the engine keeps only its cancel handle so `stopFilling` can reach it.
pub struct Engine<S> {
    page: Arc<Mutex<PageContext<S>>>,
    scoring: ScoringConfig,
    executor: FillExecutor,
    notifier: Notifier,
    active: Option<ActiveFill>,
}

impl<S: FormSurface + Send + 'static> Engine<S> {
    pub fn new(
        surface: S,
        feedback: Box<dyn FeedbackSink + Send>,
        scoring: ScoringConfig,
        executor: FillExecutor,
        notifier: Notifier,
    ) -> Self {
        Self {
            page: Arc::new(Mutex::new(PageContext { surface, feedback })),
            scoring,
            executor,
            notifier,
            active: None,
        }
    }

    /// Shared handle to the page, e.g. to read values after a fill.
    pub fn page(&self) -> Arc<Mutex<PageContext<S>>> {
        Arc::clone(&self.page)
    }

    pub async fn handle(&mut self, request: EngineRequest) -> EngineResponse {
        match request {
            EngineRequest::DetectForms => match self.detect_forms().await {
                Ok(forms) => EngineResponse::Forms { forms },
                Err(e) => e.into(),
            },
            EngineRequest::FillForm {
                form,
                fingerprint,
                form_data,
            } => match self.fill_form(FillRequest {
                form,
                fingerprint,
                form_data,
            }) {
                Ok(()) => EngineResponse::Ack,
                Err(e) => e.into(),
            },
            EngineRequest::StopFilling => {
                self.stop_filling();
                EngineResponse::Ack
            }
        }
    }

    /// Accepted forms, best first.
    ///
    /// The page belongs to a running fill until it ends, so detection during
    /// a session is refused rather than queued behind it.
    pub async fn detect_forms(&self) -> Result<Vec<FormDescriptor>, EngineError> {
        if self.is_filling() {
            return Err(EngineError::SessionActive);
        }

        let page = self.page.lock().await;
        let forms = rank(score_page(&page.surface, &self.scoring));
        info!(accepted = forms.len(), "detected forms");
        Ok(forms)
    }

    /// Start a fill session in the background.
    ///
    /// Returns once the session is scheduled; the outcome arrives as a
    /// [`Notification`]. Target selection failures are reported the same way.
    pub fn fill_form(&mut self, request: FillRequest) -> Result<(), EngineError> {
        if self.is_filling() {
            return Err(EngineError::SessionActive);
        }

        let cancel = CancelHandle::new();
        let page = Arc::clone(&self.page);
        let scoring = self.scoring.clone();
        let executor = self.executor.clone();
        let notifier = self.notifier.clone();
        let session_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let mut page = page.lock().await;
            let PageContext { surface, feedback } = &mut *page;
            let mut session = FillSession::new(session_cancel);

            let result = match pick_target(surface, &scoring, &request) {
                Ok(target) => {
                    let progress_notifier = notifier.clone();
                    let mut progress = move |filled: usize, total: usize| {
                        progress_notifier.notify(Notification::FillingProgress { filled, total });
                    };
                    executor
                        .run(
                            surface,
                            &mut **feedback,
                            &target,
                            &request.form_data,
                            &mut session,
                            &mut progress,
                        )
                        .await
                }
                Err(e) => {
                    warn!("fill request failed: {}", e);
                    session.fail(e.to_string());
                    feedback.toast(&Toast::error(&e.to_string()), TOAST_DURATION);
                    session.result()
                }
            };

            notifier.notify(terminal_notification(&result));
            result
        });

        self.active = Some(ActiveFill { cancel, task });
        Ok(())
    }

    /// Cancel the running session, if any. Repeated calls change nothing.
    pub fn stop_filling(&mut self) {
        match &self.active {
            Some(active) if !active.task.is_finished() => {
                info!("stop requested");
                active.cancel.cancel();
            }
            _ => {}
        }
    }

    pub fn is_filling(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.task.is_finished())
    }

    /// Wait for the current session to end and return its result.
    pub async fn wait_idle(&mut self) -> Option<FillResult> {
        let active = self.active.take()?;
        match active.task.await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("fill task ended abnormally: {}", e);
                None
            }
        }
    }
}

/// Resolve the form a request targets.
fn pick_target<S: FormSurface + ?Sized>(
    surface: &S,
    scoring: &ScoringConfig,
    request: &FillRequest,
) -> Result<FormDescriptor, EngineError> {
    let descriptors = score_page(surface, scoring);
    choose_target(descriptors, request.form, request.fingerprint.as_deref())
}

/// An explicit key bypasses the threshold; otherwise the best accepted form
/// wins. A supplied fingerprint must match the chosen form.
pub fn choose_target(
    descriptors: Vec<FormDescriptor>,
    key: Option<FormKey>,
    fingerprint: Option<&str>,
) -> Result<FormDescriptor, EngineError> {
    let mut target = match key {
        Some(key) => descriptors
            .into_iter()
            .find(|d| d.key == key)
            .ok_or(EngineError::UnknownForm(key))?,
        None => rank(descriptors)
            .into_iter()
            .next()
            .ok_or(EngineError::NoSuitableForm)?,
    };

    if let Some(expected) = fingerprint {
        if target.fingerprint != expected {
            return Err(EngineError::FormChanged { key: target.key });
        }
    }

    target.is_target_form = true;
    Ok(target)
}

pub fn terminal_notification(result: &FillResult) -> Notification {
    match result.status {
        FillStatus::Stopped => Notification::FillingStopped {
            result: result.clone(),
        },
        FillStatus::Error => Notification::FillingError {
            message: result
                .error
                .clone()
                .unwrap_or_else(|| "form filling failed".to_string()),
        },
        _ => Notification::FillingComplete {
            result: result.clone(),
        },
    }
}
