use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStatus {
    Idle,
    Filling,
    Completed,
    Stopped,
    Error,
}

impl FillStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, FillStatus::Completed | FillStatus::Stopped | FillStatus::Error)
    }
}

/// Shared stop flag for one session. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Summary handed back to the invoking context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillResult {
    /// At least one field was filled and the session ran to completion.
    pub success: bool,
    pub status: FillStatus,
    pub filled_count: usize,
    pub total_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One autofill pass over one target form.
///
/// `idle → filling → completed | stopped`, or `idle → error` when the request
/// fails its preconditions. Transitions out of a terminal state are ignored.
#[derive(Debug)]
pub struct FillSession {
    total_fields: usize,
    filled_fields: usize,
    status: FillStatus,
    cancel: CancelHandle,
    error: Option<String>,
}

impl FillSession {
    pub fn new(cancel: CancelHandle) -> Self {
        Self {
            total_fields: 0,
            filled_fields: 0,
            status: FillStatus::Idle,
            cancel,
            error: None,
        }
    }

    /// Enter `filling` for a target with `total_fields` fields.
    ///
    /// The cancel flag is not cleared here: a stop that arrives between the
    /// request being acknowledged and the loop starting still applies.
    pub fn start(&mut self, total_fields: usize) {
        if self.status != FillStatus::Idle {
            return;
        }
        self.total_fields = total_fields;
        self.filled_fields = 0;
        self.status = FillStatus::Filling;
    }

    pub fn record_fill(&mut self) {
        if self.status == FillStatus::Filling && self.filled_fields < self.total_fields {
            self.filled_fields += 1;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        if self.status == FillStatus::Filling {
            self.status = FillStatus::Stopped;
        }
    }

    pub fn complete(&mut self) {
        if self.status == FillStatus::Filling {
            self.status = FillStatus::Completed;
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.status.is_terminal() {
            self.status = FillStatus::Error;
            self.error = Some(message.into());
        }
    }

    pub fn status(&self) -> FillStatus {
        self.status
    }

    pub fn filled_fields(&self) -> usize {
        self.filled_fields
    }

    pub fn total_fields(&self) -> usize {
        self.total_fields
    }

    pub fn result(&self) -> FillResult {
        FillResult {
            success: self.status == FillStatus::Completed && self.filled_fields > 0,
            status: self.status,
            filled_count: self.filled_fields,
            total_count: self.total_fields,
            error: self.error.clone(),
        }
    }
}
