use thiserror::Error;

use crate::screen::field_model::FormKey;

/// Request-level failures. Per-field problems never surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No form on the page reached the confidence threshold.
    #[error("no suitable form found on this page")]
    NoSuitableForm,

    #[error("{0} is not present on this page")]
    UnknownForm(FormKey),

    /// The target's fields no longer match what the host detected.
    #[error("{key} changed since it was detected")]
    FormChanged { key: FormKey },

    #[error("a fill session is already running")]
    SessionActive,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
