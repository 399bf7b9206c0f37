use serde::{Deserialize, Serialize};

use crate::{
    engine::error::EngineError,
    fill::session::FillResult,
    profile::form_data::FormData,
    screen::field_model::{FormDescriptor, FormKey},
};

/// Requests the engine accepts, one JSON object per message:
///
/// ```text
/// {"action":"detectForms"}
/// {"action":"fillForm","form":{"form":0},"formData":{"fullName":"A B"}}
/// {"action":"stopFilling"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum EngineRequest {
    DetectForms,

    FillForm {
        /// Target form; the best-scoring accepted form when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        form: Option<FormKey>,

        /// Fingerprint from a previous detection the target must still match.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fingerprint: Option<String>,

        #[serde(rename = "formData", default)]
        form_data: FormData,
    },

    StopFilling,
}

impl EngineRequest {
    /// Parse one wire message.
    pub fn from_json(line: &str) -> Result<Self, EngineError> {
        serde_json::from_str(line).map_err(|e| EngineError::InvalidRequest(e.to_string()))
    }
}

/// Immediate reply to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EngineResponse {
    Forms { forms: Vec<FormDescriptor> },
    Ack,
    Error { message: String },
}

impl From<EngineError> for EngineResponse {
    fn from(e: EngineError) -> Self {
        EngineResponse::Error {
            message: e.to_string(),
        }
    }
}

/// Asynchronous messages sent while and after a fill runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    FillingProgress { filled: usize, total: usize },
    FillingComplete { result: FillResult },
    FillingStopped { result: FillResult },
    FillingError { message: String },
}
