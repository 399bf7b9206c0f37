use thiserror::Error;

use crate::engine::error::EngineError;
use crate::profile::store::StoreError;

/// Failures surfaced by the `form-autofill` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The fill task ended without producing a result.
    #[error("fill task aborted")]
    FillAborted,

    /// Neither `--html` nor `--url` was given.
    #[error("no page given, pass --html <file> or --url <url>")]
    MissingSource,

    #[error("no profile given, pass --profile <file> or --store <file> --application <id>")]
    MissingProfile,
}

impl CliError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CliError::Io {
            context: context.into(),
            source,
        }
    }
}
