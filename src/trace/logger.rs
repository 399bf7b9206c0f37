use std::{fs::OpenOptions, io::Write, path::Path, sync::Mutex};

use tracing::warn;

use crate::trace::trace::FillTraceEvent;

/// Appends [`FillTraceEvent`]s to a JSONL file. Write failures are logged and
/// swallowed; tracing must never break a fill.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                warn!("could not open trace file '{}': {}", path.display(), e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn log(&self, event: &FillTraceEvent) {
        let Some(file_mutex) = &self.file else {
            return;
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize trace event: {}", e);
                return;
            }
        };

        match file_mutex.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", json) {
                    warn!("failed to write trace event: {}", e);
                }
            }
            Err(e) => warn!("trace logger lock poisoned: {}", e),
        }
    }
}
