use std::io::Write;
use std::time::Instant;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::config::{AppConfig, PageSource};
use crate::cli::error::CliError;
use crate::dom::extract::parse_page;
use crate::dom::page::PageDocument;
use crate::dom::surface::FormSurface;
use crate::engine::command::{EngineRequest, EngineResponse};
use crate::engine::controller::{Engine, FillRequest};
use crate::engine::notify::Notifier;
use crate::fill::executor::FillExecutor;
use crate::fill::feedback::{LogFeedback, RecordingFeedback};
use crate::profile::form_data::FormData;
use crate::profile::store::{ApplicationStatus, ProfileStore, load_profile};
use crate::report::console::{format_detection_report, format_fill_report};
use crate::report::report_model::{DetectionReport, FillReport};
use crate::screen::field_model::FormKey;
use crate::screen::scorer::score_page;

// ============================================================================
// Logging
// ============================================================================

/// Install the stderr subscriber. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================================================
// detect subcommand
// ============================================================================

pub fn cmd_detect(source: &PageSource, config: &AppConfig, format: &str) -> Result<(), CliError> {
    let page = load_page(source)?;
    let url = page.page_url().to_string();

    let forms = score_page(&page, &config.scoring);
    let report = DetectionReport::new(&url, config.scoring.threshold, forms);
    info!(
        forms = report.forms.len(),
        accepted = report.accepted().count(),
        "detection finished"
    );

    let content = match format {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        _ => format_detection_report(&report),
    };
    print!("{}", content);
    Ok(())
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Fill a page once and report. Returns whether the session succeeded.
#[allow(clippy::too_many_arguments)]
pub fn cmd_fill(
    source: &PageSource,
    profile: Option<&str>,
    store: Option<&str>,
    application: Option<&str>,
    form: Option<FormKey>,
    config: &AppConfig,
    format: &str,
    output: Option<&str>,
) -> Result<bool, CliError> {
    let form_data = load_form_data(profile, store, application)?;
    let page = load_page(source)?;
    let url = page.page_url().to_string();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io("could not start runtime", e))?;

    let start = Instant::now();
    let feedback = RecordingFeedback::new();
    let (result, values) = runtime.block_on(async {
        let (notifier, mut notifications) = Notifier::channel();
        let mut engine = Engine::new(
            page,
            Box::new(feedback.clone()),
            config.scoring.clone(),
            FillExecutor::new(&config.fill),
            notifier,
        );

        engine.fill_form(FillRequest {
            form,
            fingerprint: None,
            form_data,
        })?;

        let result = engine.wait_idle().await.ok_or(CliError::FillAborted)?;
        let page = engine.page();
        drop(engine);

        while let Some(notification) = notifications.recv().await {
            debug!(?notification, "notification");
        }

        let values = page.lock().await.surface.values();
        Ok::<_, CliError>((result, values))
    })?;

    let report = FillReport {
        url,
        result,
        toasts: feedback.toasts(),
        values,
        duration_ms: None,
    }
    .with_duration(start.elapsed().as_millis());
    let success = report.result.success;

    let content = match format {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        _ => format_fill_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &content)
            .map_err(|e| CliError::io(format!("could not write {}", path), e))?,
        None => print!("{}", content),
    }

    Ok(success)
}

// ============================================================================
// serve subcommand
// ============================================================================

/// Answer NDJSON requests from stdin until it closes.
///
/// Responses and notifications share stdout, one JSON object per line. On
/// end of input a running fill is allowed to finish and its notifications
/// are flushed before returning.
pub fn cmd_serve(source: &PageSource, config: &AppConfig) -> Result<(), CliError> {
    let page = load_page(source)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io("could not start runtime", e))?;

    runtime.block_on(async {
        let (notifier, mut notifications) = Notifier::channel();
        let mut engine = Engine::new(
            page,
            Box::new(LogFeedback),
            config.scoring.clone(),
            FillExecutor::new(&config.fill),
            notifier,
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        info!("serving requests on stdin");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = line.map_err(|e| CliError::io("could not read stdin", e))?;
                    let Some(line) = line else { break };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let response = match EngineRequest::from_json(&line) {
                        Ok(request) => engine.handle(request).await,
                        Err(e) => EngineResponse::from(e),
                    };
                    write_line(&response)?;
                }
                Some(notification) = notifications.recv() => {
                    write_line(&notification)?;
                }
            }
        }

        engine.wait_idle().await;
        drop(engine);
        while let Some(notification) = notifications.recv().await {
            write_line(&notification)?;
        }

        Ok::<(), CliError>(())
    })
}

fn write_line<T: Serialize>(message: &T) -> Result<(), CliError> {
    let json = serde_json::to_string(message)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).map_err(|e| CliError::io("could not write stdout", e))?;
    stdout
        .flush()
        .map_err(|e| CliError::io("could not write stdout", e))
}

// ============================================================================
// profiles subcommand
// ============================================================================

pub fn cmd_profiles(store_path: &str) -> Result<(), CliError> {
    let store = ProfileStore::load(store_path)?;

    if store.applications.is_empty() {
        println!("No saved applications in {}", store_path);
        return Ok(());
    }

    for application in &store.applications {
        let marker = if application.status == ApplicationStatus::Approved {
            "\u{2713}"
        } else {
            "\u{2717}"
        };
        println!(
            "{} {}  {} ({}, {:?}, {}% complete, {} answers)",
            marker,
            application.id,
            application.name,
            application.kind.as_deref().unwrap_or("application"),
            application.status,
            application.completeness,
            application.form_data.len()
        );
    }

    println!(
        "\n{} of {} applications can be used to fill",
        store.approved().count(),
        store.applications.len()
    );
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Read the page from a file or fetch it over HTTP, then parse it.
pub fn load_page(source: &PageSource) -> Result<PageDocument, CliError> {
    let (html, fetched_from) = match (&source.html, &source.url) {
        (Some(path), _) => {
            let html = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("could not read {}", path), e))?;
            (html, format!("file://{}", path))
        }
        (None, Some(url)) => (fetch(url)?, url.clone()),
        (None, None) => return Err(CliError::MissingSource),
    };

    let url = source.page_url.clone().unwrap_or(fetched_from);
    debug!(%url, bytes = html.len(), "loaded page");
    Ok(parse_page(&url, &html))
}

fn fetch(url: &str) -> Result<String, CliError> {
    let client = reqwest::blocking::Client::new();
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| CliError::Http {
            url: url.to_string(),
            source: e,
        })
}

/// A flat profile file, or an approved application from a store.
pub fn load_form_data(
    profile: Option<&str>,
    store: Option<&str>,
    application: Option<&str>,
) -> Result<FormData, CliError> {
    match (profile, store, application) {
        (Some(path), _, _) => Ok(load_profile(path)?),
        (None, Some(store), Some(id)) => {
            let store = ProfileStore::load(store)?;
            Ok(store.form_data_for(id)?.clone())
        }
        _ => Err(CliError::MissingProfile),
    }
}
