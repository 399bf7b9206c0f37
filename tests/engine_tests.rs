use form_autofill::{
    dom::{extract::parse_page, page::PageDocument, surface::ControlId},
    engine::{
        command::{EngineRequest, EngineResponse, Notification},
        controller::{Engine, FillRequest, choose_target, terminal_notification},
        error::EngineError,
        notify::Notifier,
    },
    fill::{
        executor::{FillConfig, FillExecutor},
        feedback::{RecordingFeedback, Toast},
        session::{FillResult, FillStatus},
    },
    profile::form_data::FormData,
    screen::{
        field_model::FormKey,
        scorer::{ScoringConfig, score_page},
    },
};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::common::utils::{WELFARE_URL, fixture_page, minimal_page, minimal_profile};

mod common;

// =========================================================================
// Helpers
// =========================================================================

fn engine_for(
    page: PageDocument,
    executor: FillExecutor,
) -> (Engine<PageDocument>, RecordingFeedback, UnboundedReceiver<Notification>) {
    let feedback = RecordingFeedback::new();
    let (notifier, rx) = Notifier::channel();
    let engine = Engine::new(
        page,
        Box::new(feedback.clone()),
        ScoringConfig::default(),
        executor,
        notifier,
    );
    (engine, feedback, rx)
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}

fn fill_request(json: &str) -> EngineRequest {
    EngineRequest::from_json(json).unwrap()
}

// =========================================================================
// Wire format
// =========================================================================

#[test]
fn requests_parse_from_json() {
    assert!(matches!(
        fill_request(r#"{"action":"detectForms"}"#),
        EngineRequest::DetectForms
    ));
    assert!(matches!(
        fill_request(r#"{"action":"stopFilling"}"#),
        EngineRequest::StopFilling
    ));

    match fill_request(
        r#"{"action":"fillForm","form":{"form":1},"formData":{"fullName":"A B","income":20000}}"#,
    ) {
        EngineRequest::FillForm {
            form,
            fingerprint,
            form_data,
        } => {
            assert_eq!(form, Some(FormKey::Form(1)));
            assert_eq!(fingerprint, None);
            assert_eq!(form_data.get("income"), Some("20000"));
        }
        other => panic!("Expected FillForm, got {:?}", other),
    }

    match fill_request(r#"{"action":"fillForm","form":"loose"}"#) {
        EngineRequest::FillForm { form, form_data, .. } => {
            assert_eq!(form, Some(FormKey::Loose));
            assert!(form_data.is_empty());
        }
        other => panic!("Expected FillForm, got {:?}", other),
    }
}

#[test]
fn bad_requests_are_invalid() {
    for line in [r#"{"action":"submitForm"}"#, "not json", r#"{"formData":{}}"#] {
        match EngineRequest::from_json(line) {
            Err(EngineError::InvalidRequest(_)) => {}
            other => panic!("Expected InvalidRequest for {}, got {:?}", line, other),
        }
    }
}

#[test]
fn responses_and_notifications_serialize_with_type_tag() {
    assert_eq!(
        serde_json::to_value(EngineResponse::Ack).unwrap(),
        serde_json::json!({"type": "ack"})
    );
    assert_eq!(
        serde_json::to_value(EngineResponse::from(EngineError::NoSuitableForm)).unwrap(),
        serde_json::json!({"type": "error", "message": "no suitable form found on this page"})
    );
    assert_eq!(
        serde_json::to_value(Notification::FillingProgress { filled: 1, total: 3 }).unwrap(),
        serde_json::json!({"type": "fillingProgress", "filled": 1, "total": 3})
    );
}

#[test]
fn terminal_notification_follows_status() {
    let result = |status| FillResult {
        success: false,
        status,
        filled_count: 0,
        total_count: 2,
        error: None,
    };

    assert!(matches!(
        terminal_notification(&result(FillStatus::Completed)),
        Notification::FillingComplete { .. }
    ));
    assert!(matches!(
        terminal_notification(&result(FillStatus::Stopped)),
        Notification::FillingStopped { .. }
    ));
    assert_eq!(
        terminal_notification(&FillResult {
            error: Some("boom".into()),
            ..result(FillStatus::Error)
        }),
        Notification::FillingError {
            message: "boom".into()
        }
    );
}

// =========================================================================
// Target selection
// =========================================================================

#[test]
fn choose_target_prefers_best_accepted_form() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);
    let descriptors = score_page(&page, &ScoringConfig::default());

    let target = choose_target(descriptors, None, None).unwrap();
    assert_eq!(target.key, FormKey::Form(0));
    assert!(target.is_target_form);
}

#[test]
fn explicit_key_bypasses_threshold() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);
    let descriptors = score_page(&page, &ScoringConfig::default());

    let target = choose_target(descriptors, Some(FormKey::Form(1)), None).unwrap();
    assert_eq!(target.key, FormKey::Form(1));
    assert!(!target.accepted);
}

#[test]
fn choose_target_errors() {
    let page = fixture_page("multi_forms.html", WELFARE_URL);
    let descriptors = score_page(&page, &ScoringConfig::default());

    assert_eq!(
        choose_target(descriptors.clone(), Some(FormKey::Form(9)), None),
        Err(EngineError::UnknownForm(FormKey::Form(9)))
    );
    assert_eq!(
        choose_target(descriptors.clone(), None, Some("0000")),
        Err(EngineError::FormChanged {
            key: FormKey::Form(0)
        })
    );

    let fingerprint = descriptors[0].fingerprint.clone();
    assert!(choose_target(descriptors, None, Some(&fingerprint)).is_ok());

    let empty = score_page(
        &parse_page(WELFARE_URL, "<form><input name=\"q\"></form>"),
        &ScoringConfig::default(),
    );
    assert_eq!(choose_target(empty, None, None), Err(EngineError::NoSuitableForm));
}

// =========================================================================
// Engine
// =========================================================================

#[tokio::test]
async fn detect_forms_returns_accepted_forms_best_first() {
    let (mut engine, _, _rx) = engine_for(
        fixture_page("multi_forms.html", WELFARE_URL),
        FillExecutor::immediate(),
    );

    match engine.handle(EngineRequest::DetectForms).await {
        EngineResponse::Forms { forms } => {
            let keys: Vec<FormKey> = forms.iter().map(|f| f.key).collect();
            assert_eq!(keys, vec![FormKey::Form(0), FormKey::Loose]);
            assert!(forms[0].is_target_form);
        }
        other => panic!("Expected Forms, got {:?}", other),
    }
}

#[tokio::test]
async fn fill_form_acks_then_completes() {
    let (mut engine, feedback, mut rx) = engine_for(minimal_page(), FillExecutor::immediate());

    let response = engine
        .handle(EngineRequest::FillForm {
            form: None,
            fingerprint: None,
            form_data: minimal_profile(),
        })
        .await;
    assert_eq!(response, EngineResponse::Ack);

    let result = engine.wait_idle().await.unwrap();
    assert!(result.success);
    assert_eq!((result.filled_count, result.total_count), (3, 3));

    assert_eq!(
        drain(&mut rx),
        vec![
            Notification::FillingProgress { filled: 1, total: 3 },
            Notification::FillingProgress { filled: 2, total: 3 },
            Notification::FillingProgress { filled: 3, total: 3 },
            Notification::FillingComplete {
                result: result.clone()
            },
        ]
    );

    let page = engine.page();
    let page = page.lock().await;
    assert_eq!(page.surface.value_of(ControlId(2)), Some("20000"));
    assert_eq!(feedback.toasts().last(), Some(&Toast::completed(3)));
}

#[tokio::test]
async fn fill_without_suitable_form_reports_error() {
    let page = parse_page(WELFARE_URL, "<form><input name=\"q\" placeholder=\"Search\"></form>");
    let (mut engine, feedback, mut rx) = engine_for(page, FillExecutor::immediate());

    engine.fill_form(FillRequest::default()).unwrap();
    let result = engine.wait_idle().await.unwrap();

    assert_eq!(result.status, FillStatus::Error);
    assert!(!result.success);
    assert_eq!(
        drain(&mut rx),
        vec![Notification::FillingError {
            message: "no suitable form found on this page".into()
        }]
    );
    assert_eq!(
        feedback.toasts(),
        vec![Toast::error("no suitable form found on this page")]
    );
}

#[tokio::test]
async fn changed_form_is_not_filled() {
    let (mut engine, _, mut rx) = engine_for(minimal_page(), FillExecutor::immediate());

    engine
        .fill_form(FillRequest {
            form: Some(FormKey::Form(0)),
            fingerprint: Some("stale".into()),
            form_data: minimal_profile(),
        })
        .unwrap();
    let result = engine.wait_idle().await.unwrap();

    assert_eq!(result.status, FillStatus::Error);
    assert_eq!(
        drain(&mut rx),
        vec![Notification::FillingError {
            message: "form #0 changed since it was detected".into()
        }]
    );
    let page = engine.page();
    assert!(page.lock().await.surface.journal().is_empty());
}

#[tokio::test]
async fn explicit_form_fills_below_threshold() {
    let (mut engine, _, _rx) = engine_for(
        fixture_page("multi_forms.html", WELFARE_URL),
        FillExecutor::immediate(),
    );

    engine
        .fill_form(FillRequest {
            form: Some(FormKey::Form(1)),
            fingerprint: None,
            form_data: FormData::new().with("email", "ravi@example.in"),
        })
        .unwrap();
    let result = engine.wait_idle().await.unwrap();

    assert!(result.success);
    assert_eq!((result.filled_count, result.total_count), (1, 1));
}

#[tokio::test]
async fn second_fill_while_running_is_refused() {
    let executor = FillExecutor::new(&FillConfig {
        delay_ms: 50,
        trace_file: None,
    });
    let (mut engine, _, _rx) = engine_for(minimal_page(), executor);

    engine
        .fill_form(FillRequest {
            form_data: minimal_profile(),
            ..FillRequest::default()
        })
        .unwrap();
    assert!(engine.is_filling());

    let response = engine
        .handle(EngineRequest::FillForm {
            form: None,
            fingerprint: None,
            form_data: minimal_profile(),
        })
        .await;
    assert_eq!(
        response,
        EngineResponse::Error {
            message: "a fill session is already running".into()
        }
    );

    engine.stop_filling();
    engine.wait_idle().await;
    assert!(!engine.is_filling());
}

#[tokio::test]
async fn detect_during_fill_does_not_hold_up_stop() {
    let executor = FillExecutor::new(&FillConfig {
        delay_ms: 50,
        trace_file: None,
    });
    let (mut engine, _, mut rx) = engine_for(minimal_page(), executor);

    engine
        .fill_form(FillRequest {
            form_data: minimal_profile(),
            ..FillRequest::default()
        })
        .unwrap();

    // Let the first field land; the session is now pausing before the second.
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        engine.handle(EngineRequest::DetectForms).await,
        EngineResponse::Error {
            message: "a fill session is already running".into()
        }
    );
    assert_eq!(engine.handle(EngineRequest::StopFilling).await, EngineResponse::Ack);

    let result = engine.wait_idle().await.unwrap();
    assert_eq!(result.status, FillStatus::Stopped);
    assert_eq!((result.filled_count, result.total_count), (1, 3));
    assert_eq!(
        drain(&mut rx),
        vec![
            Notification::FillingProgress { filled: 1, total: 3 },
            Notification::FillingStopped { result },
        ]
    );

    // Idle again: detection works.
    assert_eq!(engine.detect_forms().await.unwrap().len(), 1);
}

#[tokio::test]
async fn stop_before_first_field_reports_stopped() {
    let executor = FillExecutor::new(&FillConfig {
        delay_ms: 50,
        trace_file: None,
    });
    let (mut engine, feedback, mut rx) = engine_for(minimal_page(), executor);

    engine
        .fill_form(FillRequest {
            form: None,
            fingerprint: None,
            form_data: minimal_profile(),
        })
        .unwrap();
    assert_eq!(engine.handle(EngineRequest::StopFilling).await, EngineResponse::Ack);

    let result = engine.wait_idle().await.unwrap();
    assert_eq!(result.status, FillStatus::Stopped);
    assert_eq!(result.filled_count, 0);
    assert_eq!(
        drain(&mut rx),
        vec![Notification::FillingStopped { result }]
    );
    assert_eq!(feedback.toasts().last(), Some(&Toast::stopped()));
}

#[tokio::test]
async fn stop_is_idempotent() {
    let executor = FillExecutor::new(&FillConfig {
        delay_ms: 50,
        trace_file: None,
    });

    let (mut once, _, _rx1) = engine_for(minimal_page(), executor.clone());
    once.fill_form(FillRequest {
        form_data: minimal_profile(),
        ..FillRequest::default()
    })
    .unwrap();
    once.stop_filling();
    let stopped_once = once.wait_idle().await.unwrap();

    let (mut twice, _, _rx2) = engine_for(minimal_page(), executor);
    twice
        .fill_form(FillRequest {
            form_data: minimal_profile(),
            ..FillRequest::default()
        })
        .unwrap();
    twice.stop_filling();
    twice.stop_filling();
    let stopped_twice = twice.wait_idle().await.unwrap();

    assert_eq!(stopped_once, stopped_twice);

    // Nothing running: still just an ack.
    assert_eq!(twice.handle(EngineRequest::StopFilling).await, EngineResponse::Ack);
    assert!(twice.wait_idle().await.is_none());
}

#[tokio::test]
async fn fill_runs_without_a_listener() {
    let mut engine = Engine::new(
        minimal_page(),
        Box::new(RecordingFeedback::new()),
        ScoringConfig::default(),
        FillExecutor::immediate(),
        Notifier::detached(),
    );

    engine
        .fill_form(FillRequest {
            form_data: minimal_profile(),
            ..FillRequest::default()
        })
        .unwrap();
    let result = engine.wait_idle().await.unwrap();
    assert_eq!(result.filled_count, 3);
}

#[test]
fn notifier_tolerates_missing_receiver() {
    let notification = Notification::FillingProgress { filled: 0, total: 0 };

    assert!(!Notifier::detached().notify(notification.clone()));

    let (notifier, rx) = Notifier::channel();
    assert!(notifier.notify(notification.clone()));
    drop(rx);
    assert!(!notifier.notify(notification));
}
