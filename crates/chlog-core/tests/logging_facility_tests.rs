#![allow(clippy::unwrap_used, clippy::expect_used)]

use chlog_core::delivery::testing::{RecordingSleeper, ScriptedTransport};
use chlog_core::delivery::{Deliverer, WebhookResponse};
use chlog_core::errors::{ExError, ExErrorKind, RelayError};
use chlog_core::logging_facility::test_capture::init_test_capture;
use chlog_core::{log_op_end, log_op_error, log_op_start};
use chlog_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_RETRY, EVENT_START, FIELD_ATTEMPT, FIELD_DELAY_MS,
    FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_STATUS,
};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, pr_number = 42_u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("pr_number"), Some("42"));
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42_u64);

    capture.assert_event_exists(op_name, EVENT_END);
    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err: ExError = RelayError::WebhookRejected {
        status: 400,
        body: String::new(),
    }
    .into();
    log_op_error!(op_name, &err, duration_ms = 10_u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::ERROR);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_DELIVERY_REJECTED"));
    assert_eq!(
        events[0].field(FIELD_ERR_KIND),
        Some(format!("{:?}", ExErrorKind::DeliveryRejected).as_str())
    );
}

#[test]
fn test_retry_decisions_log_at_warn() {
    let capture = init_test_capture();
    let transport = ScriptedTransport::new(vec![
        WebhookResponse::new(429).with_body(r#"{"retry_after": 0}"#),
        WebhookResponse::new(504),
        WebhookResponse::new(204),
    ]);
    let sleeper = RecordingSleeper::default();

    Deliverer::with_sleeper(&transport, &sleeper)
        .send_chunk(0, "unique-retry-logging-chunk")
        .unwrap();

    let retries = capture.count_events(|e| {
        e.level == Level::WARN
            && e.op.as_deref() == Some("send_chunk")
            && e.event.as_deref() == Some(EVENT_RETRY)
    });
    assert!(retries >= 2, "expected two warn events, got {}", retries);

    let backoff = capture
        .events()
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_RETRY) && e.field(FIELD_STATUS) == Some("504"))
        .expect("transient retry event");
    assert_eq!(backoff.field(FIELD_ATTEMPT), Some("1"));
    assert_eq!(backoff.field(FIELD_DELAY_MS), Some("2000"));
}
