#![allow(clippy::unwrap_used, clippy::expect_used)]

use chlog_core::delivery::testing::{RecordingSleeper, ScriptedTransport};
use chlog_core::delivery::{chunk_lines, Deliverer, WebhookResponse};
use chlog_core::errors::ExErrorKind;
use chlog_core::limits::{char_len, DISCORD_MESSAGE_LIMIT, ELLIPSIS};
use proptest::prelude::*;
use std::time::Duration;

fn deliverer<'a>(
    transport: &'a ScriptedTransport,
    sleeper: &'a RecordingSleeper,
) -> Deliverer<&'a ScriptedTransport, &'a RecordingSleeper> {
    Deliverer::with_sleeper(transport, sleeper).with_message_delay(Duration::from_secs(2))
}

#[test]
fn test_rate_limit_waits_exactly_as_told() {
    let transport = ScriptedTransport::new(vec![
        WebhookResponse::new(429).with_body(r#"{"retry_after": 3}"#),
        WebhookResponse::new(204),
    ]);
    let sleeper = RecordingSleeper::default();

    let report = deliverer(&transport, &sleeper).deliver(&["hello\n"]).unwrap();

    assert_eq!(sleeper.slept(), vec![Duration::from_secs(3)]);
    assert_eq!(transport.posted().len(), 2);
    assert_eq!(report.chunks[0].attempts, 2);
    assert_eq!(report.chunks[0].rate_limited, 1);
}

#[test]
fn test_rate_limit_has_no_attempt_cap() {
    let mut script: Vec<WebhookResponse> = (0..20)
        .map(|_| WebhookResponse::new(429).with_retry_after_header("0.5"))
        .collect();
    script.push(WebhookResponse::new(204));
    let transport = ScriptedTransport::new(script);
    let sleeper = RecordingSleeper::default();

    deliverer(&transport, &sleeper).deliver(&["x"]).unwrap();

    assert_eq!(transport.posted().len(), 21);
    assert_eq!(sleeper.total(), Duration::from_secs(10));
}

#[test]
fn test_five_server_errors_then_sixth_is_fatal() {
    let transport = ScriptedTransport::always(503);
    let sleeper = RecordingSleeper::default();

    let err = deliverer(&transport, &sleeper).deliver(&["x"]).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::DeliveryExhausted);
    assert_eq!(err.status(), Some(503));
    assert_eq!(transport.posted().len(), 6, "no seventh attempt");
    assert_eq!(
        sleeper.slept(),
        [2, 4, 8, 16, 30].map(Duration::from_secs).to_vec()
    );
}

#[test]
fn test_rate_limits_do_not_consume_transient_budget() {
    let mut script = Vec::new();
    for _ in 0..5 {
        script.push(WebhookResponse::new(503));
        script.push(WebhookResponse::new(429).with_body(r#"{"retry_after": 0}"#));
    }
    script.push(WebhookResponse::new(204));
    let transport = ScriptedTransport::new(script);
    let sleeper = RecordingSleeper::default();

    let report = deliverer(&transport, &sleeper).deliver(&["x"]).unwrap();

    assert_eq!(report.chunks[0].transient_failures, 5);
    assert_eq!(report.chunks[0].rate_limited, 5);
    assert_eq!(transport.posted().len(), 11);
}

#[test]
fn test_recovered_server_error_continues_with_next_chunk() {
    let transport = ScriptedTransport::new(vec![
        WebhookResponse::new(502),
        WebhookResponse::new(204),
        WebhookResponse::new(200),
    ]);
    let sleeper = RecordingSleeper::default();
    let line = format!("{}\n", "m".repeat(1200));

    let report = deliverer(&transport, &sleeper)
        .deliver(&[line.clone(), line])
        .unwrap();

    assert_eq!(report.chunk_count(), 2);
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(2), Duration::from_secs(2)],
        "one backoff for the 502 and one inter-message delay"
    );
}

#[test]
fn test_over_long_line_goes_out_as_one_truncated_chunk() {
    let transport = ScriptedTransport::always(204);
    let sleeper = RecordingSleeper::default();

    deliverer(&transport, &sleeper)
        .deliver(&["w".repeat(2500)])
        .unwrap();

    let contents = transport.contents();
    assert_eq!(contents.len(), 1);
    assert!(contents[0].ends_with(ELLIPSIS));
    assert_eq!(
        char_len(&contents[0]),
        DISCORD_MESSAGE_LIMIT - 100 + char_len(ELLIPSIS)
    );
}

#[test]
fn test_payload_suppresses_mentions_and_embeds() {
    let transport = ScriptedTransport::always(204);
    let sleeper = RecordingSleeper::default();

    deliverer(&transport, &sleeper)
        .deliver(&["@everyone look https://example.com\n"])
        .unwrap();

    let payload = &transport.posted()[0];
    assert!(payload.allowed_mentions.parse.is_empty());
    assert_eq!(payload.flags, 4);
}

fn arb_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (0usize..900).prop_map(|n| format!("{}\n", "ж".repeat(n))),
        0..12,
    )
}

proptest! {
    #[test]
    fn prop_chunks_reconstruct_input(lines in arb_lines()) {
        let chunks = chunk_lines(&lines);
        prop_assert_eq!(chunks.concat(), lines.concat());
    }

    #[test]
    fn prop_chunks_respect_limit(lines in arb_lines()) {
        for chunk in chunk_lines(&lines) {
            prop_assert!(char_len(&chunk) <= DISCORD_MESSAGE_LIMIT);
            prop_assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn prop_no_two_neighbouring_chunks_could_merge(lines in arb_lines()) {
        let chunks = chunk_lines(&lines);
        for pair in chunks.windows(2) {
            let first_line_of_next = pair[1].split_inclusive('\n').next().unwrap_or("");
            prop_assert!(
                char_len(&pair[0]) + char_len(first_line_of_next) > DISCORD_MESSAGE_LIMIT
            );
        }
    }
}
