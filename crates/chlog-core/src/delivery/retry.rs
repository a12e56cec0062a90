//! Per-chunk delivery state machine
//!
//! [`DeliveryState::on_response`] is a pure function of the webhook answer
//! and the transient-failure count, so every retry decision can be tested
//! without a transport or a clock.

use crate::errors::{ExError, RelayError};
use crate::delivery::transport::WebhookResponse;
use std::time::Duration;

/// Retry budget and delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// The transient failure that reaches this count is fatal
    pub max_transient_failures: u32,
    /// Upper bound of the transient backoff
    pub max_backoff: Duration,
    /// Rate-limit delay when the webhook names none
    pub default_rate_limit_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_transient_failures: 6,
            max_backoff: Duration::from_secs(30),
            default_rate_limit_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// `min(2^failures, max_backoff)`
    pub fn transient_backoff(&self, failures: u32) -> Duration {
        let secs = 1u64.checked_shl(failures).unwrap_or(u64::MAX);
        Duration::from_secs(secs).min(self.max_backoff)
    }
}

pub fn is_success(status: u16) -> bool {
    matches!(status, 200 | 204)
}

pub fn is_transient(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

/// Where one chunk's delivery stands
#[derive(Debug, Clone)]
pub enum DeliveryState {
    /// About to post the chunk
    Sending,
    /// Got 429; wait, then post again. Does not touch the transient count.
    BackoffRateLimited(Duration),
    /// Got a transient 5xx; `failures` includes this one
    BackoffTransient {
        status: u16,
        failures: u32,
        delay: Duration,
    },
    Done,
    Fatal(ExError),
}

impl DeliveryState {
    /// Next state after the webhook answered
    ///
    /// `transient_failures` counts the transient failures already seen for
    /// this chunk, not including `response`.
    pub fn on_response(
        response: &WebhookResponse,
        transient_failures: u32,
        policy: &RetryPolicy,
    ) -> DeliveryState {
        let status = response.status;
        if is_success(status) {
            return DeliveryState::Done;
        }
        if status == 429 {
            return DeliveryState::BackoffRateLimited(rate_limit_delay(response, policy));
        }
        if is_transient(status) {
            let failures = transient_failures + 1;
            if failures < policy.max_transient_failures {
                return DeliveryState::BackoffTransient {
                    status,
                    failures,
                    delay: policy.transient_backoff(failures),
                };
            }
            return DeliveryState::Fatal(
                RelayError::WebhookExhausted {
                    status,
                    attempts: failures,
                }
                .into(),
            );
        }
        DeliveryState::Fatal(
            RelayError::WebhookRejected {
                status,
                body: excerpt(&response.body),
            }
            .into(),
        )
    }
}

/// Delay requested by a 429 answer
///
/// Prefers `retry_after` from the JSON body, then the `Retry-After` header,
/// then the policy default. Negative or non-finite values become zero.
pub fn rate_limit_delay(response: &WebhookResponse, policy: &RetryPolicy) -> Duration {
    let requested = body_retry_after(&response.body).or_else(|| {
        response
            .retry_after_header
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
    });
    match requested {
        Some(secs) => Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO),
        None => policy.default_rate_limit_delay,
    }
}

fn body_retry_after(body: &str) -> Option<f64> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("retry_after")? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn excerpt(body: &str) -> String {
    const MAX: usize = 300;
    let body = body.trim();
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(MAX).collect();
        cut.push_str("...");
        cut
    }
}
