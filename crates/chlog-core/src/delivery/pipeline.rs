//! Chunked, ordered delivery of message lines

use crate::delivery::chunk::chunk_lines;
use crate::delivery::retry::{DeliveryState, RetryPolicy};
use crate::delivery::transport::{Sleeper, ThreadSleeper, WebhookPayload, WebhookTransport};
use crate::errors::Result;
use crate::limits::char_len;
use crate::{log_op_end, log_op_error, log_op_start};
use chlog_core_types::schema::EVENT_RETRY;
use std::time::{Duration, Instant};
use tracing::warn;

/// Default pause between consecutive chunks
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_secs(2);

/// Outcome of one delivered chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    pub index: usize,
    pub chars: usize,
    /// Total posts, including retried ones
    pub attempts: u32,
    pub rate_limited: u32,
    pub transient_failures: u32,
}

/// Outcome of a whole delivery
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub chunks: Vec<ChunkReport>,
}

impl DeliveryReport {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_attempts(&self) -> u32 {
        self.chunks.iter().map(|c| c.attempts).sum()
    }
}

/// Sends message lines to a webhook
pub struct Deliverer<T, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
    message_delay: Duration,
}

impl<T: WebhookTransport> Deliverer<T, ThreadSleeper> {
    pub fn new(transport: T) -> Self {
        Self::with_sleeper(transport, ThreadSleeper)
    }
}

impl<T: WebhookTransport, S: Sleeper> Deliverer<T, S> {
    pub fn with_sleeper(transport: T, sleeper: S) -> Self {
        Self {
            transport,
            sleeper,
            policy: RetryPolicy::default(),
            message_delay: DEFAULT_MESSAGE_DELAY,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_message_delay(mut self, delay: Duration) -> Self {
        self.message_delay = delay;
        self
    }

    /// Chunk `lines` and deliver every chunk in order
    ///
    /// The inter-message delay is observed between chunks, not after the
    /// last one. Chunks delivered before a failure stay delivered.
    ///
    /// # Errors
    ///
    /// Returns the first fatal delivery error; remaining chunks are not sent.
    pub fn deliver<L: AsRef<str>>(&self, lines: &[L]) -> Result<DeliveryReport> {
        let start = Instant::now();
        let chunks = chunk_lines(lines);
        log_op_start!("deliver", lines = lines.len(), chunks = chunks.len());

        let mut report = DeliveryReport::default();
        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 {
                self.sleeper.sleep(self.message_delay);
            }
            match self.send_chunk(index, chunk) {
                Ok(chunk_report) => report.chunks.push(chunk_report),
                Err(err) => {
                    log_op_error!(
                        "deliver",
                        &err,
                        duration_ms = start.elapsed().as_millis() as u64,
                        chunk_index = index,
                        delivered = report.chunk_count()
                    );
                    return Err(err);
                }
            }
        }

        log_op_end!(
            "deliver",
            duration_ms = start.elapsed().as_millis() as u64,
            chunks = report.chunk_count(),
            attempts = report.total_attempts()
        );
        Ok(report)
    }

    /// Drive one chunk to `Done` or `Fatal`
    ///
    /// # Errors
    ///
    /// Returns the error carried by the `Fatal` state.
    pub fn send_chunk(&self, index: usize, content: &str) -> Result<ChunkReport> {
        let payload = WebhookPayload::new(content);
        let mut report = ChunkReport {
            index,
            chars: char_len(content),
            attempts: 0,
            rate_limited: 0,
            transient_failures: 0,
        };
        let mut state = DeliveryState::Sending;

        loop {
            state = match state {
                DeliveryState::Sending => {
                    report.attempts += 1;
                    match self.transport.post(&payload) {
                        Ok(response) => DeliveryState::on_response(
                            &response,
                            report.transient_failures,
                            &self.policy,
                        ),
                        Err(err) => DeliveryState::Fatal(err),
                    }
                }
                DeliveryState::BackoffRateLimited(delay) => {
                    report.rate_limited += 1;
                    warn!(
                        op = "send_chunk",
                        event = EVENT_RETRY,
                        chunk_index = index,
                        status = 429_u64,
                        delay_ms = delay.as_millis() as u64,
                        "webhook rate limited, waiting"
                    );
                    self.sleeper.sleep(delay);
                    DeliveryState::Sending
                }
                DeliveryState::BackoffTransient {
                    status,
                    failures,
                    delay,
                } => {
                    report.transient_failures = failures;
                    warn!(
                        op = "send_chunk",
                        event = EVENT_RETRY,
                        chunk_index = index,
                        status = status as u64,
                        attempt = failures,
                        delay_ms = delay.as_millis() as u64,
                        "webhook server error, backing off"
                    );
                    self.sleeper.sleep(delay);
                    DeliveryState::Sending
                }
                DeliveryState::Done => return Ok(report),
                DeliveryState::Fatal(err) => return Err(err),
            };
        }
    }
}
