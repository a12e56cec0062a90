//! Transport and sleeping seams

use crate::errors::Result;
use serde::Serialize;
use std::time::Duration;

/// Discord flag that suppresses link embeds
pub const SUPPRESS_EMBEDS: u32 = 1 << 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
}

/// JSON body of one webhook execution
///
/// Mentions are never resolved and embeds are suppressed, so a changelog
/// line can neither ping anyone nor unfurl a link preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    pub allowed_mentions: AllowedMentions,
    pub flags: u32,
}

impl WebhookPayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            allowed_mentions: AllowedMentions { parse: Vec::new() },
            flags: SUPPRESS_EMBEDS,
        }
    }
}

/// What the webhook answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
    /// Raw `Retry-After` header, if sent
    pub retry_after_header: Option<String>,
}

impl WebhookResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            retry_after_header: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_retry_after_header(mut self, value: impl Into<String>) -> Self {
        self.retry_after_header = Some(value.into());
        self
    }
}

/// One HTTP POST to the webhook
///
/// Implementations return `Ok` for every HTTP response, whatever its
/// status. `Err` is reserved for requests that never got a response.
pub trait WebhookTransport {
    /// # Errors
    ///
    /// Returns an [`ExErrorKind::Transport`](crate::errors::ExErrorKind)
    /// error when no HTTP response was received.
    fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse>;
}

impl<T: WebhookTransport + ?Sized> WebhookTransport for &T {
    fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse> {
        (**self).post(payload)
    }
}

/// Blocking pause between attempts and between chunks
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Sleeps the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
