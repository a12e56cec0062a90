//! Scripted fakes for delivery tests

use crate::delivery::transport::{Sleeper, WebhookPayload, WebhookResponse, WebhookTransport};
use crate::errors::{RelayError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Transport that answers from a script and records every payload
///
/// Once the script is exhausted the fallback status is returned.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<WebhookResponse>>,
    fallback: u16,
    failure: Option<String>,
    posted: Mutex<Vec<WebhookPayload>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<WebhookResponse>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: 204,
            failure: None,
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn always(status: u16) -> Self {
        Self::new(Vec::new()).with_fallback(status)
    }

    /// Every post fails before reaching the server
    pub fn failing(reason: impl Into<String>) -> Self {
        let mut transport = Self::new(Vec::new());
        transport.failure = Some(reason.into());
        transport
    }

    pub fn with_fallback(mut self, status: u16) -> Self {
        self.fallback = status;
        self
    }

    pub fn posted(&self) -> Vec<WebhookPayload> {
        self.posted.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Contents of every post, in order
    pub fn contents(&self) -> Vec<String> {
        self.posted().into_iter().map(|p| p.content).collect()
    }
}

impl WebhookTransport for ScriptedTransport {
    fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse> {
        if let Ok(mut posted) = self.posted.lock() {
            posted.push(payload.clone());
        }
        if let Some(reason) = &self.failure {
            return Err(RelayError::WebhookTransport {
                reason: reason.clone(),
            }
            .into());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        Ok(next.unwrap_or_else(|| WebhookResponse::new(self.fallback)))
    }
}

/// Sleeper that records requested durations without sleeping
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.slept().into_iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut slept) = self.slept.lock() {
            slept.push(duration);
        }
    }
}
