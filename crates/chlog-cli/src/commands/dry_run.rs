//! Stand-in webhook that prints chunks instead of posting them

use chlog_core::delivery::{WebhookPayload, WebhookResponse, WebhookTransport};
use chlog_core::errors::{ExError, ExErrorKind, Result};
use std::cell::Cell;
use std::io::Write;

/// Writes every chunk to stdout and answers 204
#[derive(Debug, Default)]
pub struct StdoutTransport {
    printed: Cell<usize>,
}

impl WebhookTransport for StdoutTransport {
    fn post(&self, payload: &WebhookPayload) -> Result<WebhookResponse> {
        let index = self.printed.get() + 1;
        let mut out = std::io::stdout().lock();
        write!(
            out,
            "----- message {} ({} chars) -----\n{}",
            index,
            payload.content.chars().count(),
            payload.content
        )
        .and_then(|_| out.flush())
        .map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("dry_run")
                .with_message(e.to_string())
        })?;
        self.printed.set(index);
        Ok(WebhookResponse::new(204))
    }
}
