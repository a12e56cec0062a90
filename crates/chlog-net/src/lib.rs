//! chlog Net - HTTP implementations of the relay's network seams
//!
//! - [`GitHubClient`] implements [`chlog_core::host::CodeHost`] over the
//!   GitHub REST API
//! - [`DiscordWebhook`] implements [`chlog_core::delivery::WebhookTransport`]
//!
//! Both use blocking `reqwest` clients with a 30 second timeout; the relay is
//! strictly sequential and never needs an async runtime.

pub mod discord;
pub mod github;

pub use discord::DiscordWebhook;
pub use github::GitHubClient;

use std::time::Duration;

/// Per-request timeout for every outbound call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn user_agent() -> String {
    format!("chlog-relay/{}", env!("CARGO_PKG_VERSION"))
}
