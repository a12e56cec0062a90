//! chlog Core - changelog delta and delivery kernel
//!
//! This crate holds everything between "two revisions of a changelog file"
//! and "a sequence of webhook deliveries":
//! - Changelog entry model and per-file deltas
//! - YAML document parsing and entry extraction
//! - The delta engine with its ambiguity-skip rule for duplicate ids
//! - Rendering of deltas into Discord-flavoured message lines
//! - Chunking and the rate-limit aware delivery state machine
//!
//! Network access lives behind the [`host::CodeHost`] and
//! [`delivery::WebhookTransport`] traits; `chlog-net` provides the HTTP
//! implementations.

pub mod delivery;
pub mod diff;
pub mod errors;
pub mod filter;
pub mod host;
pub mod limits;
pub mod logging_facility;
pub mod model;
pub mod parse;
pub mod render;

// Re-exported so the logging macros resolve schema constants through `$crate`.
pub use chlog_core_types as core_types;

pub use delivery::{Deliverer, DeliveryReport, Sleeper, WebhookTransport};
pub use diff::diff_entries;
pub use errors::{ExError, ExErrorKind, RelayError, Result};
pub use filter::ChangelogFilter;
pub use host::{CodeHost, PullRequestInfo};
pub use model::{ChangeItem, ChangeType, ChangelogEntry, ChangelogFileDelta, EntryDiff, EntryId};
pub use render::{build_message_lines, Labels, Locale, PullRequestRef};
