//! Canonical schema constants for structured logging
//!
//! `tracing` needs literal field names at the call site, so the `FIELD_*`
//! keys are for readers of captured events. They must match the names the
//! logging macros and the delivery retry loop emit.

// Operation boundary fields
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Retry fields
pub const FIELD_STATUS: &str = "status";
pub const FIELD_ATTEMPT: &str = "attempt";
pub const FIELD_DELAY_MS: &str = "delay_ms";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_RETRY: &str = "retry";
pub const EVENT_SKIP: &str = "skip";
