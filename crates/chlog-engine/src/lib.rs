//! chlog Engine - relay orchestration
//!
//! Wires the code host, the delta engine, the renderer and the delivery
//! pipeline into a single run for one merged pull request.

pub mod commands;

pub use commands::relay::{collect_deltas, run_relay, RelayConfig, RelayOutcome, SkipReason};
