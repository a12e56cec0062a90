//! Core types shared across chlog facilities
//!
//! This crate provides foundational types used by the error, logging and
//! delivery layers:
//!
//! - **Correlation**: `RunId`, one per relay run
//! - **Sensitive data**: `Sensitive<T>` marker for tokens and webhook URLs
//! - **Schema constants**: canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
