//! Entry-level delta engine.
//!
//! Compares the `Entries` list of a changelog file before and after a merge
//! and classifies entries as added, modified or removed by their `id`.
//!
//! ## Entry point
//!
//! ```
//! use chlog_core::diff::diff_entries;
//!
//! let diff = diff_entries(&[], &[]);
//! assert!(diff.is_empty());
//! ```
//!
//! ## Guarantees
//!
//! - **Ordering**: `added`/`modified` follow the new list, `removed` the old list.
//! - **Ambiguity skip**: an id is checked for modification only when it occurs
//!   exactly once in both lists; duplicated ids never produce `modified`.
//! - **Id-less entries** take no part in the delta.

pub mod engine;

pub use engine::{classify_id, diff_entries, index_ids, IdClass, IdMultiplicity};
