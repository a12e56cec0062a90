//! Changelog data model
//!
//! [`ChangelogEntry`] wraps one mapping from a changelog file's `Entries`
//! list. [`EntryDiff`] and [`ChangelogFileDelta`] carry the result of
//! comparing two revisions of one file.

pub mod delta;
pub mod entry;

pub use delta::{ChangelogFileDelta, EntryDiff};
pub use entry::{ChangeItem, ChangeType, ChangelogEntry, EntryId};
