//! Per-file delta types

use crate::model::entry::ChangelogEntry;

/// Result of diffing two entry lists
///
/// `added` and `modified` follow new-list order, `removed` follows old-list
/// order. No id appears in more than one of the three lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDiff {
    pub added: Vec<ChangelogEntry>,
    /// New versions of entries whose content changed
    pub modified: Vec<ChangelogEntry>,
    pub removed: Vec<ChangelogEntry>,
}

impl EntryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// The delta of one changelog file between the PR base and the merge commit
///
/// Built once per file per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogFileDelta {
    pub path: String,
    pub added: Vec<ChangelogEntry>,
    pub modified: Vec<ChangelogEntry>,
    pub removed: Vec<ChangelogEntry>,
}

impl ChangelogFileDelta {
    pub fn new(path: impl Into<String>, diff: EntryDiff) -> Self {
        Self {
            path: path.into(),
            added: diff.added,
            modified: diff.modified,
            removed: diff.removed,
        }
    }

    /// Build a delta only when the diff found something
    pub fn from_changes(path: impl Into<String>, diff: EntryDiff) -> Option<Self> {
        (!diff.is_empty()).then(|| Self::new(path, diff))
    }

    /// Entries worth announcing: additions first, then modifications
    pub fn reported_entries(&self) -> impl Iterator<Item = &ChangelogEntry> {
        self.added.iter().chain(self.modified.iter())
    }

    /// Last path component, used as the section heading
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}
