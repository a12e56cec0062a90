//! Delta computation.
//!
//! The engine indexes both lists by id, tagging each id with its
//! multiplicity, and then classifies every id with [`classify_id`]. Only
//! [`IdClass::Comparable`] ids are compared for content.

use crate::model::{ChangelogEntry, EntryDiff, EntryId};
use std::collections::HashMap;
use tracing::debug;

/// How often an id occurs in one entry list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMultiplicity {
    /// Exactly one occurrence, at this position
    Unique(usize),
    /// Two or more occurrences
    Duplicated(usize),
}

impl IdMultiplicity {
    pub fn count(&self) -> usize {
        match self {
            IdMultiplicity::Unique(_) => 1,
            IdMultiplicity::Duplicated(n) => *n,
        }
    }
}

/// Index the ids of one list, skipping entries without an id
pub fn index_ids(entries: &[ChangelogEntry]) -> HashMap<&EntryId, IdMultiplicity> {
    let mut index: HashMap<&EntryId, IdMultiplicity> = HashMap::new();
    for (pos, entry) in entries.iter().enumerate() {
        let Some(id) = entry.id() else {
            continue;
        };
        index
            .entry(id)
            .and_modify(|m| {
                *m = IdMultiplicity::Duplicated(m.count() + 1);
            })
            .or_insert(IdMultiplicity::Unique(pos));
    }
    index
}

/// Classification of one id across the two revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdClass {
    /// Present only in the old list: every occurrence is removed
    OnlyOld,
    /// Present only in the new list: every occurrence is added
    OnlyNew,
    /// Unique in both lists: the two entries are compared
    Comparable { old_pos: usize, new_pos: usize },
    /// Present in both, duplicated in at least one: no modification signal
    Ambiguous { old_count: usize, new_count: usize },
}

/// Classify `id` given both indexes; `None` when neither list has it
pub fn classify_id(
    id: &EntryId,
    old_index: &HashMap<&EntryId, IdMultiplicity>,
    new_index: &HashMap<&EntryId, IdMultiplicity>,
) -> Option<IdClass> {
    match (old_index.get(id), new_index.get(id)) {
        (None, None) => None,
        (Some(_), None) => Some(IdClass::OnlyOld),
        (None, Some(_)) => Some(IdClass::OnlyNew),
        (Some(IdMultiplicity::Unique(old_pos)), Some(IdMultiplicity::Unique(new_pos))) => {
            Some(IdClass::Comparable {
                old_pos: *old_pos,
                new_pos: *new_pos,
            })
        }
        (Some(old), Some(new)) => Some(IdClass::Ambiguous {
            old_count: old.count(),
            new_count: new.count(),
        }),
    }
}

/// Compute `(added, modified, removed)` between two revisions of a list.
pub fn diff_entries(old: &[ChangelogEntry], new: &[ChangelogEntry]) -> EntryDiff {
    let old_index = index_ids(old);
    let new_index = index_ids(new);
    let mut diff = EntryDiff::default();
    let mut ambiguous = 0usize;

    for entry in new {
        let Some(id) = entry.id() else {
            continue;
        };
        match classify_id(id, &old_index, &new_index) {
            Some(IdClass::OnlyNew) => diff.added.push(entry.clone()),
            Some(IdClass::Comparable { old_pos, .. }) => {
                if old[old_pos] != *entry {
                    diff.modified.push(entry.clone());
                }
            }
            Some(IdClass::Ambiguous { .. }) => ambiguous += 1,
            Some(IdClass::OnlyOld) | None => {}
        }
    }

    for entry in old {
        let Some(id) = entry.id() else {
            continue;
        };
        if let Some(IdClass::OnlyOld) = classify_id(id, &old_index, &new_index) {
            diff.removed.push(entry.clone());
        }
    }

    debug!(
        added = diff.added.len(),
        modified = diff.modified.len(),
        removed = diff.removed.len(),
        ambiguous_new_entries = ambiguous,
        "entry diff computed"
    );
    diff
}
