//! Message line construction

use crate::limits::truncate_to_limit;
use crate::model::{ChangeType, ChangelogEntry, ChangelogFileDelta};
use crate::render::labels::Labels;
use indexmap::IndexMap;

/// The merged pull request a message announces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub title: String,
    pub url: String,
}

/// Count of change items per canonical type
///
/// Items with an unrecognised type land in `other`; items with no type at
/// all are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeTally {
    pub add: usize,
    pub fix: usize,
    pub remove: usize,
    pub tweak: usize,
    pub other: usize,
}

impl ChangeTally {
    pub fn record(&mut self, kind: &ChangeType) {
        match kind {
            ChangeType::Add => self.add += 1,
            ChangeType::Fix => self.fix += 1,
            ChangeType::Remove => self.remove += 1,
            ChangeType::Tweak => self.tweak += 1,
            unknown if unknown.is_missing() => {}
            ChangeType::Unknown(_) => self.other += 1,
        }
    }

    pub fn count(&self, kind: &ChangeType) -> usize {
        match kind {
            ChangeType::Add => self.add,
            ChangeType::Fix => self.fix,
            ChangeType::Remove => self.remove,
            ChangeType::Tweak => self.tweak,
            ChangeType::Unknown(_) => self.other,
        }
    }
}

pub fn count_change_types<'a, I>(entries: I) -> ChangeTally
where
    I: IntoIterator<Item = &'a ChangelogEntry>,
{
    let mut tally = ChangeTally::default();
    for entry in entries {
        for item in entry.changes() {
            tally.record(&item.kind);
        }
    }
    tally
}

/// `🆕 2 • 🐛 1`, canonical types only, zero counts omitted
pub fn render_change_type_summary(tally: &ChangeTally) -> String {
    ChangeType::CANONICAL
        .iter()
        .filter_map(|kind| {
            let count = tally.count(kind);
            (count > 0).then(|| format!("{} {}", kind.icon(), count))
        })
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Entries grouped by author in first-appearance order
fn group_by_author<'a, I>(
    entries: I,
    unknown: &'a str,
) -> IndexMap<&'a str, Vec<&'a ChangelogEntry>>
where
    I: IntoIterator<Item = &'a ChangelogEntry>,
{
    let mut groups: IndexMap<&str, Vec<&ChangelogEntry>> = IndexMap::new();
    for entry in entries {
        groups
            .entry(entry.author().unwrap_or(unknown))
            .or_default()
            .push(entry);
    }
    groups
}

/// Author headers and bullet lines for a set of entries
///
/// Change items with a blank message are dropped. An author whose items
/// were all dropped still gets a header.
pub fn entries_to_message_lines<'a, I>(entries: I, labels: &Labels) -> Vec<String>
where
    I: IntoIterator<Item = &'a ChangelogEntry>,
{
    let groups = group_by_author(entries, labels.unknown);
    let mut lines = Vec::new();

    for (index, (author, entries)) in groups.iter().enumerate() {
        if index > 0 {
            lines.push("\n".to_string());
        }
        lines.push(format!("**{}**:\n", truncate_to_limit(author)));

        for item in entries.iter().flat_map(|entry| entry.changes()) {
            let message = item.message.trim();
            if message.is_empty() {
                continue;
            }
            lines.push(format!(
                "• {} {}: {}\n",
                item.kind.icon(),
                labels.type_label(&item.kind),
                truncate_to_limit(message)
            ));
        }
    }
    lines
}

/// Every line of the announcement for one merged pull request
pub fn build_message_lines(
    pr: &PullRequestRef,
    deltas: &[ChangelogFileDelta],
    labels: &Labels,
) -> Vec<String> {
    let mut lines = vec![format!(
        "🆑 **{} — PR [#{}]({}) {}**\n",
        labels.headline, pr.number, pr.url, labels.merged
    )];
    if !pr.title.trim().is_empty() {
        lines.push(format!("{}\n", truncate_to_limit(&pr.title)));
    }
    lines.push("\n".to_string());

    for delta in deltas {
        lines.push(format!(
            "📄 **{}** (`{}`)\n",
            truncate_to_limit(delta.file_name()),
            truncate_to_limit(&delta.path)
        ));

        let summary = render_change_type_summary(&count_change_types(delta.reported_entries()));
        if !summary.is_empty() {
            lines.push(format!("{}: {}\n", labels.summary, summary));
        }

        lines.extend(entries_to_message_lines(delta.reported_entries(), labels));

        if !delta.removed.is_empty() {
            lines.push(format!("{}\n", labels.removed_notice(delta.removed.len())));
        }
        lines.push("\n".to_string());
    }
    lines
}
