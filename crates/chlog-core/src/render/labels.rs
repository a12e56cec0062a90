//! Fixed label tables

use crate::model::ChangeType;
use std::str::FromStr;

/// Supported label tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ukrainian,
    English,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" | "ua" | "uk-ua" => Ok(Locale::Ukrainian),
            "en" | "en-us" | "en-gb" => Ok(Locale::English),
            other => Err(format!("unsupported locale '{}' (expected uk or en)", other)),
        }
    }
}

/// Wording used by the message renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Headline of the first message
    pub headline: &'static str,
    /// Word following the PR link in the headline
    pub merged: &'static str,
    /// Prefix of the per-file tally line
    pub summary: &'static str,
    /// Sentinel for a missing author or change type
    pub unknown: &'static str,
    pub add: &'static str,
    pub fix: &'static str,
    pub remove: &'static str,
    pub tweak: &'static str,
    /// Removed-entries warning; `{count}` is replaced by the number
    pub removed_notice: &'static str,
}

impl Labels {
    pub fn ukrainian() -> Self {
        Self {
            headline: "Оновлення списку змін",
            merged: "змерджено",
            summary: "Підсумок",
            unknown: "Невідомо",
            add: "Додано",
            fix: "Виправлено",
            remove: "Видалено",
            tweak: "Змінено",
            removed_notice: "⚠️ Зі списку змін прибрано {count} запис(ів) у цьому файлі.",
        }
    }

    pub fn english() -> Self {
        Self {
            headline: "Changelog update",
            merged: "merged",
            summary: "Summary",
            unknown: "Unknown",
            add: "Added",
            fix: "Fixed",
            remove: "Removed",
            tweak: "Tweaked",
            removed_notice: "⚠️ {count} entr(y/ies) removed from the changelog in this file.",
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Ukrainian => Self::ukrainian(),
            Locale::English => Self::english(),
        }
    }

    /// Label of a change type; unknown types show their raw text
    pub fn type_label<'a>(&'a self, kind: &'a ChangeType) -> &'a str {
        match kind {
            ChangeType::Add => self.add,
            ChangeType::Fix => self.fix,
            ChangeType::Remove => self.remove,
            ChangeType::Tweak => self.tweak,
            ChangeType::Unknown(raw) if raw.is_empty() => self.unknown,
            ChangeType::Unknown(raw) => raw,
        }
    }

    pub fn removed_notice(&self, count: usize) -> String {
        self.removed_notice.replace("{count}", &count.to_string())
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::ukrainian()
    }
}
