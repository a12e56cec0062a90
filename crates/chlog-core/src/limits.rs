//! Discord message size limits and the shared truncation rule

use std::borrow::Cow;

/// Maximum `content` length of one Discord message, in characters
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Characters given up when an over-long text is cut
pub const TRUNCATION_RESERVE: usize = 100;

/// Marker appended to truncated text
pub const ELLIPSIS: &str = " [...]";

/// Length as Discord counts it (Unicode scalar values)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to fit in a single message
///
/// Text within the limit is returned untouched. Longer text keeps its first
/// `limit - reserve` characters, loses trailing whitespace and gets
/// [`ELLIPSIS`] appended.
pub fn truncate_to_limit(text: &str) -> Cow<'_, str> {
    if char_len(text) <= DISCORD_MESSAGE_LIMIT {
        return Cow::Borrowed(text);
    }
    let cut = text
        .char_indices()
        .nth(DISCORD_MESSAGE_LIMIT - TRUNCATION_RESERVE)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let mut out = text[..cut].trim_end().to_string();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}
