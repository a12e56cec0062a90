//! Packing of message lines into webhook-sized chunks

use crate::limits::{char_len, truncate_to_limit, DISCORD_MESSAGE_LIMIT};

/// Greedily pack `lines` into chunks of at most 2000 characters
///
/// Over-long lines are truncated first. A line that does not fit in the
/// running chunk starts a new one; lines are never split or reordered, so
/// concatenating the chunks gives back the (truncated) input.
pub fn chunk_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in lines {
        let line = truncate_to_limit(line.as_ref());
        let line_len = char_len(&line);

        if current_len + line_len > DISCORD_MESSAGE_LIMIT {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current_len = 0;
        }
        current.push_str(&line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_lines_share_a_chunk() {
        let chunks = chunk_lines(&["a\n", "b\n", "\n"]);
        assert_eq!(chunks, vec!["a\nb\n\n"]);
    }

    #[test]
    fn test_overflow_starts_new_chunk() {
        let line = format!("{}\n", "x".repeat(999));
        let chunks = chunk_lines(&[line.clone(), line.clone(), line.clone()]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{}{}", line, line));
        assert_eq!(chunks[1], line);
    }

    #[test]
    fn test_exact_limit_fits() {
        let chunks = chunk_lines(&["y".repeat(1000), "y".repeat(1000)]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(char_len(&chunks[0]), DISCORD_MESSAGE_LIMIT);
    }

    #[test]
    fn test_empty_input_has_no_chunks() {
        assert!(chunk_lines::<String>(&[]).is_empty());
        assert!(chunk_lines(&[""]).is_empty());
    }
}
