//! Rendering of changelog deltas into Discord message lines
//!
//! Every line produced here ends with `\n`; blank separator lines are a
//! bare `"\n"`. The delivery pipeline concatenates lines verbatim.

pub mod labels;
pub mod message;

pub use labels::{Labels, Locale};
pub use message::{
    build_message_lines, count_change_types, entries_to_message_lines,
    render_change_type_summary, ChangeTally, PullRequestRef,
};
