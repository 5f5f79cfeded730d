//! Delta selection for incremental sync.
//!
//! Journal titles are zero-padded ISO-8601 dates, so plain string ordering
//! matches chronological ordering and no date parsing is needed.

use crate::models::JournalRef;

/// Keep the journals strictly newer than `watermark`, oldest first.
pub fn select_delta(journals: Vec<JournalRef>, watermark: &str) -> Vec<JournalRef> {
    let mut selected: Vec<JournalRef> = journals
        .into_iter()
        .filter(|j| j.title.as_str() > watermark)
        .collect();
    selected.sort_by(|a, b| a.title.cmp(&b.title));
    selected
}
