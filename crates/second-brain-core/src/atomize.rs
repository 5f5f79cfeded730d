//! Journal atomizer: splits a markdown entry into atomic thoughts.
//!
//! The scanner is a small state machine driven one line at a time by
//! [`step`]. Each call consumes a [`ScanState`] and returns the next state
//! plus at most one [`RawThought`] that was flushed by that line. [`finish`]
//! performs the end-of-input flush. [`Atomizer`] drives the machine over a
//! whole document and turns raw thoughts into tagged, fingerprinted
//! [`AtomicThought`]s.
//!
//! # Markdown conventions
//!
//! | Line | Effect |
//! |------|--------|
//! | `## Project` / `## Area` / `## Resource` / `## Archive` | start capturing under that PARA category |
//! | `## Thought` | start capturing under `resource` |
//! | any other `## ...` | stop capturing |
//! | `---...` | end the current section |
//! | `- [ ] ...` / `- [x] ...` | checklist item, never captured |
//! | `- ...` | start a new thought |
//! | other non-blank text | continuation of the current thought |
//! | `<!-- ... -->` | dropped, including every line in between |
//!
//! # Example
//!
//! ```rust
//! use second_brain_core::atomize::Atomizer;
//! use second_brain_core::models::Category;
//!
//! let body = "## Project\n- Ship the sync job\n  with retries\n- Write docs";
//! let thoughts = Atomizer::default().atomize("2026-02-16", body);
//! assert_eq!(thoughts.len(), 2);
//! assert_eq!(thoughts[0].content, "Ship the sync job\nwith retries");
//! assert_eq!(thoughts[0].category, Category::Project);
//! ```

use crate::models::{AtomicThought, Category};
use crate::tagger::Tagger;

/// Scanner state carried from one line to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    pub category: Category,
    pub buffer: Vec<String>,
    pub in_comment: bool,
    pub capturing: bool,
}

impl Default for ScanState {
    fn default() -> Self {
        Self {
            category: Category::Resource,
            buffer: Vec::new(),
            in_comment: false,
            capturing: false,
        }
    }
}

/// Flushed thought text before tagging and fingerprinting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawThought {
    pub content: String,
    pub category: Category,
}

/// Advance the scanner by one line.
pub fn step(mut state: ScanState, line: &str) -> (ScanState, Option<RawThought>) {
    let trimmed = line.trim();

    if !state.in_comment && line.contains("<!--") {
        state.in_comment = true;
    }
    if state.in_comment {
        if line.contains("-->") {
            state.in_comment = false;
        }
        return (state, None);
    }

    if trimmed.starts_with("## ") {
        let flushed = if state.capturing {
            flush(&mut state)
        } else {
            None
        };
        match section_category(trimmed) {
            Some(category) => {
                state.category = category;
                state.capturing = true;
            }
            None => state.capturing = false,
        }
        return (state, flushed);
    }

    if !state.capturing {
        return (state, None);
    }

    if trimmed.starts_with("---") {
        let flushed = flush(&mut state);
        state.capturing = false;
        return (state, flushed);
    }

    if trimmed.starts_with("- [ ]") || trimmed.starts_with("- [x]") {
        return (state, None);
    }

    let mut flushed = None;
    if trimmed.starts_with('-') && !state.buffer.is_empty() {
        flushed = flush(&mut state);
    }

    let cleaned = strip_bullet(trimmed);
    if !cleaned.is_empty() {
        state.buffer.push(cleaned.to_string());
    }

    (state, flushed)
}

/// Flush whatever is left in the buffer at end of input.
pub fn finish(mut state: ScanState) -> Option<RawThought> {
    flush(&mut state)
}

fn section_category(header: &str) -> Option<Category> {
    match header {
        "## Project" => Some(Category::Project),
        "## Area" => Some(Category::Area),
        "## Resource" | "## Thought" => Some(Category::Resource),
        "## Archive" => Some(Category::Archive),
        _ => None,
    }
}

/// Remove a leading `"- "` or `"-"` bullet marker.
fn strip_bullet(trimmed: &str) -> &str {
    if let Some(rest) = trimmed.strip_prefix("- ") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        rest
    } else {
        trimmed
    }
}

fn flush(state: &mut ScanState) -> Option<RawThought> {
    if state.buffer.is_empty() {
        return None;
    }
    let joined = std::mem::take(&mut state.buffer).join("\n");
    let text = joined.trim();
    let text = if text == "-" {
        ""
    } else {
        text.strip_prefix("- ").unwrap_or(text).trim()
    };

    if text.is_empty() || text == "*" {
        return None;
    }
    Some(RawThought {
        content: text.to_string(),
        category: state.category,
    })
}

/// Turns journal bodies into [`AtomicThought`]s.
#[derive(Debug, Clone, Default)]
pub struct Atomizer {
    tagger: Tagger,
}

impl Atomizer {
    pub fn new(tagger: Tagger) -> Self {
        Self { tagger }
    }

    /// Extract the atomic thoughts of one journal entry, in document order.
    pub fn atomize(&self, date: &str, body: &str) -> Vec<AtomicThought> {
        let mut thoughts = Vec::new();
        let mut state = ScanState::default();

        for line in body.lines() {
            let (next, flushed) = step(state, line);
            state = next;
            if let Some(raw) = flushed {
                thoughts.push(self.build(date, raw));
            }
        }
        if let Some(raw) = finish(state) {
            thoughts.push(self.build(date, raw));
        }

        thoughts
    }

    fn build(&self, date: &str, raw: RawThought) -> AtomicThought {
        let tags = self.tagger.tags(&raw.content).into_iter().collect();
        AtomicThought::new(date, &raw.content, raw.category, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "2026-02-16";

    fn contents(body: &str) -> Vec<(String, Category)> {
        Atomizer::default()
            .atomize(DATE, body)
            .into_iter()
            .map(|t| (t.content, t.category))
            .collect()
    }

    fn run(lines: &[&str]) -> (ScanState, Vec<RawThought>) {
        let mut state = ScanState::default();
        let mut out = Vec::new();
        for line in lines {
            let (next, flushed) = step(state, line);
            state = next;
            out.extend(flushed);
        }
        (state, out)
    }

    #[test]
    fn test_thought_project_and_separator() {
        let body = "
## Thought
- This is a test thought.
- Another thought.

## Project
- [ ] Active task (should be skipped)
- Completed task (should be captured)

---
Ignored content after separator.
";
        assert_eq!(
            contents(body),
            vec![
                ("This is a test thought.".to_string(), Category::Resource),
                ("Another thought.".to_string(), Category::Resource),
                (
                    "Completed task (should be captured)".to_string(),
                    Category::Project
                ),
            ]
        );
    }

    #[test]
    fn test_nothing_captured_before_first_header() {
        assert!(contents("- loose bullet\nplain text").is_empty());
    }

    #[test]
    fn test_unrecognized_header_suspends_capture() {
        let body = "## Area\n- kept\n## Today's Task\n- dropped\n## Archive\n- kept again";
        assert_eq!(
            contents(body),
            vec![
                ("kept".to_string(), Category::Area),
                ("kept again".to_string(), Category::Archive),
            ]
        );
    }

    #[test]
    fn test_header_requires_exact_match() {
        assert!(contents("## Projects\n- not a PARA header").is_empty());
    }

    #[test]
    fn test_multiline_thought() {
        let body = "## Resource\n- First line\ncontinues here\n\n  and here\n- Second";
        assert_eq!(
            contents(body),
            vec![
                (
                    "First line\ncontinues here\nand here".to_string(),
                    Category::Resource
                ),
                ("Second".to_string(), Category::Resource),
            ]
        );
    }

    #[test]
    fn test_comments_are_stripped() {
        let body = "## Thought\n<!-- template hint -->\n- real\n<!--\n- hidden\n-->\n- also real";
        assert_eq!(
            contents(body),
            vec![
                ("real".to_string(), Category::Resource),
                ("also real".to_string(), Category::Resource),
            ]
        );
    }

    #[test]
    fn test_unclosed_comment_swallows_rest() {
        let body = "## Thought\n- before\n<!-- never closed\n- after";
        assert_eq!(contents(body), vec![("before".to_string(), Category::Resource)]);
    }

    #[test]
    fn test_star_and_lone_dash_discarded() {
        let body = "## Thought\n- *\n-\n- \n- kept";
        assert_eq!(contents(body), vec![("kept".to_string(), Category::Resource)]);
    }

    #[test]
    fn test_dash_without_space() {
        assert_eq!(
            contents("## Thought\n-Tight bullet"),
            vec![("Tight bullet".to_string(), Category::Resource)]
        );
    }

    #[test]
    fn test_checked_items_skipped() {
        let body = "## Project\n- [x] done already\n- [ ] open item\n- note";
        assert_eq!(contents(body), vec![("note".to_string(), Category::Project)]);
    }

    #[test]
    fn test_separator_outside_capture_is_ignored() {
        let body = "---\n## Area\n- after rule";
        assert_eq!(contents(body), vec![("after rule".to_string(), Category::Area)]);
    }

    #[test]
    fn test_no_empty_or_star_thoughts() {
        let bodies = [
            "",
            "## Thought",
            "## Thought\n-\n-\n---",
            "## Thought\n*\n## Area\n- *",
            "## Thought\n- - \n- -",
            "<!--\n## Thought\n- x",
        ];
        for body in bodies {
            for t in Atomizer::default().atomize(DATE, body) {
                let trimmed = t.content.trim();
                assert!(!trimmed.is_empty() && trimmed != "*", "bad thought {:?} from {:?}", t, body);
            }
        }
    }

    #[test]
    fn test_thought_records_are_complete() {
        let thoughts = Atomizer::default().atomize(DATE, "## Thought\n- Fed the cat");
        assert_eq!(thoughts.len(), 1);
        let t = &thoughts[0];
        assert_eq!(t.date, DATE);
        assert_eq!(t.tags, vec!["random".to_string()]);
        assert_eq!(t.checksum.len(), 64);
        assert!(t.context_string.starts_with("Date: 2026-02-16 | Category: resource | Tags: random"));
    }

    #[test]
    fn test_step_header_flushes_before_switching_category() {
        let (state, out) = run(&["## Project", "- ship it"]);
        assert!(out.is_empty());
        assert_eq!(state.buffer, vec!["ship it".to_string()]);

        let (state, flushed) = step(state, "## Archive");
        assert_eq!(
            flushed,
            Some(RawThought {
                content: "ship it".to_string(),
                category: Category::Project,
            })
        );
        assert_eq!(state.category, Category::Archive);
        assert!(state.capturing);
        assert!(state.buffer.is_empty());
    }

    #[test]
    fn test_step_bullet_flushes_before_accumulating() {
        let (state, _) = run(&["## Area", "- one", "continued"]);
        let (state, flushed) = step(state, "- two");
        assert_eq!(flushed.unwrap().content, "one\ncontinued");
        assert_eq!(state.buffer, vec!["two".to_string()]);
    }

    #[test]
    fn test_step_blank_line_does_not_flush() {
        let (state, _) = run(&["## Area", "- one"]);
        let (state, flushed) = step(state, "   ");
        assert!(flushed.is_none());
        assert_eq!(state.buffer, vec!["one".to_string()]);
    }

    #[test]
    fn test_step_separator_stops_capture() {
        let (state, out) = run(&["## Area", "- one", "---", "- ignored"]);
        assert_eq!(out.len(), 1);
        assert!(!state.capturing);
        assert!(state.buffer.is_empty());
    }

    #[test]
    fn test_step_comment_mode_tracks_markers() {
        let (state, _) = step(ScanState::default(), "<!-- open");
        assert!(state.in_comment);
        let (state, _) = step(state, "still inside");
        assert!(state.in_comment);
        let (state, _) = step(state, "close -->");
        assert!(!state.in_comment);
    }

    #[test]
    fn test_finish_flushes_without_capture() {
        let state = ScanState {
            category: Category::Area,
            buffer: vec!["- dangling".to_string()],
            in_comment: false,
            capturing: false,
        };
        assert_eq!(
            finish(state),
            Some(RawThought {
                content: "dangling".to_string(),
                category: Category::Area,
            })
        );
    }

    #[test]
    fn test_discarded_flush_clears_buffer() {
        let (state, out) = run(&["## Thought", "- *", "- kept"]);
        assert!(out.is_empty());
        assert_eq!(state.buffer, vec!["kept".to_string()]);
    }
}
