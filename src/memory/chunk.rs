//! Markdown section chunker.
//!
//! Splits a document into addressable units on level-2 headings (`## `).
//! Text before the first heading becomes a `preamble` chunk when it has
//! non-whitespace content; each heading opens a titled chunk whose body runs
//! to the next heading. Empty bodies are dropped.
//!
//! Topic notes bypass chunking entirely: they are compact and self-contained,
//! and splitting them would lose coherence.
//!
//! Pure functions, no I/O — chunking the same input twice yields identical
//! output.

use crate::memory::types::MemoryType;

/// One addressable unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Heading text, `None` for the preamble or a whole-file chunk.
    pub title: Option<String>,
    pub body: String,
}

/// Split markdown text for the given type.
///
/// `Topic` yields at most one whole-file chunk; every other type is split
/// with [`chunk_markdown`].
pub fn chunk_for_type(item_type: MemoryType, text: &str) -> Vec<Chunk> {
    if item_type == MemoryType::Topic {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        return vec![Chunk {
            title: None,
            body: trimmed.to_string(),
        }];
    }
    chunk_markdown(text)
}

/// Split markdown text on lines beginning with `## `.
pub fn chunk_markdown(text: &str) -> Vec<Chunk> {
    fn flush(title: Option<String>, body_lines: &mut Vec<&str>, chunks: &mut Vec<Chunk>) {
        let body = body_lines.join("\n").trim().to_string();
        body_lines.clear();
        if !body.is_empty() {
            chunks.push(Chunk { title, body });
        }
    }

    let mut chunks = Vec::new();
    let mut title: Option<String> = None;
    let mut body_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            flush(title.take(), &mut body_lines, &mut chunks);
            title = Some(heading.trim().to_string());
        } else {
            body_lines.push(line);
        }
    }
    flush(title, &mut body_lines, &mut chunks);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_and_sections() {
        let text = "Intro line.\n\n## Status\nActive.\n\n## Risks\nNone yet.";
        let chunks = chunk_markdown(text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].title, None);
        assert_eq!(chunks[0].body, "Intro line.");
        assert_eq!(chunks[1].title.as_deref(), Some("Status"));
        assert_eq!(chunks[1].body, "Active.");
        assert_eq!(chunks[2].title.as_deref(), Some("Risks"));
        assert_eq!(chunks[2].body, "None yet.");
    }

    #[test]
    fn whitespace_only_preamble_is_dropped() {
        let text = "\n   \n## Status\nActive.";
        let chunks = chunk_markdown(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title.as_deref(), Some("Status"));
    }

    #[test]
    fn empty_section_bodies_are_dropped() {
        let text = "## Empty\n\n## Full\ncontent";
        let chunks = chunk_markdown(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title.as_deref(), Some("Full"));
    }

    #[test]
    fn level_three_headings_stay_in_body() {
        let text = "## Plan\n### Phase one\ndetails";
        let chunks = chunk_markdown(text);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].body.contains("### Phase one"));
    }

    #[test]
    fn heading_title_is_trimmed() {
        let chunks = chunk_markdown("##   Padded title  \nbody");
        assert_eq!(chunks[0].title.as_deref(), Some("Padded title"));
    }

    #[test]
    fn no_headings_yields_single_preamble() {
        let chunks = chunk_markdown("Just a note with no structure.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title, None);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(chunk_markdown("").is_empty());
        assert!(chunk_markdown("   \n\n  ").is_empty());
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "pre\n## A\none\n## B\ntwo";
        assert_eq!(chunk_markdown(text), chunk_markdown(text));
    }

    #[test]
    fn topic_bypasses_splitting() {
        let text = "# Focus\n\n## Morning\nDeep work.\n\n## Evening\nReview.";
        let chunks = chunk_for_type(MemoryType::Topic, text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title, None);
        assert!(chunks[0].body.contains("## Morning"));
        assert!(chunks[0].body.contains("## Evening"));
    }

    #[test]
    fn empty_topic_yields_nothing() {
        assert!(chunk_for_type(MemoryType::Topic, "  \n").is_empty());
    }

    #[test]
    fn non_topic_types_are_split() {
        let text = "## Status\nActive.";
        let chunks = chunk_for_type(MemoryType::Project, text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title.as_deref(), Some("Status"));
    }
}
