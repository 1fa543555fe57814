//! Derived topics listing.
//!
//! A materialized view over `topics/`: one `- filename - title` line per
//! topic note, sorted by title. A pure projection with no independent state,
//! regenerated unconditionally after every topic write.

use anyhow::{Context, Result};

use crate::memory::sources::{self, MemoryLayout};
use crate::memory::types::MemoryType;

/// Regenerate the topics listing file from the current `topics/` contents.
pub fn write_listing(layout: &MemoryLayout) -> Result<()> {
    let topics_dir = layout
        .type_dir(MemoryType::Topic)
        .expect("topic is directory-backed");

    let mut rows: Vec<(String, String)> = sources::markdown_files(&topics_dir)
        .iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let stem = sources::source_name(path);
            let title = first_heading(&content).unwrap_or_else(|| stem.clone());
            Some((title, stem))
        })
        .collect();
    rows.sort();

    let mut listing = String::new();
    for (title, stem) in &rows {
        listing.push_str(&format!("- {stem} - {title}\n"));
    }

    let listing_path = layout.topics_listing_path();
    std::fs::write(&listing_path, listing)
        .with_context(|| format!("failed to write topics listing {}", listing_path.display()))?;
    tracing::debug!(topics = rows.len(), "topics listing regenerated");
    Ok(())
}

/// First level-1 heading in the document, if any.
fn first_heading(text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with_topics(entries: &[(&str, &str)]) -> (tempfile::TempDir, MemoryLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = MemoryLayout::new(dir.path());
        let topics_dir = layout.type_dir(MemoryType::Topic).unwrap();
        std::fs::create_dir_all(&topics_dir).unwrap();
        for (name, content) in entries {
            std::fs::write(topics_dir.join(format!("{name}.md")), content).unwrap();
        }
        (dir, layout)
    }

    #[test]
    fn listing_is_sorted_by_title() {
        let (_dir, layout) = layout_with_topics(&[
            ("zz", "# Alpha topic\nbody"),
            ("aa", "# Zulu topic\nbody"),
        ]);
        write_listing(&layout).unwrap();

        let listing = std::fs::read_to_string(layout.topics_listing_path()).unwrap();
        assert_eq!(listing, "- zz - Alpha topic\n- aa - Zulu topic\n");
    }

    #[test]
    fn filename_is_the_fallback_title() {
        let (_dir, layout) = layout_with_topics(&[("untitled-note", "no heading here")]);
        write_listing(&layout).unwrap();

        let listing = std::fs::read_to_string(layout.topics_listing_path()).unwrap();
        assert_eq!(listing, "- untitled-note - untitled-note\n");
    }

    #[test]
    fn empty_topics_dir_writes_empty_listing() {
        let (_dir, layout) = layout_with_topics(&[]);
        write_listing(&layout).unwrap();
        let listing = std::fs::read_to_string(layout.topics_listing_path()).unwrap();
        assert!(listing.is_empty());
    }

    #[test]
    fn first_heading_ignores_subheadings() {
        assert_eq!(
            first_heading("## Sub\n# Real title\nbody"),
            Some("Real title".to_string())
        );
        assert_eq!(first_heading("plain text"), None);
    }
}
