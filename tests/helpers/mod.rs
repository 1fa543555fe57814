#![allow(dead_code)]

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use mnemo::embedding::hashed::HashedEmbeddingProvider;
use mnemo::memory::journal::JournalEntry;
use mnemo::memory::sources::MemoryLayout;
use mnemo::memory::MemoryEngine;
use mnemo::store::sqlite::SqliteStore;

/// Build an isolated engine over a temporary memory tree, using the
/// deterministic hashed embedding provider.
pub fn test_engine(root: &Path) -> MemoryEngine {
    let layout = MemoryLayout::new(root);
    let store = SqliteStore::open(&layout.index_dir(), "hashed").unwrap();
    MemoryEngine::new(
        Box::new(store),
        Box::new(HashedEmbeddingProvider::new()),
        layout,
    )
}

/// Write one source file under the memory root, creating parent directories.
pub fn write_source(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A journal entry with a fixed date and the given seconds offset, so tests
/// control ordering and ids.
pub fn journal_entry(secs: u32, topic: &str, content: &str) -> JournalEntry {
    JournalEntry {
        timestamp: timestamp(secs),
        topic: topic.to_string(),
        content: content.to_string(),
        intent: None,
    }
}

pub fn timestamp(secs: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(secs as i64)
}

/// Seed a small but complete memory tree:
/// 2 state items, 2 project items, 1 person item, 1 meeting item,
/// 1 topic item, and 2 well-formed journal lines (plus 1 malformed).
/// 9 indexable items in total.
pub fn seed_sample_tree(root: &Path) {
    write_source(root, "state.md", "Currently sprinting.\n## Focus\nMemory engine work.");
    write_source(root, "projects/roadmap.md", "## Status\nActive.\n## Risks\nNone yet.");
    write_source(root, "people/ada.md", "Works on compilers and correctness.");
    write_source(root, "meetings/standup.md", "## Notes\nDiscussed indexing throughput.");
    write_source(root, "topics/focus.md", "# Focus\n\n## Morning\nDeep work blocks.");

    let journal = root.join("journal.log");
    mnemo::memory::journal::append_entry(&journal, &journal_entry(1, "build", "shipped v1")).unwrap();
    mnemo::memory::journal::append_entry(&journal, &journal_entry(2, "build", "shipped v2")).unwrap();
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().append(true).open(&journal).unwrap();
    writeln!(file, "this line is not json").unwrap();
}
