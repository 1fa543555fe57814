//! Indexing pipeline — the write path from source content to the vector store.
//!
//! Two entry points, both idempotent through the deterministic id scheme:
//! a full rebuild that wipes and re-derives every item, and incremental
//! updates for one file or one journal entry. Incremental updates never
//! delete ids: a file that shrinks leaves its orphaned section ids in the
//! store until the next rebuild.

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;

use crate::memory::chunk;
use crate::memory::journal::{self, JournalEntry};
use crate::memory::sources;
use crate::memory::topics;
use crate::memory::types::{
    item_id, IndexStats, MemoryItem, MemoryType, RelatedItem, PREAMBLE_SLOT,
};
use crate::memory::MemoryEngine;

impl MemoryEngine {
    /// Upsert one item.
    pub async fn index_item(&self, item: &MemoryItem) -> Result<()> {
        let vector = self.embedder.embed(&item.content).await?;
        self.store.upsert(item, &vector)
    }

    /// Batch-embed and upsert many items, in the given order. Returns the
    /// number indexed.
    pub async fn index_items(&self, items: &[MemoryItem]) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }
        let texts: Vec<&str> = items.iter().map(|item| item.content.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;
        anyhow::ensure!(
            vectors.len() == items.len(),
            "embedding service returned {} vectors for {} items",
            vectors.len(),
            items.len()
        );
        for (item, vector) in items.iter().zip(&vectors) {
            self.store.upsert(item, vector)?;
        }
        Ok(items.len())
    }

    /// Incremental update for one source file: re-chunk and upsert just its
    /// items. Section ids are positional, so stable sections overwrite their
    /// previous versions in place.
    pub async fn index_file(
        &self,
        path: &str,
        content: &str,
        item_type: MemoryType,
    ) -> Result<usize> {
        anyhow::ensure!(
            item_type != MemoryType::Journal,
            "journal content is indexed via index_journal_entry"
        );
        let name = sources::source_name(Path::new(path));
        let items = items_for_file(item_type, &name, path, content);
        let count = self.index_items(&items).await?;
        if item_type == MemoryType::Topic {
            topics::write_listing(&self.layout)?;
        }
        tracing::debug!(path, count, "indexed file");
        Ok(count)
    }

    /// Incremental update for one journal entry. Same timestamp, same id —
    /// re-logging an entry overwrites instead of duplicating.
    pub async fn index_journal_entry(&self, entry: &JournalEntry) -> Result<()> {
        self.index_item(&entry.to_item()).await
    }

    /// Append a new journal entry to the log, index it, and return the
    /// entry's associative neighborhood.
    pub async fn log(
        &self,
        topic: &str,
        content: &str,
        intent: Option<String>,
    ) -> Result<(JournalEntry, Vec<RelatedItem>)> {
        let entry = JournalEntry {
            timestamp: Utc::now(),
            topic: topic.to_string(),
            content: content.to_string(),
            intent,
        };
        journal::append_entry(&self.layout.journal_path(), &entry)?;
        self.index_journal_entry(&entry).await?;

        let item = entry.to_item();
        let related = self.related_for(&item, &[item.id.as_str()]).await?;
        Ok((entry, related))
    }

    /// Full rebuild: wipe the store, then re-derive every item from the
    /// source tree and the journal log. Returns the total item count.
    ///
    /// Not transactional — a concurrent search may observe a transiently
    /// empty index. Malformed journal lines are skipped and counted, never
    /// abort.
    pub async fn rebuild(&self) -> Result<usize> {
        let existing = self.store.list_all()?;
        for entry in &existing {
            self.store.delete(&entry.id)?;
        }
        tracing::info!(cleared = existing.len(), "index cleared");

        // File-derived items, batch-embedded in file-then-section order.
        let mut items = Vec::new();
        let state_path = self.layout.state_path();
        if let Some(content) = read_source(&state_path).await? {
            items.extend(items_for_file(
                MemoryType::State,
                "state",
                &state_path.to_string_lossy(),
                &content,
            ));
        }
        for item_type in [
            MemoryType::Project,
            MemoryType::Person,
            MemoryType::Meeting,
            MemoryType::Topic,
        ] {
            let dir = self.layout.type_dir(item_type).expect("directory-backed type");
            for path in sources::markdown_files(&dir) {
                let Some(content) = read_source(&path).await? else {
                    continue;
                };
                items.extend(items_for_file(
                    item_type,
                    &sources::source_name(&path),
                    &path.to_string_lossy(),
                    &content,
                ));
            }
        }
        let file_count = self.index_items(&items).await?;

        // Journal items go through the single-item path, same as the
        // incremental write.
        let (entries, skipped) = journal::read_entries(&self.layout.journal_path())?;
        if skipped > 0 {
            tracing::warn!(skipped, "skipped malformed journal lines during rebuild");
        }
        for entry in &entries {
            self.index_journal_entry(entry).await?;
        }

        topics::write_listing(&self.layout)?;

        let total = file_count + entries.len();
        tracing::info!(items = total, "rebuild complete");
        Ok(total)
    }

    /// Index statistics: total items, per-type counts, store size on disk.
    pub fn stats(&self) -> Result<IndexStats> {
        let item_count = self.store.count()?;

        let mut by_type: HashMap<String, u64> = HashMap::new();
        for t in ["journal", "state", "project", "person", "meeting", "topic"] {
            by_type.insert(t.to_string(), 0);
        }
        for item in self.store.list_all()? {
            *by_type.entry(item.item_type.as_str().to_string()).or_insert(0) += 1;
        }

        let store_size_bytes = dir_size(&self.layout.index_dir());

        Ok(IndexStats {
            item_count,
            by_type,
            store_size_bytes,
        })
    }
}

/// Chunk one file's content into items with positional ids.
pub(crate) fn items_for_file(
    item_type: MemoryType,
    source_name: &str,
    source: &str,
    content: &str,
) -> Vec<MemoryItem> {
    let mut section_ix = 0usize;
    chunk::chunk_for_type(item_type, content)
        .into_iter()
        .map(|c| {
            let slot = match &c.title {
                None => PREAMBLE_SLOT.to_string(),
                Some(_) => {
                    let s = section_ix.to_string();
                    section_ix += 1;
                    s
                }
            };
            MemoryItem {
                id: item_id(item_type, source_name, &slot),
                item_type,
                content: c.body,
                source: source.to_string(),
                section: c.title,
                timestamp: None,
            }
        })
        .collect()
}

/// Read a source file, treating a missing file as absent rather than fatal.
async fn read_source(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Total size of all files under a directory, 0 if it does not exist.
fn dir_size(dir: &Path) -> u64 {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_get_positional_ids() {
        let items = items_for_file(
            MemoryType::Project,
            "roadmap",
            "projects/roadmap.md",
            "## Status\nActive.\n## Risks\nNone yet.",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "project:roadmap:0");
        assert_eq!(items[0].section.as_deref(), Some("Status"));
        assert_eq!(items[0].content, "Active.");
        assert_eq!(items[1].id, "project:roadmap:1");
        assert_eq!(items[1].section.as_deref(), Some("Risks"));
    }

    #[test]
    fn preamble_takes_the_preamble_slot() {
        let items = items_for_file(
            MemoryType::Person,
            "ada",
            "people/ada.md",
            "Mathematician.\n## Notes\nWrote the first program.",
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "person:ada:preamble");
        assert_eq!(items[0].section, None);
        assert_eq!(items[1].id, "person:ada:0");
    }

    #[test]
    fn topic_file_is_one_whole_item() {
        let items = items_for_file(
            MemoryType::Topic,
            "focus",
            "topics/focus.md",
            "# Focus\n\n## Morning\nDeep work.",
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "topic:focus:preamble");
        assert!(items[0].content.contains("## Morning"));
        assert_eq!(items[0].timestamp, None);
    }

    #[test]
    fn re_chunking_yields_identical_ids() {
        let content = "intro\n## A\none\n## B\ntwo";
        let first = items_for_file(MemoryType::Meeting, "standup", "meetings/standup.md", content);
        let second = items_for_file(MemoryType::Meeting, "standup", "meetings/standup.md", content);
        let first_ids: Vec<&str> = first.iter().map(|i| i.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }
}
