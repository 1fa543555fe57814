//! The append-only journal log.
//!
//! One JSON object per line: `timestamp, topic, content, intent?`. The log
//! is the source of truth; the index is a derived cache over it. Existing
//! lines are never rewritten or deleted.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::memory::types::{journal_id, MemoryItem, MemoryType};

/// One immutable journal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub topic: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl JournalEntry {
    /// Project this entry into its indexed form. The topic is folded into
    /// the embedded text so it participates in similarity.
    pub fn to_item(&self) -> MemoryItem {
        MemoryItem {
            id: journal_id(self.timestamp),
            item_type: MemoryType::Journal,
            content: format!("[{}] {}", self.topic, self.content),
            source: "journal".into(),
            section: None,
            timestamp: Some(self.timestamp),
        }
    }
}

/// Append one entry as a JSON line. Creates the file (and parent directory)
/// on first write.
pub fn append_entry(path: &Path, entry: &JournalEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let line = serde_json::to_string(entry).context("failed to serialize journal entry")?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open journal log {}", path.display()))?;
    writeln!(file, "{line}")
        .with_context(|| format!("failed to append to journal log {}", path.display()))?;
    Ok(())
}

/// Read all well-formed entries. Returns the entries plus the number of
/// malformed lines skipped. A missing log reads as empty.
pub fn read_entries(path: &Path) -> Result<(Vec<JournalEntry>, usize)> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read journal log {}", path.display()))
        }
    };

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<JournalEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(_) => skipped += 1,
        }
    }
    Ok((entries, skipped))
}
