//! Core memory type definitions.
//!
//! Defines [`MemoryType`] (the closed set of indexable content kinds),
//! [`MemoryItem`] (the atomic indexed unit), search result shapes, and the
//! deterministic id scheme that makes re-indexing idempotent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six kinds of indexable content. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Append-only log lines — the only type carrying a timestamp.
    Journal,
    /// The single current-state file.
    State,
    /// One file per ongoing project.
    Project,
    /// One file per person.
    Person,
    /// Meeting briefings and notes.
    Meeting,
    /// Distilled topic notes — indexed whole, never split.
    Topic,
}

impl MemoryType {
    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Journal => "journal",
            Self::State => "state",
            Self::Project => "project",
            Self::Person => "person",
            Self::Meeting => "meeting",
            Self::Topic => "topic",
        }
    }

}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "journal" => Ok(Self::Journal),
            "state" => Ok(Self::State),
            "project" => Ok(Self::Project),
            "person" => Ok(Self::Person),
            "meeting" => Ok(Self::Meeting),
            "topic" => Ok(Self::Topic),
            _ => Err(format!("unknown memory type: {s}")),
        }
    }
}

/// The atomic indexed unit: one embeddable piece of content with a
/// deterministic identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Deterministic id — same logical unit, same id, so re-indexing
    /// overwrites instead of duplicating.
    pub id: String,
    /// Content kind.
    #[serde(rename = "type")]
    pub item_type: MemoryType,
    /// The text that gets embedded and returned to callers.
    pub content: String,
    /// Originating file path, or `"journal"` for log-derived items.
    pub source: String,
    /// Heading text the chunk was extracted from; `None` for whole-file items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Present for journal items only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A primary search result: item fields plus similarity score and
/// associative neighbors.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: MemoryType,
    pub content: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Similarity to the query, higher = more relevant.
    pub score: f64,
    /// Associative neighbors, empty when expansion is disabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedItem>,
}

/// A compact associative neighbor surfaced by relatedness expansion.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: MemoryType,
    pub source: String,
    /// Content prefix, truncated at a char boundary.
    pub snippet: String,
    pub score: f64,
}

/// A direct lookup result with its neighborhood.
#[derive(Debug, Clone, Serialize)]
pub struct EntryWithRelated {
    pub entry: MemoryItem,
    pub related: Vec<RelatedItem>,
}

/// Index statistics.
#[derive(Debug, Serialize)]
pub struct IndexStats {
    pub item_count: u64,
    pub by_type: std::collections::HashMap<String, u64>,
    pub store_size_bytes: u64,
}

/// Section slot for items derived from text before the first subsection
/// heading, and for whole-file items.
pub const PREAMBLE_SLOT: &str = "preamble";

/// Deterministic id for a file-derived item.
///
/// `slot` is [`PREAMBLE_SLOT`] or the zero-based section ordinal. The source
/// name is escaped so names containing the separator cannot collide with
/// other (name, slot) combinations.
pub fn item_id(item_type: MemoryType, source_name: &str, slot: &str) -> String {
    format!("{}:{}:{}", item_type.as_str(), escape_id_part(source_name), slot)
}

/// Deterministic id for a journal item: same timestamp, same id.
pub fn journal_id(timestamp: DateTime<Utc>) -> String {
    format!("journal:{}", timestamp.to_rfc3339())
}

/// Percent-escape the id separator so distinct source names map to distinct
/// ids even when they contain `:`.
fn escape_id_part(part: &str) -> String {
    part.replace('%', "%25").replace(':', "%3A")
}
