//! The vector store contract and its sqlite-vec implementation.
//!
//! The store is a durable id → (vector, metadata) map with nearest-neighbor
//! query. It is a cache: its contents can be wiped and reconstructed entirely
//! from the journal log and the current source files.

pub mod migrations;
pub mod schema;
pub mod sqlite;

use anyhow::Result;

use crate::memory::types::MemoryItem;

/// A store entry returned by a nearest-neighbor query.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub item: MemoryItem,
    /// Similarity to the query vector, higher = more relevant.
    pub score: f64,
}

/// Durable key → (vector, metadata) map with nearest-neighbor query.
///
/// Metadata is the flattened projection of [`MemoryItem`] fields; store
/// implementations may not hold nested structures. Upserting an existing id
/// overwrites. Failures propagate — retry policy belongs to the caller.
pub trait VectorStore {
    /// Insert or overwrite one entry.
    fn upsert(&self, item: &MemoryItem, vector: &[f32]) -> Result<()>;

    /// Remove one entry. Removing an absent id is not an error.
    fn delete(&self, id: &str) -> Result<()>;

    /// Direct metadata lookup.
    fn get(&self, id: &str) -> Result<Option<MemoryItem>>;

    /// Every stored entry's metadata, in stable id order.
    fn list_all(&self) -> Result<Vec<MemoryItem>>;

    /// The `k` nearest neighbors of `vector`, ranked by descending similarity.
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredItem>>;

    /// Total entry count.
    fn count(&self) -> Result<u64>;
}
