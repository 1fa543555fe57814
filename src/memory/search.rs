//! Two-stage retrieval: primary similarity search plus per-result
//! relatedness expansion.
//!
//! The primary stage over-fetches from the store and applies `type`/`since`
//! filters in memory — the store contract does not assume native filtering,
//! and result sets at personal scale make post-filtering correct and cheap.
//! The expansion stage re-embeds each surviving result's own content and
//! queries its neighborhood, so associative links are recomputed from
//! embedding proximity at query time; no edges are stored.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::memory::types::{
    EntryWithRelated, MemoryItem, MemoryType, RelatedItem, SearchResult,
};
use crate::memory::MemoryEngine;
use crate::store::ScoredItem;

/// Over-fetch factor for the primary query, to survive post-filtering.
const OVERFETCH_FACTOR: usize = 2;
/// Candidates fetched per result during relatedness expansion.
const RELATED_FAN_OUT: usize = 8;
/// Minimum similarity for a related candidate to surface.
const RELATED_FLOOR: f64 = 0.4;
/// Maximum related items per result.
const RELATED_CAP: usize = 3;
/// Snippet prefix length in bytes, truncated at a char boundary.
const SNIPPET_LEN: usize = 120;

/// Search parameters.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: usize,
    pub item_type: Option<MemoryType>,
    /// Timestamp lower bound; items without a timestamp are excluded when set.
    pub since: Option<DateTime<Utc>>,
    pub include_related: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            item_type: None,
            since: None,
            include_related: true,
        }
    }
}

impl MemoryEngine {
    /// Query the index by meaning.
    ///
    /// Results are ordered purely by similarity, descending — no recency or
    /// type tie-break. An empty index yields an empty list.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let query_vector = self.embedder.embed(query).await?;
        let candidates = self
            .store
            .query(&query_vector, options.limit * OVERFETCH_FACTOR)?;

        let primary: Vec<ScoredItem> = candidates
            .into_iter()
            .filter(|scored| matches_filters(&scored.item, options))
            .take(options.limit)
            .collect();

        let primary_ids: Vec<&str> = primary.iter().map(|s| s.item.id.as_str()).collect();

        let mut results = Vec::with_capacity(primary.len());
        for scored in &primary {
            let related = if options.include_related {
                self.related_for(&scored.item, &primary_ids).await?
            } else {
                Vec::new()
            };
            results.push(SearchResult {
                id: scored.item.id.clone(),
                item_type: scored.item.item_type,
                content: scored.item.content.clone(),
                source: scored.item.source.clone(),
                section: scored.item.section.clone(),
                timestamp: scored.item.timestamp,
                score: scored.score,
                related,
            });
        }
        Ok(results)
    }

    /// Direct lookup by id plus relatedness expansion — lets a caller walk
    /// from a known item into its neighborhood. Unknown ids are a normal
    /// outcome, not an error.
    pub async fn entry_with_related(&self, id: &str) -> Result<Option<EntryWithRelated>> {
        let Some(entry) = self.store.get(id)? else {
            return Ok(None);
        };
        let related = self.related_for(&entry, &[id]).await?;
        Ok(Some(EntryWithRelated { entry, related }))
    }

    /// Associative neighbors of one item: embed the item's own content (not
    /// the original query), fetch a fixed fan-out, drop the item itself and
    /// every excluded id, keep candidates above the similarity floor, cap
    /// the count.
    pub(crate) async fn related_for(
        &self,
        item: &MemoryItem,
        exclude: &[&str],
    ) -> Result<Vec<RelatedItem>> {
        let vector = self.embedder.embed(&item.content).await?;
        let candidates = self.store.query(&vector, RELATED_FAN_OUT)?;
        Ok(candidates
            .into_iter()
            .filter(|c| c.item.id != item.id && !exclude.contains(&c.item.id.as_str()))
            .filter(|c| c.score > RELATED_FLOOR)
            .take(RELATED_CAP)
            .map(|c| RelatedItem {
                id: c.item.id,
                item_type: c.item.item_type,
                source: c.item.source,
                snippet: snippet(&c.item.content, SNIPPET_LEN),
                score: c.score,
            })
            .collect())
    }
}

/// Post-hoc filters, applied after retrieval.
fn matches_filters(item: &MemoryItem, options: &SearchOptions) -> bool {
    if let Some(wanted) = options.item_type {
        if item.item_type != wanted {
            return false;
        }
    }
    if let Some(since) = options.since {
        match item.timestamp {
            Some(ts) if ts >= since => {}
            _ => return false,
        }
    }
    true
}

/// Truncate content to a prefix, appending "..." if truncated. Cuts at a
/// char boundary.
fn snippet(content: &str, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content.to_string();
    }
    let end = content
        .char_indices()
        .take_while(|(i, _)| *i < max_bytes)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(max_bytes);
    format!("{}...", &content[..end])
}
