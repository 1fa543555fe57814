//! Core memory engine: chunking, indexing pipeline, search, derived views.
//!
//! [`MemoryEngine`] is an explicitly constructed, owned handle over a vector
//! store, an embedding provider, and one on-disk memory tree. There is no
//! process-wide singleton — tests build isolated engines over temporary
//! directories.

pub mod chunk;
pub mod index;
pub mod journal;
pub mod search;
pub mod sources;
pub mod topics;
pub mod types;

use anyhow::Result;

use crate::config::MnemoConfig;
use crate::embedding::EmbeddingProvider;
use crate::store::sqlite::SqliteStore;
use crate::store::VectorStore;
use self::sources::MemoryLayout;

/// The semantic memory engine.
///
/// All operations run as sequential awaited steps: file reads, embedding
/// calls, and store writes suspend at their I/O boundaries, and writes for
/// one operation are issued in a fixed order. There is no cross-request
/// ordering guarantee — a search racing a rebuild may observe a partially
/// populated index.
pub struct MemoryEngine {
    store: Box<dyn VectorStore>,
    embedder: Box<dyn EmbeddingProvider>,
    layout: MemoryLayout,
}

impl MemoryEngine {
    /// Build an engine from explicit parts.
    pub fn new(
        store: Box<dyn VectorStore>,
        embedder: Box<dyn EmbeddingProvider>,
        layout: MemoryLayout,
    ) -> Self {
        Self {
            store,
            embedder,
            layout,
        }
    }

    /// Build an engine from config: sqlite-vec store under the memory tree's
    /// `index/` directory, embedding provider per the `[embedding]` section.
    pub fn open(config: &MnemoConfig) -> Result<Self> {
        let layout = MemoryLayout::new(config.resolved_memory_dir());
        let store = SqliteStore::open(&layout.index_dir(), &config.embedding.model)?;
        let embedder = crate::embedding::create_provider(&config.embedding)?;
        Ok(Self::new(Box::new(store), embedder, layout))
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }
}
