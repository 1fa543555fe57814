//! Semantic memory for personal AI agents — markdown notes and journal logs,
//! searchable by meaning.
//!
//! mnemo turns a directory of free-text notes (a state file, project, person,
//! and meeting files, distilled "topic" notes) plus an append-only journal
//! log into a vector index that answers similarity queries. Retrieval runs in
//! two stages: a primary nearest-neighbor search, then a per-result
//! relatedness expansion that surfaces associatively close items without any
//! stored graph structure.
//!
//! # Architecture
//!
//! - **Storage**: SQLite with [sqlite-vec](https://github.com/asg017/sqlite-vec)
//!   for nearest-neighbor search, behind the [`store::VectorStore`] trait
//! - **Embeddings**: an Ollama/OpenAI-compatible HTTP endpoint, or a
//!   deterministic offline token-hash projection (384 dimensions either way)
//! - **Identity**: every indexed item carries a deterministic id derived from
//!   its source and section position, so re-indexing overwrites instead of
//!   duplicating
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`embedding`] — Text-to-vector providers behind the `EmbeddingProvider` trait
//! - [`store`] — The vector store contract and its sqlite-vec implementation
//! - [`memory`] — Core engine: chunking, indexing pipeline, search, derived views

pub mod config;
pub mod embedding;
pub mod memory;
pub mod store;
