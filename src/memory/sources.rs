//! On-disk layout of the memory tree and source discovery.
//!
//! ```text
//! <memory_dir>/
//!   state.md        single current-state file
//!   projects/       one markdown file per project
//!   people/         one markdown file per person
//!   meetings/       meeting briefings
//!   topics/         distilled topic notes
//!   topics.md       derived listing, regenerated (never hand-edited)
//!   journal.log     append-only JSONL log
//!   index/          opaque vector-store directory
//! ```

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::memory::types::MemoryType;

/// Path accessors for one memory tree.
#[derive(Debug, Clone)]
pub struct MemoryLayout {
    root: PathBuf,
}

impl MemoryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join("journal.log")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.md")
    }

    /// Directory holding files of the given type, `None` for types that are
    /// not directory-backed (journal, state).
    pub fn type_dir(&self, item_type: MemoryType) -> Option<PathBuf> {
        let dir = match item_type {
            MemoryType::Project => "projects",
            MemoryType::Person => "people",
            MemoryType::Meeting => "meetings",
            MemoryType::Topic => "topics",
            MemoryType::Journal | MemoryType::State => return None,
        };
        Some(self.root.join(dir))
    }

    /// The derived topics listing. Lives outside `topics/` so it is never
    /// indexed as a topic itself.
    pub fn topics_listing_path(&self) -> PathBuf {
        self.root.join("topics.md")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }
}

/// All markdown files under `dir`, recursively, in sorted order for
/// deterministic indexing. A missing directory reads as empty.
pub fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}

/// The stable source name a file contributes to item ids: its file stem.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
