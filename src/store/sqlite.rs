//! sqlite-vec backed vector store.
//!
//! Owns an index directory containing one SQLite database: the `items`
//! metadata table plus an `items_vec` vec0 virtual table holding the
//! embeddings. Nearest-neighbor distances from vec0 are L2; vectors are
//! L2-normalized, so similarity is recovered as `1 - d²/2`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sqlite_vec::sqlite3_vec_init;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Once;

use super::{ScoredItem, VectorStore};
use crate::memory::types::{MemoryItem, MemoryType};

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Vector store over rusqlite + sqlite-vec.
pub struct SqliteStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the store inside `index_dir`, creating the directory
    /// if absent, and stamp the embedding model that produces its vectors.
    pub fn open(index_dir: &Path, embedding_model: &str) -> Result<Self> {
        std::fs::create_dir_all(index_dir)
            .with_context(|| format!("failed to create index directory {}", index_dir.display()))?;

        load_sqlite_vec();

        let db_path = index_dir.join("memory.db");
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open index database {}", db_path.display()))?;

        // WAL keeps concurrent readers cheap
        conn.pragma_update(None, "journal_mode", "WAL")?;

        super::schema::init_schema(&conn).context("failed to initialize index schema")?;
        super::migrations::run_migrations(&conn).context("failed to run index migrations")?;

        match super::migrations::get_embedding_model(&conn)? {
            Some(stored) if stored != embedding_model => {
                tracing::warn!(
                    stored = %stored,
                    configured = %embedding_model,
                    "index was built with a different embedding model; run a rebuild"
                );
            }
            Some(_) => {}
            None => super::migrations::set_embedding_model(&conn, embedding_model)?,
        }

        tracing::info!(path = %db_path.display(), "index database opened");
        Ok(Self {
            conn,
            db_path: Some(db_path),
        })
    }

    /// Open an in-memory store for testing.
    pub fn open_in_memory() -> Result<Self> {
        load_sqlite_vec();
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        super::schema::init_schema(&conn).context("failed to initialize index schema")?;
        Ok(Self {
            conn,
            db_path: None,
        })
    }

    /// Size of the backing database file, 0 for in-memory stores.
    pub fn size_bytes(&self) -> u64 {
        self.db_path
            .as_deref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0)
    }
}

impl VectorStore for SqliteStore {
    fn upsert(&self, item: &MemoryItem, vector: &[f32]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO items (id, type, content, source, section, timestamp, indexed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
             ON CONFLICT(id) DO UPDATE SET \
                 type = excluded.type, \
                 content = excluded.content, \
                 source = excluded.source, \
                 section = excluded.section, \
                 timestamp = excluded.timestamp, \
                 indexed_at = excluded.indexed_at",
            params![
                item.id,
                item.item_type.as_str(),
                item.content,
                item.source,
                item.section,
                item.timestamp.map(|ts| ts.to_rfc3339()),
                now,
            ],
        )?;

        // vec0 has no upsert; replace the row
        self.conn
            .execute("DELETE FROM items_vec WHERE id = ?1", params![item.id])?;
        self.conn.execute(
            "INSERT INTO items_vec (id, embedding) VALUES (?1, ?2)",
            params![item.id, vector_to_bytes(vector)],
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM items WHERE id = ?1", params![id])?;
        self.conn
            .execute("DELETE FROM items_vec WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<MemoryItem>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, type, content, source, section, timestamp \
                 FROM items WHERE id = ?1",
                params![id],
                row_to_raw,
            )
            .optional()?;
        Ok(row.and_then(raw_to_item))
    }

    fn list_all(&self) -> Result<Vec<MemoryItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, type, content, source, section, timestamp FROM items ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], row_to_raw)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().filter_map(raw_to_item).collect())
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredItem>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT v.id, v.distance, i.type, i.content, i.source, i.section, i.timestamp \
             FROM (SELECT id, distance FROM items_vec \
                   WHERE embedding MATCH ?1 ORDER BY distance LIMIT ?2) v \
             JOIN items i ON i.id = v.id \
             ORDER BY v.distance",
        )?;

        let rows = stmt
            .query_map(params![vector_to_bytes(vector), k as i64], |row| {
                let distance: f64 = row.get(1)?;
                let raw = RawItem {
                    id: row.get(0)?,
                    item_type: row.get(2)?,
                    content: row.get(3)?,
                    source: row.get(4)?,
                    section: row.get(5)?,
                    timestamp: row.get(6)?,
                };
                Ok((raw, distance))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(raw, distance)| {
                raw_to_item(raw).map(|item| ScoredItem {
                    item,
                    score: similarity_from_l2(distance),
                })
            })
            .collect())
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// For L2-normalized vectors, cosine similarity = 1 - d²/2.
fn similarity_from_l2(distance: f64) -> f64 {
    1.0 - (distance * distance) / 2.0
}

/// Convert an f32 vector to raw bytes for sqlite-vec.
fn vector_to_bytes(vector: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            vector.as_ptr() as *const u8,
            vector.len() * std::mem::size_of::<f32>(),
        )
    }
}

/// An items row before type/timestamp parsing.
struct RawItem {
    id: String,
    item_type: String,
    content: String,
    source: String,
    section: Option<String>,
    timestamp: Option<String>,
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawItem> {
    Ok(RawItem {
        id: row.get(0)?,
        item_type: row.get(1)?,
        content: row.get(2)?,
        source: row.get(3)?,
        section: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

/// Parse a raw row into a MemoryItem. Malformed rows are skipped, not fatal.
fn raw_to_item(raw: RawItem) -> Option<MemoryItem> {
    let item_type = match MemoryType::from_str(&raw.item_type) {
        Ok(t) => t,
        Err(_) => {
            tracing::warn!(id = %raw.id, item_type = %raw.item_type, "skipping row with unknown type");
            return None;
        }
    };
    let timestamp = match raw.timestamp {
        Some(ts) => match DateTime::parse_from_rfc3339(&ts) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                tracing::warn!(id = %raw.id, "skipping row with malformed timestamp");
                return None;
            }
        },
        None => None,
    };
    Some(MemoryItem {
        id: raw.id,
        item_type,
        content: raw.content,
        source: raw.source,
        section: raw.section,
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::{item_id, PREAMBLE_SLOT};

    /// Unit vector along the given dimension.
    fn unit_vector(dim: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; 384];
        v[dim % 384] = 1.0;
        v
    }

    fn item(item_type: MemoryType, name: &str, content: &str) -> MemoryItem {
        MemoryItem {
            id: item_id(item_type, name, PREAMBLE_SLOT),
            item_type,
            content: content.into(),
            source: format!("{name}.md"),
            section: None,
            timestamp: None,
        }
    }

    #[test]
    fn upsert_overwrites_same_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut it = item(MemoryType::Topic, "focus", "first version");
        store.upsert(&it, &unit_vector(0)).unwrap();

        it.content = "second version".into();
        store.upsert(&it, &unit_vector(1)).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let fetched = store.get(&it.id).unwrap().unwrap();
        assert_eq!(fetched.content, "second version");

        // The vector was replaced too: nearest to dim 1, not dim 0
        let hits = store.query(&unit_vector(1), 1).unwrap();
        assert_eq!(hits[0].item.id, it.id);
        assert!(hits[0].score > 0.99);
    }

    #[test]
    fn query_ranks_by_similarity() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert(&item(MemoryType::Project, "alpha", "alpha"), &unit_vector(0))
            .unwrap();
        store
            .upsert(&item(MemoryType::Project, "beta", "beta"), &unit_vector(10))
            .unwrap();

        let hits = store.query(&unit_vector(0), 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].item.id.contains("alpha"));
        assert!(hits[0].score > hits[1].score);
        // Orthogonal normalized vectors sit at similarity ~0
        assert!(hits[1].score.abs() < 0.01);
    }

    #[test]
    fn delete_removes_metadata_and_vector() {
        let store = SqliteStore::open_in_memory().unwrap();
        let it = item(MemoryType::Person, "ada", "Ada");
        store.upsert(&it, &unit_vector(3)).unwrap();
        store.delete(&it.id).unwrap();

        assert_eq!(store.count().unwrap(), 0);
        assert!(store.get(&it.id).unwrap().is_none());
        assert!(store.query(&unit_vector(3), 5).unwrap().is_empty());

        // Deleting an absent id is fine
        store.delete(&it.id).unwrap();
    }

    #[test]
    fn list_all_is_id_ordered() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .upsert(&item(MemoryType::Topic, "zeta", "z"), &unit_vector(1))
            .unwrap();
        store
            .upsert(&item(MemoryType::Topic, "alpha", "a"), &unit_vector(2))
            .unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
    }

    #[test]
    fn timestamps_roundtrip() {
        use chrono::TimeZone;
        let store = SqliteStore::open_in_memory().unwrap();
        let ts = Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).unwrap();
        let it = MemoryItem {
            id: crate::memory::types::journal_id(ts),
            item_type: MemoryType::Journal,
            content: "[build] shipped".into(),
            source: "journal".into(),
            section: None,
            timestamp: Some(ts),
        };
        store.upsert(&it, &unit_vector(5)).unwrap();

        let fetched = store.get(&it.id).unwrap().unwrap();
        assert_eq!(fetched.timestamp, Some(ts));
    }

    #[test]
    fn open_creates_index_directory() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("does/not/exist/yet");
        let store = SqliteStore::open(&index_dir, "all-minilm").unwrap();
        assert!(index_dir.is_dir());
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.size_bytes() > 0);
    }

    #[test]
    fn similarity_conversion() {
        assert!((similarity_from_l2(0.0) - 1.0).abs() < 1e-9);
        // Orthogonal unit vectors: d = sqrt(2), similarity 0
        assert!(similarity_from_l2(std::f64::consts::SQRT_2).abs() < 1e-9);
        // Opposite unit vectors: d = 2, similarity -1
        assert!((similarity_from_l2(2.0) + 1.0).abs() < 1e-9);
    }
}
