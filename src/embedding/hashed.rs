//! Deterministic token-hash embedding provider.
//!
//! A training-free projection: each lowercase alphanumeric token hashes to a
//! handful of signed dimensions, token contributions are summed, and the
//! result is L2-normalized. No model files, no network, identical output on
//! every platform.
//!
//! Texts sharing vocabulary land near each other (shared tokens contribute
//! identical components), which is exactly what offline operation and tests
//! need from a similarity signal. It is not a substitute for a learned model
//! when real semantic quality matters — configure the `http` provider for
//! that.

use anyhow::Result;
use async_trait::async_trait;

use super::{l2_normalize, EmbeddingProvider, EMBEDDING_DIM};

/// Signed dimensions each token contributes to.
const SPREAD: usize = 3;

/// Deterministic offline embedding provider.
pub struct HashedEmbeddingProvider;

impl HashedEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }

    fn project(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        for token in tokenize(text) {
            let mut h = fnv1a(token.as_bytes());
            for _ in 0..SPREAD {
                h = splitmix(h);
                let dim = ((h >> 8) % EMBEDDING_DIM as u64) as usize;
                let sign = if h & 1 == 0 { 1.0 } else { -1.0 };
                v[dim] += sign;
            }
        }
        l2_normalize(&v)
    }
}

impl Default for HashedEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashedEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.project(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.project(t)).collect())
    }
}

/// Lowercase alphanumeric tokens.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// FNV-1a 64-bit — stable across platforms, unlike the std hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// SplitMix64 step, used to derive independent dimensions from one token hash.
fn splitmix(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
