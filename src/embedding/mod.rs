//! Text-to-vector embedding providers.
//!
//! Provides the [`EmbeddingProvider`] trait and two implementations: an HTTP
//! client for an Ollama/OpenAI-compatible endpoint, and a deterministic
//! offline token-hash projection. Providers are created via
//! [`create_provider`] from configuration.

pub mod hashed;
pub mod http;

use anyhow::Result;
use async_trait::async_trait;

/// Number of dimensions every provider produces.
pub const EMBEDDING_DIM: usize = 384;

/// Trait for embedding text into vectors.
///
/// Implementations produce L2-normalized vectors of exactly [`EMBEDDING_DIM`]
/// dimensions, identical for identical input within one deployment. Failures
/// surface as errors with no retry built in — retry policy belongs to the
/// caller.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of text strings. Implementations may override for
    /// batched requests.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Return the number of dimensions this provider produces.
    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Create an embedding provider from config.
///
/// `"hashed"` needs no model files or network; `"http"` talks to the
/// configured endpoint.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "hashed" => Ok(Box::new(hashed::HashedEmbeddingProvider::new())),
        "http" => Ok(Box::new(http::HttpEmbeddingProvider::new(
            &config.endpoint,
            &config.model,
        ))),
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: hashed, http"),
    }
}

/// L2-normalize a vector. Returns a zero vector if the input norm is zero.
pub(crate) fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}
