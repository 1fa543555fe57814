//! HTTP embedding provider.
//!
//! Client for an Ollama-style `/api/embed` endpoint (also served by
//! OpenAI-compatible gateways). The service is a black box: one request per
//! embed/embed_batch call, dimensionality checked on receipt, failures
//! propagated without retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{l2_normalize, EmbeddingProvider, EMBEDDING_DIM};

/// Per-request timeout. Batch rebuilds can push large inputs through one call.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Embedding client for an Ollama/OpenAI-compatible endpoint.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpEmbeddingProvider {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.endpoint);
        let body = json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("embedding service unreachable at {}", self.endpoint))?;

        anyhow::ensure!(
            response.status().is_success(),
            "embedding request failed with HTTP {}",
            response.status()
        );

        let payload: Value = response
            .json()
            .await
            .context("invalid JSON from embedding service")?;

        let rows = payload["embeddings"]
            .as_array()
            .context("no 'embeddings' array in embedding response")?;
        anyhow::ensure!(
            rows.len() == texts.len(),
            "embedding service returned {} vectors for {} inputs",
            rows.len(),
            texts.len()
        );

        let mut vectors = Vec::with_capacity(rows.len());
        for row in rows {
            let vector: Vec<f32> = row
                .as_array()
                .context("embedding row is not an array")?
                .iter()
                .filter_map(|v| v.as_f64().map(|f| f as f32))
                .collect();
            anyhow::ensure!(
                vector.len() == EMBEDDING_DIM,
                "embedding service returned {} dimensions, expected {EMBEDDING_DIM}",
                vector.len()
            );
            vectors.push(l2_normalize(&vector));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.request(&[text]).await?;
        Ok(vectors.pop().expect("one vector for one input"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }
}
