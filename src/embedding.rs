// Copyright 2026 Finguard Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::EmbeddingConfig;

/// Capability interface for mapping text to fixed-length vectors.
///
/// Absence of a provider (see [`create_embedding_provider`]) switches the
/// whole pipeline to the fallback keyword store; nothing upstream may
/// require this capability unconditionally.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts using batch requests
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

/// Create embedding provider from config.
///
/// Returns `None` when no endpoint is configured, which signals the
/// caller to route through the fallback keyword store.
pub fn create_embedding_provider(
    config: &EmbeddingConfig,
) -> Option<Arc<dyn EmbeddingProvider>> {
    if config.endpoint.trim().is_empty() {
        return None;
    }

    let api_key = std::env::var(&config.api_key_env).ok();
    Some(Arc::new(HttpEmbeddingProvider::new(
        config.endpoint.clone(),
        config.model.clone(),
        api_key,
        config.batch_size,
    )))
}

/// Embedding provider backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbeddingProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    batch_size: usize,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        batch_size: usize,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Finguard/0.1")
            .build()
            .unwrap_or_default();

        Self {
            endpoint,
            model,
            api_key,
            batch_size: batch_size.max(1),
            client,
        }
    }

    async fn request(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: &self.model,
            input,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach embedding endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Embedding endpoint returned HTTP {}", response.status());
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        if parsed.data.len() != input.len() {
            anyhow::bail!(
                "Embedding endpoint returned {} vectors for {} inputs",
                parsed.data.len(),
                input.len()
            );
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let vectors = self.request(&input).await?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Embedding endpoint returned no vector"))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let mut vectors = self.request(batch).await?;
            all.append(&mut vectors);
        }
        Ok(all)
    }
}
