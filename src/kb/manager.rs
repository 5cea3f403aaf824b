use anyhow::Result;
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::embedding::{self, EmbeddingProvider};
use crate::error::PipelineError;
use crate::kb::chunker::TextChunker;
use crate::kb::extract;
use crate::kb::fallback::FallbackStore;
use crate::kb::store::{resolve_collection, VectorStore, COLLECTIONS};
use crate::kb::types::{IngestResult, KnowledgeStats, RetrievalHit};

/// Which chunk index backs the knowledge base. Selected once at
/// construction: the vector backend requires an embedding provider, the
/// fallback keyword store requires nothing.
enum Backend {
    Vector {
        store: VectorStore,
        provider: Arc<dyn EmbeddingProvider>,
    },
    Fallback(FallbackStore),
}

/// Owns ingestion and retrieval over the chunk index.
pub struct KnowledgeManager {
    chunker: TextChunker,
    backend: Backend,
}

impl KnowledgeManager {
    pub async fn new(config: &Config) -> Result<Self> {
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);

        let backend = match embedding::create_embedding_provider(&config.embedding) {
            Some(provider) => {
                // Probe the vector dimension with a short text, as the
                // index schema is fixed at creation.
                match provider.embed("test").await {
                    Ok(probe) => match VectorStore::new(probe.len()).await {
                        Ok(store) => Backend::Vector { store, provider },
                        Err(e) => {
                            tracing::warn!(error = %e, "chunk index unavailable, using fallback keyword store");
                            Backend::Fallback(FallbackStore::at_default_location()?)
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "embedding provider unreachable, using fallback keyword store");
                        Backend::Fallback(FallbackStore::at_default_location()?)
                    }
                }
            }
            None => {
                tracing::info!("no embedding provider configured, using fallback keyword store");
                Backend::Fallback(FallbackStore::at_default_location()?)
            }
        };

        Ok(Self { chunker, backend })
    }

    /// Build a manager over an explicit fallback store, bypassing
    /// provider discovery.
    pub fn with_fallback(chunker: TextChunker, store: FallbackStore) -> Self {
        Self {
            chunker,
            backend: Backend::Fallback(store),
        }
    }

    /// Ingest a single document: extract, chunk, embed (vector backend
    /// only) and store. A failure here degrades only this document.
    pub async fn ingest(
        &self,
        path: &Path,
        source: &str,
        doc_type: &str,
    ) -> Result<IngestResult, PipelineError> {
        let text = extract::extract_text(path);
        if text.trim().is_empty() {
            return Err(PipelineError::Extraction {
                path: path.to_path_buf(),
            });
        }

        let chunks = self.chunker.split(&text);
        let document_id = document_id(path, source);

        let result = match &self.backend {
            Backend::Vector { store, provider } => {
                let embeddings = provider
                    .embed_batch(chunks.clone())
                    .await
                    .map_err(PipelineError::Embedding)?;

                let collection = resolve_collection(doc_type);
                store
                    .store_chunks(collection, &document_id, source, doc_type, &chunks, &embeddings)
                    .await
                    .map_err(PipelineError::IndexUnavailable)?;

                IngestResult {
                    document_id,
                    chunks_created: chunks.len(),
                    collection: collection.to_string(),
                }
            }
            Backend::Fallback(fallback) => {
                fallback
                    .add_document(&document_id, source, doc_type, &chunks)
                    .map_err(|e| PipelineError::FallbackIo {
                        path: fallback.path().to_path_buf(),
                        reason: e,
                    })?;

                IngestResult {
                    document_id,
                    chunks_created: chunks.len(),
                    collection: "fallback".to_string(),
                }
            }
        };

        tracing::info!(
            path = %path.display(),
            chunks = result.chunks_created,
            collection = %result.collection,
            "document ingested"
        );
        Ok(result)
    }

    /// Retrieve the `top_k` chunks most relevant to a query across all
    /// collections. One collection failing does not abort the others; an
    /// empty knowledge base yields an empty list.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalHit>, PipelineError> {
        let hits = match &self.backend {
            Backend::Vector { store, provider } => {
                let query_embedding = provider
                    .embed(query)
                    .await
                    .map_err(PipelineError::Embedding)?;

                let mut all = Vec::new();
                for collection in COLLECTIONS {
                    match store.search(collection, &query_embedding, top_k).await {
                        Ok(mut hits) => all.append(&mut hits),
                        Err(e) => {
                            // Partial failure: skip this collection,
                            // keep the rest.
                            let err = PipelineError::Collection {
                                collection: collection.to_string(),
                                reason: e,
                            };
                            tracing::warn!(error = %err, "collection search failed");
                        }
                    }
                }
                all
            }
            Backend::Fallback(fallback) => {
                fallback.search(query).map_err(|e| PipelineError::FallbackIo {
                    path: fallback.path().to_path_buf(),
                    reason: e,
                })?
            }
        };

        Ok(merge_and_rank(hits, top_k))
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<bool, PipelineError> {
        match &self.backend {
            Backend::Vector { store, .. } => {
                store
                    .delete_document(document_id)
                    .await
                    .map_err(PipelineError::IndexUnavailable)?;
                Ok(true)
            }
            Backend::Fallback(fallback) => {
                fallback
                    .delete_document(document_id)
                    .map_err(|e| PipelineError::FallbackIo {
                        path: fallback.path().to_path_buf(),
                        reason: e,
                    })
            }
        }
    }

    pub async fn stats(&self) -> Result<KnowledgeStats, PipelineError> {
        match &self.backend {
            Backend::Vector { store, .. } => {
                store.stats().await.map_err(PipelineError::IndexUnavailable)
            }
            Backend::Fallback(fallback) => {
                fallback.stats().map_err(|e| PipelineError::FallbackIo {
                    path: fallback.path().to_path_buf(),
                    reason: e,
                })
            }
        }
    }
}

/// Sort hits by similarity descending and keep `top_k` overall, not per
/// collection.
fn merge_and_rank(mut hits: Vec<RetrievalHit>, top_k: usize) -> Vec<RetrievalHit> {
    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    hits.truncate(top_k);
    hits
}

/// Stable document identity derived from the ingestion path and source
/// name. Re-ingesting the same pair supersedes the earlier entry.
pub fn document_id(path: &Path, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(b"_");
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::types::HitMetadata;

    fn hit(similarity: f32, collection: &str) -> RetrievalHit {
        RetrievalHit {
            content: "text".to_string(),
            metadata: HitMetadata {
                source: "RBI".to_string(),
                doc_type: "regulations".to_string(),
                chunk_index: 0,
            },
            similarity,
            collection: collection.to_string(),
        }
    }

    #[test]
    fn test_merge_ranks_across_collections() {
        let hits = vec![
            hit(0.4, "faq"),
            hit(0.9, "regulations"),
            hit(0.6, "financial_docs"),
        ];

        let ranked = merge_and_rank(hits, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].similarity, 0.9);
        assert_eq!(ranked[1].similarity, 0.6);
    }

    #[test]
    fn test_merge_truncates_overall_not_per_collection() {
        let hits = vec![hit(0.9, "faq"), hit(0.8, "faq"), hit(0.7, "regulations")];
        let ranked = merge_and_rank(hits, 2);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|h| h.similarity >= 0.8));
    }

    #[test]
    fn test_document_id_is_stable_and_distinct() {
        let a = document_id(Path::new("/docs/rates.pdf"), "RBI");
        let b = document_id(Path::new("/docs/rates.pdf"), "RBI");
        let c = document_id(Path::new("/docs/rates.pdf"), "SEBI");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }
}
