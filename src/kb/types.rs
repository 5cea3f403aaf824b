use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single retrieval result. Ephemeral, produced per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub content: String,
    pub metadata: HitMetadata,
    /// Similarity in [0, 1]; vector hits use 1 - cosine distance,
    /// fallback hits carry a fixed nominal score.
    pub similarity: f32,
    pub collection: String,
}

/// Provenance metadata attached to every hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitMetadata {
    pub source: String,
    pub doc_type: String,
    pub chunk_index: usize,
}

/// Result of ingesting one document.
#[derive(Debug, Clone)]
pub struct IngestResult {
    pub document_id: String,
    pub chunks_created: usize,
    pub collection: String,
}

/// Statistics about the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeStats {
    pub backend: String,
    pub total_documents: usize,
    pub total_chunks: usize,
    /// Chunk counts per collection; empty for the fallback backend.
    pub collections: Vec<(String, usize)>,
    pub newest_ingested: Option<DateTime<Utc>>,
}
