use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::FALLBACK_SIMILARITY;
use crate::kb::types::{HitMetadata, KnowledgeStats, RetrievalHit};

/// Flat-file keyword store used when no embedding provider is configured.
///
/// Persistence is a full-file read / mutate-in-memory / overwrite cycle
/// per operation. This is NOT safe under concurrent writers: two
/// simultaneous ingestions can lose an update (last write wins). That is
/// an accepted limitation of this degraded-mode path; ingestion is an
/// infrequent administrative task expected to run sequentially.
pub struct FallbackStore {
    path: PathBuf,
}

/// One ingested document as persisted in the fallback file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackDocument {
    pub source: String,
    pub doc_type: String,
    pub chunks: Vec<String>,
    pub ingested_at: String,
}

type FallbackDocs = BTreeMap<String, FallbackDocument>;

impl FallbackStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(crate::storage::get_fallback_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<FallbackDocs> {
        if !self.path.exists() {
            return Ok(FallbackDocs::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Corrupt fallback store at {}", self.path.display()))
    }

    fn save(&self, docs: &FallbackDocs) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(docs)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Insert or replace a document. Re-ingestion under the same id
    /// supersedes the previous entry.
    pub fn add_document(
        &self,
        document_id: &str,
        source: &str,
        doc_type: &str,
        chunks: &[String],
    ) -> Result<()> {
        let mut docs = self.load()?;
        docs.insert(
            document_id.to_string(),
            FallbackDocument {
                source: source.to_string(),
                doc_type: doc_type.to_string(),
                chunks: chunks.to_vec(),
                ingested_at: Utc::now().to_rfc3339(),
            },
        );
        self.save(&docs)
    }

    pub fn delete_document(&self, document_id: &str) -> Result<bool> {
        let mut docs = self.load()?;
        let removed = docs.remove(document_id).is_some();
        if removed {
            self.save(&docs)?;
        }
        Ok(removed)
    }

    /// Keyword scan: a chunk matches when any lowercased query token
    /// appears in its lowercased text. Matches carry a fixed nominal
    /// similarity since no ranking signal exists here.
    pub fn search(&self, query: &str) -> Result<Vec<RetrievalHit>> {
        let docs = self.load()?;
        let query_lower = query.to_lowercase();
        let tokens: Vec<&str> = query_lower.split_whitespace().collect();

        let mut hits = Vec::new();
        if tokens.is_empty() {
            return Ok(hits);
        }

        for doc in docs.values() {
            for (index, chunk) in doc.chunks.iter().enumerate() {
                let chunk_lower = chunk.to_lowercase();
                if tokens.iter().any(|token| chunk_lower.contains(token)) {
                    hits.push(RetrievalHit {
                        content: chunk.clone(),
                        metadata: HitMetadata {
                            source: doc.source.clone(),
                            doc_type: doc.doc_type.clone(),
                            chunk_index: index,
                        },
                        similarity: FALLBACK_SIMILARITY,
                        collection: "fallback".to_string(),
                    });
                }
            }
        }

        Ok(hits)
    }

    pub fn stats(&self) -> Result<KnowledgeStats> {
        let docs = self.load()?;
        let total_chunks = docs.values().map(|d| d.chunks.len()).sum();
        let newest = docs
            .values()
            .filter_map(|d| chrono::DateTime::parse_from_rfc3339(&d.ingested_at).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .max();

        Ok(KnowledgeStats {
            backend: "fallback".to_string(),
            total_documents: docs.len(),
            total_chunks,
            collections: Vec::new(),
            newest_ingested: newest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FallbackStore {
        FallbackStore::new(dir.path().join("fallback_docs.json"))
    }

    #[test]
    fn test_empty_store_returns_no_hits() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.search("fixed deposit").unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_and_keyword_match() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .add_document(
                "doc1",
                "RBI",
                "regulations",
                &[
                    "Fixed deposit interest rates are set by banks.".to_string(),
                    "Savings accounts earn lower interest.".to_string(),
                ],
            )
            .unwrap();

        let hits = store.search("deposit").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.source, "RBI");
        assert_eq!(hits[0].metadata.chunk_index, 0);
        assert_eq!(hits[0].similarity, FALLBACK_SIMILARITY);
        assert_eq!(hits[0].collection, "fallback");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .add_document("doc1", "SEBI", "faq", &["Mutual Funds carry market risk.".to_string()])
            .unwrap();

        let hits = store.search("MUTUAL").unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_reingestion_supersedes_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .add_document("doc1", "RBI", "regulations", &["old text".to_string()])
            .unwrap();
        store
            .add_document(
                "doc1",
                "RBI",
                "regulations",
                &["new deposit text".to_string()],
            )
            .unwrap();

        assert!(store.search("old").unwrap().is_empty());
        assert_eq!(store.search("deposit").unwrap().len(), 1);

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.total_chunks, 1);
    }

    #[test]
    fn test_delete_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .add_document("doc1", "RBI", "regulations", &["deposit text".to_string()])
            .unwrap();

        assert!(store.delete_document("doc1").unwrap());
        assert!(!store.delete_document("doc1").unwrap());
        assert!(store.search("deposit").unwrap().is_empty());
    }

    #[test]
    fn test_persisted_schema_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .add_document("doc1", "RBI", "regulations", &["text".to_string()])
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value["doc1"];
        assert_eq!(entry["source"], "RBI");
        assert_eq!(entry["doc_type"], "regulations");
        assert!(entry["chunks"].is_array());
        assert!(entry["ingested_at"].is_string());
    }
}
