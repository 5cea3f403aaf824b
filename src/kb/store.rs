use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

// Arrow imports
use arrow_array::{
    FixedSizeListArray, Float32Array, Int32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};

// LanceDB imports
use futures::TryStreamExt;
use lancedb::{
    connect,
    query::{ExecutableQuery, QueryBase},
    Connection, DistanceType,
};

use crate::kb::types::{HitMetadata, KnowledgeStats, RetrievalHit};

/// Collections grouping chunks by document type. The first entry is the
/// catch-all for unrecognized types.
pub const COLLECTIONS: [&str; 3] = ["financial_docs", "regulations", "faq"];

/// Map a document type to its collection, defaulting to the catch-all.
pub fn resolve_collection(doc_type: &str) -> &'static str {
    COLLECTIONS
        .iter()
        .find(|name| **name == doc_type)
        .copied()
        .unwrap_or(COLLECTIONS[0])
}

/// LanceDB-backed chunk index, one table per collection.
pub struct VectorStore {
    db: Connection,
    vector_dim: usize,
}

impl VectorStore {
    fn quote_filter_string(input: &str) -> String {
        input.replace('\'', "''")
    }

    pub async fn new(vector_dim: usize) -> Result<Self> {
        let db_path = crate::storage::get_index_dir()?;
        std::fs::create_dir_all(&db_path)?;

        let db = connect(db_path.to_str().unwrap()).execute().await?;

        let store = Self { db, vector_dim };
        store.initialize_tables().await?;

        Ok(store)
    }

    fn chunk_schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("document_id", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("doc_type", DataType::Utf8, false),
            Field::new("chunk_index", DataType::Int32, false),
            Field::new("content", DataType::Utf8, false),
            Field::new("ingested_at", DataType::Utf8, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    self.vector_dim as i32,
                ),
                false,
            ),
        ]))
    }

    async fn initialize_tables(&self) -> Result<()> {
        let table_names = self.db.table_names().execute().await?;

        for collection in COLLECTIONS {
            if !table_names.contains(&collection.to_string()) {
                self.db
                    .create_empty_table(collection, self.chunk_schema())
                    .execute()
                    .await?;
            }
        }

        Ok(())
    }

    /// Store a document's chunks in a collection. Existing chunks for the
    /// same document id are deleted first, so re-ingestion supersedes
    /// rather than duplicates.
    pub async fn store_chunks(
        &self,
        collection: &str,
        document_id: &str,
        source: &str,
        doc_type: &str,
        chunks: &[String],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        anyhow::ensure!(
            chunks.len() == embeddings.len(),
            "chunk/embedding count mismatch: {} vs {}",
            chunks.len(),
            embeddings.len()
        );

        let table = self.db.open_table(collection).execute().await?;
        table
            .delete(&format!(
                "document_id = '{}'",
                Self::quote_filter_string(document_id)
            ))
            .await?;

        if chunks.is_empty() {
            return Ok(());
        }

        let ingested_at = Utc::now().to_rfc3339();

        let ids: Vec<String> = (0..chunks.len())
            .map(|i| format!("{}_chunk_{}", document_id, i))
            .collect();
        let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
        let document_ids: Vec<&str> = chunks.iter().map(|_| document_id).collect();
        let sources: Vec<&str> = chunks.iter().map(|_| source).collect();
        let doc_types: Vec<&str> = chunks.iter().map(|_| doc_type).collect();
        let chunk_indices: Vec<i32> = (0..chunks.len() as i32).collect();
        let contents: Vec<&str> = chunks.iter().map(|c| c.as_str()).collect();
        let ingested_ats: Vec<&str> = chunks.iter().map(|_| ingested_at.as_str()).collect();

        let embedding_values: Vec<f32> =
            embeddings.iter().flat_map(|e| e.iter().copied()).collect();
        let embedding_array = FixedSizeListArray::try_new(
            Arc::new(Field::new("item", DataType::Float32, true)),
            self.vector_dim as i32,
            Arc::new(Float32Array::from(embedding_values)),
            None,
        )?;

        let schema = self.chunk_schema();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(id_refs)),
                Arc::new(StringArray::from(document_ids)),
                Arc::new(StringArray::from(sources)),
                Arc::new(StringArray::from(doc_types)),
                Arc::new(Int32Array::from(chunk_indices)),
                Arc::new(StringArray::from(contents)),
                Arc::new(StringArray::from(ingested_ats)),
                Arc::new(embedding_array),
            ],
        )?;

        let batches = std::iter::once(Ok(batch));
        let batch_reader = RecordBatchIterator::new(batches, schema);
        table.add(batch_reader).execute().await?;

        Ok(())
    }

    /// Nearest-neighbor search within one collection. Similarity is
    /// exposed as 1 - cosine distance, clamped to [0, 1].
    pub async fn search(
        &self,
        collection: &str,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalHit>> {
        let table = self.db.open_table(collection).execute().await?;

        let query = table
            .vector_search(query_embedding)?
            .distance_type(DistanceType::Cosine)
            .limit(top_k);

        let mut results = query.execute().await?;
        let mut hits = Vec::new();

        while let Some(batch) = results.try_next().await? {
            if batch.num_rows() == 0 {
                continue;
            }

            let sources = batch
                .column_by_name("source")
                .unwrap()
                .as_any()
                .downcast_ref::<StringArray>()
                .unwrap();
            let doc_types = batch
                .column_by_name("doc_type")
                .unwrap()
                .as_any()
                .downcast_ref::<StringArray>()
                .unwrap();
            let chunk_indices = batch
                .column_by_name("chunk_index")
                .unwrap()
                .as_any()
                .downcast_ref::<Int32Array>()
                .unwrap();
            let contents = batch
                .column_by_name("content")
                .unwrap()
                .as_any()
                .downcast_ref::<StringArray>()
                .unwrap();
            let distances = batch
                .column_by_name("_distance")
                .unwrap()
                .as_any()
                .downcast_ref::<Float32Array>()
                .unwrap();

            for i in 0..batch.num_rows() {
                let similarity = (1.0 - distances.value(i)).clamp(0.0, 1.0);

                hits.push(RetrievalHit {
                    content: contents.value(i).to_string(),
                    metadata: HitMetadata {
                        source: sources.value(i).to_string(),
                        doc_type: doc_types.value(i).to_string(),
                        chunk_index: chunk_indices.value(i) as usize,
                    },
                    similarity,
                    collection: collection.to_string(),
                });
            }
        }

        Ok(hits)
    }

    /// Remove a document's chunks from every collection.
    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        for collection in COLLECTIONS {
            let table = self.db.open_table(collection).execute().await?;
            table
                .delete(&format!(
                    "document_id = '{}'",
                    Self::quote_filter_string(document_id)
                ))
                .await?;
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<KnowledgeStats> {
        let mut collections = Vec::new();
        let mut total_chunks = 0;
        let mut unique_documents = std::collections::HashSet::new();
        let mut newest: Option<DateTime<Utc>> = None;

        for collection in COLLECTIONS {
            let table = self.db.open_table(collection).execute().await?;
            let count = table.count_rows(None).await?;
            total_chunks += count;
            collections.push((collection.to_string(), count));

            if count == 0 {
                continue;
            }

            let results = table.query().execute().await?;
            let batches: Vec<RecordBatch> = results.try_collect().await?;

            for batch in batches {
                let document_ids = batch
                    .column_by_name("document_id")
                    .unwrap()
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .unwrap();
                let ingested_ats = batch
                    .column_by_name("ingested_at")
                    .unwrap()
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .unwrap();

                for i in 0..batch.num_rows() {
                    unique_documents.insert(document_ids.value(i).to_string());

                    if let Ok(ingested) =
                        DateTime::parse_from_rfc3339(ingested_ats.value(i))
                    {
                        let ingested = ingested.with_timezone(&Utc);
                        if newest.is_none_or(|n| ingested > n) {
                            newest = Some(ingested);
                        }
                    }
                }
            }
        }

        Ok(KnowledgeStats {
            backend: "vector".to_string(),
            total_documents: unique_documents.len(),
            total_chunks,
            collections,
            newest_ingested: newest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_doc_types_map_to_their_collection() {
        assert_eq!(resolve_collection("regulations"), "regulations");
        assert_eq!(resolve_collection("faq"), "faq");
        assert_eq!(resolve_collection("financial_docs"), "financial_docs");
    }

    #[test]
    fn test_unknown_doc_type_maps_to_catch_all() {
        assert_eq!(resolve_collection("newsletter"), "financial_docs");
        assert_eq!(resolve_collection(""), "financial_docs");
    }

    #[test]
    fn test_filter_quoting() {
        assert_eq!(VectorStore::quote_filter_string("a'b"), "a''b");
    }
}
