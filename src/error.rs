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

use std::path::PathBuf;
use thiserror::Error;

/// Tagged failure kinds of the retrieval and guardrail pipeline.
///
/// Failures are contained at the smallest possible scope: extraction and
/// ingestion failures affect a single document, a failing collection query
/// is skipped during retrieval, and the fact-check orchestrator converts
/// any of these into a conservative report instead of propagating.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file was unreadable or of an unsupported format and yielded no text.
    #[error("no text could be extracted from {}", path.display())]
    Extraction { path: PathBuf },

    /// No embedding provider is configured; the vector retrieval path
    /// cannot run.
    #[error("no embedding provider configured")]
    EmbeddingUnavailable,

    /// The embedding service rejected or failed a request.
    #[error("embedding request failed: {0}")]
    Embedding(anyhow::Error),

    /// The vector index could not be opened or written.
    #[error("chunk index unavailable: {0}")]
    IndexUnavailable(anyhow::Error),

    /// A single collection's query failed; other collections are still
    /// searched.
    #[error("query against collection '{}' failed: {}", collection, reason)]
    Collection {
        collection: String,
        reason: anyhow::Error,
    },

    /// Reading or writing the flat-file fallback store failed.
    #[error("fallback store at {} failed: {}", path.display(), reason)]
    FallbackIo {
        path: PathBuf,
        reason: anyhow::Error,
    },
}
