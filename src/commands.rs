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

use anyhow::Result;
use std::sync::Arc;

use crate::cli::Commands;
use crate::config::Config;
use crate::formatting;
use crate::kb::manager::KnowledgeManager;
use crate::verify::FactChecker;

pub async fn execute(config: &Config, command: Commands) -> Result<()> {
    let knowledge = Arc::new(KnowledgeManager::new(config).await?);

    match command {
        Commands::Ingest {
            path,
            source,
            doc_type,
        } => {
            let result = knowledge.ingest(&path, &source, &doc_type).await?;
            println!(
                "Ingested {} as document {} ({} chunks into '{}')",
                path.display(),
                result.document_id,
                result.chunks_created,
                result.collection
            );
        }

        Commands::Retrieve {
            query,
            top_k,
            format,
        } => {
            let top_k = top_k.unwrap_or(config.search.max_results);
            let hits = knowledge.retrieve(&query, top_k).await?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                println!("{}", formatting::format_hits(&hits));
            }
        }

        Commands::FactCheck {
            response,
            query,
            format,
        } => {
            let checker = FactChecker::new(config, knowledge)?;
            let report = checker.fact_check(&response, &query).await;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", formatting::format_report(&report));
            }
        }

        Commands::Answer { query, format } => {
            let checker = FactChecker::new(config, knowledge)?;
            let answer = checker.answer_with_verification(&query, None).await;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", formatting::format_rag_response(&answer));
            }
        }

        Commands::Stats => {
            let stats = knowledge.stats().await?;
            println!("{}", formatting::format_stats(&stats));
        }

        Commands::Forget { document_id } => {
            if knowledge.delete_document(&document_id).await? {
                println!("Removed document {}", document_id);
            } else {
                println!("No document found with id {}", document_id);
            }
        }
    }

    Ok(())
}
