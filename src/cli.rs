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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finguard")]
#[command(version)]
#[command(about = "Retrieval and guardrail pipeline that grounds financial advice in verified sources", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a document (PDF, text, markdown or JSON) into the knowledge base
    Ingest {
        /// Path to the document to ingest
        path: PathBuf,

        /// Human-readable source name (e.g. regulator or publisher)
        #[arg(short, long)]
        source: String,

        /// Document type, selects the target collection
        #[arg(short = 't', long, default_value = "financial_docs")]
        doc_type: String,
    },

    /// Retrieve knowledge base chunks relevant to a query
    Retrieve {
        /// Query text
        query: String,

        /// Maximum number of hits to return across all collections;
        /// defaults to the configured search.max_results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Fact-check a drafted advice response against the knowledge base
    FactCheck {
        /// The drafted response text to verify
        response: String,

        /// The user query the response answers
        #[arg(short, long)]
        query: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Draft a grounded answer and attach a verification report
    Answer {
        /// Query text
        query: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show knowledge base statistics
    Stats,

    /// Remove a previously ingested document
    Forget {
        /// Document id to remove (shown at ingestion time)
        document_id: String,
    },
}
