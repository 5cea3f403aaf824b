pub mod drafter;
pub mod nlu;
mod report_tests;
pub mod types;

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::constants::{
    CONFIDENCE_CAP, CONTEXT_SOURCES, DEFAULT_TOP_K, FACT_CHECK_TOP_K, PREVIEW_CHARS,
    VERIFICATION_THRESHOLD,
};
use crate::guardrail::disclaimer::DisclaimerAssembler;
use crate::guardrail::risk::RiskClassifier;
use crate::guardrail::Policy;
use crate::kb::manager::KnowledgeManager;
use crate::kb::types::RetrievalHit;

use drafter::{ResponseDrafter, TemplateDrafter};
use nlu::NluClient;
use types::{FactCheckReport, RagResponse, SourceRef};

const PROFESSIONAL_WARNING: &str =
    "This topic requires professional consultation. Please verify with certified experts.";

/// Composes retrieval, risk classification, disclaimer assembly and
/// optional NLU enrichment into one verification report per request.
///
/// Nothing below this boundary raises: callers always receive a
/// well-formed report, degraded if necessary.
pub struct FactChecker {
    knowledge: Arc<KnowledgeManager>,
    classifier: RiskClassifier,
    assembler: DisclaimerAssembler,
    nlu: Option<NluClient>,
    drafter: Box<dyn ResponseDrafter>,
}

impl FactChecker {
    pub fn new(config: &Config, knowledge: Arc<KnowledgeManager>) -> Result<Self> {
        let policy = Policy::embedded()?;

        Ok(Self {
            knowledge,
            classifier: RiskClassifier::new(&policy),
            assembler: DisclaimerAssembler::new(&policy),
            nlu: NluClient::from_config(&config.nlu),
            drafter: Box::new(TemplateDrafter),
        })
    }

    /// Swap in an external drafting component.
    pub fn with_drafter(mut self, drafter: Box<dyn ResponseDrafter>) -> Self {
        self.drafter = drafter;
        self
    }

    /// Fact-check a drafted response against the knowledge base.
    pub async fn fact_check(&self, response: &str, query: &str) -> FactCheckReport {
        match self.fact_check_inner(response, query).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "fact-checking failed, returning conservative report");
                FactCheckReport::degraded()
            }
        }
    }

    async fn fact_check_inner(&self, response: &str, query: &str) -> Result<FactCheckReport> {
        let hits = self.knowledge.retrieve(query, FACT_CHECK_TOP_K).await?;

        let sources = hits.iter().map(source_ref).collect();
        let (verified, confidence) = score_confidence(&hits);

        let risk_level = self.classifier.classify(query, response);
        let disclaimers = self.assembler.assemble(query, response, risk_level);

        let mut warnings = Vec::new();
        if risk_level.requires_warning() {
            warnings.push(PROFESSIONAL_WARNING.to_string());
        }

        let nlu_analysis = match &self.nlu {
            Some(client) => Some(client.analyze(response).await),
            None => None,
        };

        Ok(FactCheckReport {
            verified,
            confidence,
            sources,
            risk_level,
            disclaimers,
            warnings,
            nlu_analysis,
        })
    }

    /// Draft a grounded answer, verify it, and fold high-risk
    /// disclaimers into the response text itself.
    pub async fn answer_with_verification(
        &self,
        query: &str,
        user_context: Option<&Value>,
    ) -> RagResponse {
        match self.answer_inner(query, user_context).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "answer generation failed, returning canned response");
                RagResponse::degraded(query)
            }
        }
    }

    async fn answer_inner(&self, query: &str, user_context: Option<&Value>) -> Result<RagResponse> {
        let hits = self.knowledge.retrieve(query, DEFAULT_TOP_K).await?;

        let context_text = build_context(&hits);
        let mut response = self.drafter.draft(query, &context_text, user_context).await?;

        let fact_check = self.fact_check(&response, query).await;

        if fact_check.risk_level.requires_warning() {
            response.push_str("\n\n");
            response.push_str(&fact_check.disclaimers.join(" "));
        }

        Ok(RagResponse {
            response,
            context_used: !hits.is_empty(),
            sources: hits,
            fact_check,
            generated_at: Utc::now(),
            query: query.to_string(),
        })
    }
}

/// Confidence scoring over the supporting hits.
///
/// The verification decision uses the uncapped mean similarity; the cap
/// applies only to the displayed confidence. Threshold before cap.
pub(crate) fn score_confidence(hits: &[RetrievalHit]) -> (bool, f32) {
    if hits.is_empty() {
        return (false, 0.0);
    }

    let raw = hits.iter().map(|h| h.similarity).sum::<f32>() / hits.len() as f32;
    (raw > VERIFICATION_THRESHOLD, raw.min(CONFIDENCE_CAP))
}

pub(crate) fn source_ref(hit: &RetrievalHit) -> SourceRef {
    let preview: String = hit.content.chars().take(PREVIEW_CHARS).collect();
    let content_preview = if hit.content.chars().count() > PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    };

    SourceRef {
        source: hit.metadata.source.clone(),
        similarity: hit.similarity,
        content_preview,
    }
}

/// Context string handed to the drafting component, built from the top
/// hits with their source names attached.
pub(crate) fn build_context(hits: &[RetrievalHit]) -> String {
    hits.iter()
        .take(CONTEXT_SOURCES)
        .map(|hit| format!("Source: {}\n{}", hit.metadata.source, hit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
