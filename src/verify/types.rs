use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::guardrail::risk::RiskLevel;
use crate::kb::types::RetrievalHit;
use crate::verify::nlu::NluAnalysis;

/// Verification report attached to a drafted advice response.
/// Built fresh per request; never persisted by this subsystem.
#[derive(Debug, Clone, Serialize)]
pub struct FactCheckReport {
    pub verified: bool,
    /// Displayed confidence, capped at 0.95. The verification decision
    /// itself uses the uncapped mean similarity.
    pub confidence: f32,
    pub sources: Vec<SourceRef>,
    pub risk_level: RiskLevel,
    pub disclaimers: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nlu_analysis: Option<NluAnalysis>,
}

impl FactCheckReport {
    /// Conservative default returned when fact-checking itself fails.
    pub fn degraded() -> Self {
        Self {
            verified: false,
            confidence: 0.0,
            sources: Vec::new(),
            risk_level: RiskLevel::Unknown,
            disclaimers: vec!["Please verify information independently".to_string()],
            warnings: vec!["Fact-checking service unavailable".to_string()],
            nlu_analysis: None,
        }
    }
}

/// One supporting source in a fact-check report.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub source: String,
    pub similarity: f32,
    pub content_preview: String,
}

/// Grounded answer plus its verification report.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub response: String,
    pub sources: Vec<RetrievalHit>,
    pub fact_check: FactCheckReport,
    pub context_used: bool,
    pub generated_at: DateTime<Utc>,
    pub query: String,
}

impl RagResponse {
    /// Canned reply used when answering fails outright.
    pub fn degraded(query: &str) -> Self {
        Self {
            response: "I apologize, but I'm unable to provide a reliable answer right now. \
                       Please consult with a financial professional."
                .to_string(),
            sources: Vec::new(),
            fact_check: FactCheckReport::degraded(),
            context_used: false,
            generated_at: Utc::now(),
            query: query.to_string(),
        }
    }
}
