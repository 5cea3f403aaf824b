use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::NluConfig;

/// Result of the optional NLU enrichment step. Failures are recorded
/// inline instead of failing the surrounding fact-check report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NluAnalysis {
    pub analysis_successful: bool,
    #[serde(default)]
    pub concepts: Vec<Value>,
    #[serde(default)]
    pub keywords: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NluAnalysis {
    fn failure(error: String) -> Self {
        Self {
            analysis_successful: false,
            concepts: Vec::new(),
            keywords: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Deserialize)]
struct NluResponse {
    #[serde(default)]
    concepts: Vec<Value>,
    #[serde(default)]
    keywords: Vec<Value>,
}

/// Client for a Watson-style natural-language-understanding service
/// used to enrich fact-check reports with concepts and keywords.
pub struct NluClient {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl NluClient {
    /// Returns `None` when no endpoint is configured; enrichment is a
    /// capability, not a requirement.
    pub fn from_config(config: &NluConfig) -> Option<Self> {
        if config.endpoint.trim().is_empty() {
            return None;
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Finguard/0.1")
            .build()
            .unwrap_or_default();

        Some(Self {
            endpoint: config.endpoint.clone(),
            api_key: std::env::var(&config.api_key_env).ok(),
            client,
        })
    }

    /// Analyze text for concepts and keywords. Never fails: transport
    /// and service errors come back as an unsuccessful analysis.
    pub async fn analyze(&self, text: &str) -> NluAnalysis {
        let body = json!({
            "text": text,
            "features": {
                "concepts": { "limit": 5 },
                "keywords": { "limit": 10 },
            },
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "NLU enrichment request failed");
                return NluAnalysis::failure(e.to_string());
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%status, "NLU enrichment rejected");
            return NluAnalysis::failure(format!("NLU service returned HTTP {}", status));
        }

        match response.json::<NluResponse>().await {
            Ok(parsed) => NluAnalysis {
                analysis_successful: true,
                concepts: parsed.concepts,
                keywords: parsed.keywords,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "NLU enrichment response unreadable");
                NluAnalysis::failure(e.to_string())
            }
        }
    }
}
