use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Seam for the external response-drafting component (the upstream
/// language model or rule engine). This pipeline only verifies drafts;
/// it does not author financial advice itself.
#[async_trait]
pub trait ResponseDrafter: Send + Sync {
    async fn draft(
        &self,
        query: &str,
        context: &str,
        user_context: Option<&Value>,
    ) -> Result<String>;
}

/// Stand-in drafter used when no external model is wired up. Surfaces
/// the retrieved context verbatim so downstream verification still has
/// something grounded to work with.
pub struct TemplateDrafter;

#[async_trait]
impl ResponseDrafter for TemplateDrafter {
    async fn draft(
        &self,
        _query: &str,
        context: &str,
        _user_context: Option<&Value>,
    ) -> Result<String> {
        if context.trim().is_empty() {
            return Ok("I don't have enough verified information to answer this question \
                       accurately. Please consult with a financial professional."
                .to_string());
        }

        let preview: String = context.chars().take(500).collect();
        Ok(format!("Based on verified financial sources:\n\n{}", preview))
    }
}
