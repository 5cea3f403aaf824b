pub mod disclaimer;
pub mod risk;

use anyhow::{Context, Result};
use serde::Deserialize;

use risk::RiskLevel;

/// Guardrail policy tables, loaded from the embedded, versioned TOML.
/// Keeping keyword sets and disclaimer wording as data makes tier
/// priority explicit and testable instead of implied by code ordering.
#[derive(Debug, Clone, Deserialize)]
pub struct Policy {
    pub version: u32,
    pub risk_tiers: Vec<RiskTier>,
    pub topics: Vec<TopicRule>,
    pub risk_notices: RiskNotices,
}

/// Keyword set of one risk tier.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskTier {
    pub level: RiskLevel,
    pub keywords: Vec<String>,
}

/// Trigger words and caveat wording for one financial topic.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicRule {
    pub name: String,
    pub triggers: Vec<String>,
    pub disclaimer: String,
}

/// Risk-level specific caveats plus the generic fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskNotices {
    pub high: String,
    pub critical: String,
    pub generic: String,
}

impl Policy {
    /// The policy shipped with the binary.
    pub fn embedded() -> Result<Self> {
        toml::from_str(include_str!("policy.toml")).context("Embedded guardrail policy is invalid")
    }
}
