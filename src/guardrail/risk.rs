use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Policy, RiskTier};

/// How sensitive a piece of financial advice is. `Unknown` is only
/// produced when assessment itself fails, never by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl RiskLevel {
    /// Severity rank used to order tiers; higher wins.
    pub fn severity(&self) -> u8 {
        match self {
            RiskLevel::Critical => 4,
            RiskLevel::High => 3,
            RiskLevel::Medium => 2,
            RiskLevel::Low => 1,
            RiskLevel::Unknown => 0,
        }
    }

    pub fn requires_warning(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
            RiskLevel::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Scores query + response text against tiered keyword sets.
///
/// Tiers are checked in strict severity order; the first tier with any
/// keyword hit wins and lower tiers are not evaluated. False negatives
/// on severe topics are worse than false positives, so a critical match
/// always overrides everything below it.
pub struct RiskClassifier {
    tiers: Vec<RiskTier>,
}

impl RiskClassifier {
    pub fn new(policy: &Policy) -> Self {
        let mut tiers = policy.risk_tiers.clone();
        tiers.sort_by(|a, b| b.level.severity().cmp(&a.level.severity()));
        Self { tiers }
    }

    pub fn classify(&self, query: &str, response: &str) -> RiskLevel {
        let combined = format!("{} {}", response.to_lowercase(), query.to_lowercase());

        for tier in &self.tiers {
            if tier.keywords.iter().any(|kw| combined.contains(kw.as_str())) {
                return tier.level;
            }
        }

        RiskLevel::Low
    }
}
