use super::risk::RiskLevel;
use super::{Policy, RiskNotices, TopicRule};

/// Maps detected financial topics and the assessed risk tier to canned
/// caveat strings. The result is deduplicated and never empty.
pub struct DisclaimerAssembler {
    topics: Vec<TopicRule>,
    notices: RiskNotices,
}

impl DisclaimerAssembler {
    pub fn new(policy: &Policy) -> Self {
        Self {
            topics: policy.topics.clone(),
            notices: policy.risk_notices.clone(),
        }
    }

    /// Topic disclaimers fire on trigger words regardless of risk level;
    /// high and critical tiers append their own notice on top. When
    /// nothing applies, a single generic caveat is emitted.
    pub fn assemble(&self, query: &str, response: &str, risk: RiskLevel) -> Vec<String> {
        let combined = format!("{} {}", response.to_lowercase(), query.to_lowercase());
        let mut disclaimers: Vec<String> = Vec::new();

        for topic in &self.topics {
            if topic.triggers.iter().any(|t| combined.contains(t.as_str())) {
                push_unique(&mut disclaimers, &topic.disclaimer);
            }
        }

        match risk {
            RiskLevel::Critical => push_unique(&mut disclaimers, &self.notices.critical),
            RiskLevel::High => push_unique(&mut disclaimers, &self.notices.high),
            _ => {}
        }

        if disclaimers.is_empty() {
            disclaimers.push(self.notices.generic.clone());
        }

        disclaimers
    }
}

fn push_unique(disclaimers: &mut Vec<String>, candidate: &str) {
    if !disclaimers.iter().any(|d| d == candidate) {
        disclaimers.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> DisclaimerAssembler {
        DisclaimerAssembler::new(&Policy::embedded().unwrap())
    }

    #[test]
    fn test_never_empty() {
        let a = assembler();
        let disclaimers = a.assemble("hello", "hi there", RiskLevel::Low);
        assert_eq!(disclaimers.len(), 1);
        assert!(disclaimers[0].contains("general information"));
    }

    #[test]
    fn test_topic_disclaimer_fires_on_trigger_word() {
        let a = assembler();
        let disclaimers = a.assemble("How should I invest?", "", RiskLevel::Low);
        assert_eq!(disclaimers.len(), 1);
        assert!(disclaimers[0].contains("financial advisor"));
    }

    #[test]
    fn test_same_topic_triggered_twice_appears_once() {
        let a = assembler();
        // Both "invest" and "mutual fund" map to the investment topic.
        let disclaimers = a.assemble(
            "Should I invest in a mutual fund?",
            "Mutual funds let you invest gradually.",
            RiskLevel::Low,
        );
        let investment_count = disclaimers
            .iter()
            .filter(|d| d.contains("financial advisor"))
            .count();
        assert_eq!(investment_count, 1);
    }

    #[test]
    fn test_multiple_topics_stack() {
        let a = assembler();
        let disclaimers = a.assemble(
            "Can I claim a tax deduction on my home loan EMI?",
            "",
            RiskLevel::Low,
        );
        assert!(disclaimers.iter().any(|d| d.contains("tax professional")));
        assert!(disclaimers.iter().any(|d| d.contains("lender")));
    }

    #[test]
    fn test_high_risk_appends_notice() {
        let a = assembler();
        let disclaimers = a.assemble("Should I invest?", "", RiskLevel::High);
        assert!(disclaimers.iter().any(|d| d.contains("HIGH RISK")));
    }

    #[test]
    fn test_critical_notice_is_distinct_from_high() {
        let a = assembler();
        let critical = a.assemble("hello", "", RiskLevel::Critical);
        let high = a.assemble("hello", "", RiskLevel::High);
        assert!(critical.iter().any(|d| d.contains("CRITICAL")));
        assert!(high.iter().any(|d| d.contains("HIGH RISK")));
        assert_ne!(critical, high);
    }

    #[test]
    fn test_risk_notice_independent_of_topics() {
        let a = assembler();
        // No topic triggers, but critical risk still produces a notice
        // rather than the generic fallback.
        let disclaimers = a.assemble("hello there", "", RiskLevel::Critical);
        assert_eq!(disclaimers.len(), 1);
        assert!(disclaimers[0].contains("CRITICAL"));
    }
}
