#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::{build_context, score_confidence, source_ref, FactChecker};
    use crate::config::Config;
    use crate::guardrail::risk::RiskLevel;
    use crate::kb::chunker::TextChunker;
    use crate::kb::fallback::FallbackStore;
    use crate::kb::manager::KnowledgeManager;
    use crate::kb::types::{HitMetadata, RetrievalHit};

    fn hit(similarity: f32, content: &str) -> RetrievalHit {
        RetrievalHit {
            content: content.to_string(),
            metadata: HitMetadata {
                source: "RBI".to_string(),
                doc_type: "regulations".to_string(),
                chunk_index: 0,
            },
            similarity,
            collection: "regulations".to_string(),
        }
    }

    fn checker_over(store: FallbackStore) -> FactChecker {
        let manager = KnowledgeManager::with_fallback(TextChunker::new(1000, 200), store);
        FactChecker::new(&Config::default(), Arc::new(manager)).unwrap()
    }

    #[test]
    fn test_no_hits_means_unverified_zero_confidence() {
        assert_eq!(score_confidence(&[]), (false, 0.0));
    }

    #[test]
    fn test_confidence_is_capped_at_095() {
        let hits = vec![hit(1.0, "a"), hit(1.0, "b"), hit(1.0, "c")];
        let (verified, confidence) = score_confidence(&hits);
        assert!(verified);
        assert_eq!(confidence, 0.95);
    }

    #[test]
    fn test_threshold_uses_uncapped_mean() {
        // Mean 0.96 exceeds the display cap but the decision is made
        // on the raw value before capping.
        let hits = vec![hit(0.96, "a")];
        let (verified, confidence) = score_confidence(&hits);
        assert!(verified);
        assert_eq!(confidence, 0.95);
    }

    #[test]
    fn test_below_threshold_is_unverified() {
        let hits = vec![hit(0.5, "a"), hit(0.6, "b")];
        let (verified, confidence) = score_confidence(&hits);
        assert!(!verified);
        assert!((confidence - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_exactly_at_threshold_is_unverified() {
        let hits = vec![hit(0.7, "a")];
        let (verified, _) = score_confidence(&hits);
        assert!(!verified, "threshold is strictly greater-than");
    }

    #[test]
    fn test_source_preview_truncation() {
        let long = "x".repeat(300);
        let reference = source_ref(&hit(0.8, &long));
        assert!(reference.content_preview.ends_with("..."));
        assert_eq!(reference.content_preview.chars().count(), 203);

        let short = source_ref(&hit(0.8, "short text"));
        assert_eq!(short.content_preview, "short text");
    }

    #[test]
    fn test_context_uses_top_three_hits() {
        let hits = vec![
            hit(0.9, "first"),
            hit(0.8, "second"),
            hit(0.7, "third"),
            hit(0.6, "fourth"),
        ];
        let context = build_context(&hits);
        assert!(context.contains("first"));
        assert!(context.contains("third"));
        assert!(!context.contains("fourth"));
        assert!(context.contains("Source: RBI"));
    }

    #[tokio::test]
    async fn test_fact_check_on_empty_knowledge_base() {
        let dir = tempfile::tempdir().unwrap();
        let checker = checker_over(FallbackStore::new(dir.path().join("fallback.json")));

        let report = checker
            .fact_check("Deposit rates vary by bank.", "What are deposit rates?")
            .await;

        assert!(!report.verified);
        assert_eq!(report.confidence, 0.0);
        assert!(report.sources.is_empty());
        assert!(!report.disclaimers.is_empty());
    }

    #[tokio::test]
    async fn test_fact_check_over_fallback_hits_stays_unverified() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path().join("fallback.json"));
        store
            .add_document(
                "doc1",
                "RBI",
                "regulations",
                &["Fixed deposit rates are reviewed quarterly.".to_string()],
            )
            .unwrap();
        let checker = checker_over(store);

        let report = checker
            .fact_check("Rates are reviewed quarterly.", "fixed deposit rates")
            .await;

        // Fallback hits carry a fixed 0.5 similarity, below the 0.7
        // verification threshold.
        assert!(!report.verified);
        assert_eq!(report.confidence, 0.5);
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.sources[0].source, "RBI");
    }

    #[tokio::test]
    async fn test_critical_risk_adds_warning_and_notice() {
        let dir = tempfile::tempdir().unwrap();
        let checker = checker_over(FallbackStore::new(dir.path().join("fallback.json")));

        let report = checker
            .fact_check("Guaranteed returns, double your money!", "how to invest")
            .await;

        assert_eq!(report.risk_level, RiskLevel::Critical);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.disclaimers.iter().any(|d| d.contains("CRITICAL")));
    }

    #[tokio::test]
    async fn test_answer_appends_disclaimers_when_high_risk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path().join("fallback.json"));
        store
            .add_document(
                "doc1",
                "SEBI",
                "regulations",
                &["Day trading and margin trading carry substantial risk.".to_string()],
            )
            .unwrap();
        let checker = checker_over(store);

        let answer = checker
            .answer_with_verification("Is day trading a good idea?", None)
            .await;

        assert!(answer.context_used);
        assert!(answer.fact_check.risk_level.requires_warning());
        for disclaimer in &answer.fact_check.disclaimers {
            assert!(answer.response.contains(disclaimer));
        }
        assert_eq!(answer.query, "Is day trading a good idea?");
    }

    #[tokio::test]
    async fn test_answer_on_empty_store_uses_refusal_draft() {
        let dir = tempfile::tempdir().unwrap();
        let checker = checker_over(FallbackStore::new(dir.path().join("fallback.json")));

        let answer = checker.answer_with_verification("zzzz qqqq", None).await;
        assert!(!answer.context_used);
        assert!(answer.sources.is_empty());
        assert!(answer.response.contains("financial professional"));
    }
}
