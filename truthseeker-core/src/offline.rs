//! Offline fallback: the terminal, infallible stage of the coordinator.

use crate::facts::{find_match, offline_table, KnownFact};
use crate::models::{Classification, EvidenceItem, SourceKind, Stage, VerificationResult};
use crate::models::result::unavailable_source;

pub const UNAVAILABLE_REASON: &str =
    "Unable to verify - AI service temporarily unavailable. Please try again later.";

#[derive(Debug, Clone)]
pub struct OfflineFallback {
    facts: Vec<KnownFact>,
}

impl Default for OfflineFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl OfflineFallback {
    pub fn new() -> Self {
        Self {
            facts: offline_table(),
        }
    }

    /// Answer from the built-in knowledge base, or `Unverified` at 50%.
    pub fn basic_fact_check(&self, query: &str) -> VerificationResult {
        tracing::info!("Using offline fallback analysis");

        match find_match(&self.facts, query) {
            Some(fact) => VerificationResult::new(
                Classification::from_truth(fact.is_true),
                fact.confidence,
                fact.reason.trim_end_matches('.'),
                vec![EvidenceItem::new(
                    "Offline Basic Fact Check",
                    "#",
                    "Built-in Knowledge Base",
                    SourceKind::OfflineAnalysis,
                )
                .verified(true)],
            ),
            None => VerificationResult::new(
                Classification::Unverified,
                50,
                UNAVAILABLE_REASON,
                vec![unavailable_source()],
            ),
        }
        .processed_by(Stage::Offline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delhi_capital_verified() {
        let result = OfflineFallback::new().basic_fact_check("Delhi is the capital of India");
        assert_eq!(result.classification, Classification::Verified);
        assert_eq!(result.confidence, 95);
        assert_eq!(
            result.reason,
            "New Delhi is the capital of India - basic geographical fact"
        );
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].kind, SourceKind::OfflineAnalysis);
        assert!(result.sources[0].verified);
        assert_eq!(result.processed_by, Some(Stage::Offline));
    }

    #[test]
    fn test_known_falsehood() {
        let result = OfflineFallback::new().basic_fact_check("5G spreads COVID");
        assert_eq!(result.classification, Classification::PotentialMisinformation);
        assert_eq!(result.confidence, 99);
    }

    #[test]
    fn test_unknown_claim_unverified_placeholder() {
        let result = OfflineFallback::new().basic_fact_check("The mayor bought a boat");
        assert_eq!(result.classification, Classification::Unverified);
        assert_eq!(result.confidence, 50);
        assert_eq!(result.reason, UNAVAILABLE_REASON);
        assert_eq!(result.sources[0].title, "Service Unavailable");
        assert!(!result.sources[0].verified);
        assert!(!result.corrected);
    }
}
