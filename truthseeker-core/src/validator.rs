//! Result Validator: ground-truth override for a handful of canonical claims.
//!
//! When the query matches a known fact the table verdict replaces the upstream
//! result outright, sources included. Otherwise the result passes through.

use crate::facts::{correction_table, find_match, KnownFact};
use crate::models::{Classification, EvidenceItem, SourceKind, Stage, VerificationResult};

const CORRECTION_URL: &str =
    "https://www.nasa.gov/audience/forstudents/k-4/stories/nasa-knows/what-is-earth-k4.html";

#[derive(Debug, Clone)]
pub struct ResultValidator {
    facts: Vec<KnownFact>,
}

impl Default for ResultValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultValidator {
    pub fn new() -> Self {
        Self {
            facts: correction_table(),
        }
    }

    pub fn validate(&self, query: &str, result: VerificationResult) -> VerificationResult {
        let Some(fact) = find_match(&self.facts, query) else {
            tracing::debug!("No override needed");
            return result;
        };

        let corrected = Classification::from_truth(fact.is_true);
        if corrected != result.classification {
            tracing::warn!(
                upstream = %result.classification,
                corrected = %corrected,
                "Upstream verdict contradicts a known fact, applying override"
            );
        }

        let mut replacement = VerificationResult::new(
            corrected,
            fact.confidence,
            fact.reason,
            vec![EvidenceItem::new(
                "Scientific Fact Correction",
                CORRECTION_URL,
                "Scientific Consensus Override",
                SourceKind::FactCorrection,
            )
            .verified(true)],
        )
        .processed_by(Stage::Correction);
        replacement.corrected = true;
        replacement
    }
}
