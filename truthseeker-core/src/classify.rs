//! Classification Engine
//!
//! Evidence rules form a strict if/else-if chain (first match wins). A keyword
//! pass then runs unconditionally and, when it matches, replaces whatever the
//! evidence rules decided. Confidence is not produced here.

use serde::Serialize;

use crate::models::{Classification, Entity, EvidenceItem};

/// Phrases that mark a claim as a known misinformation pattern.
pub const MISINFORMATION_PHRASES: &[&str] = &[
    "miracle cure",
    "doctors hate",
    "secret government",
    "they dont want you to know",
    "banned by",
    "suppressed by",
    "conspiracy",
    "hoax",
    "fake news media",
    "lizard people",
    "illuminati",
    "new world order",
    "chemtrails",
    "vaccines cause autism",
    "microchip",
    "5g causes",
    "flat earth",
    "moon landing fake",
    "birds arent real",
    "covid hoax",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub classification: Classification,
    pub reason: String,
}

impl Verdict {
    fn new(classification: Classification, reason: impl Into<String>) -> Self {
        Self {
            classification,
            reason: reason.into(),
        }
    }
}

pub fn classify(
    entities: &[Entity],
    official_updates: &[EvidenceItem],
    web_evidence: &[EvidenceItem],
    raw_text: &str,
) -> Verdict {
    let evidence = evidence_verdict(entities, official_updates, web_evidence);
    keyword_override(raw_text).unwrap_or(evidence)
}

fn evidence_verdict(
    entities: &[Entity],
    official_updates: &[EvidenceItem],
    web_evidence: &[EvidenceItem],
) -> Verdict {
    let has_official = !official_updates.is_empty();
    let has_web = !web_evidence.is_empty();
    let verified = web_evidence.iter().filter(|i| i.verified).count();
    let high_credibility = web_evidence.iter().filter(|i| i.is_high_credibility()).count();

    if !entities.is_empty() && !has_official && !has_web {
        Verdict::new(
            Classification::PotentialMisinformation,
            "No official data or credible web sources found in the last 24-48 hours",
        )
    } else if has_official && high_credibility >= 2 {
        Verdict::new(
            Classification::Verified,
            format!(
                "Confirmed by {} official sources and {} high-credibility news outlets",
                official_updates.len(),
                high_credibility
            ),
        )
    } else if verified >= 3 && high_credibility >= 1 {
        Verdict::new(
            Classification::Verified,
            format!(
                "Supported by {} verified sources including major news outlets",
                verified
            ),
        )
    } else if has_web {
        Verdict::new(
            Classification::PotentialMisinformation,
            format!(
                "Found {} web sources but no official statement has been released",
                web_evidence.len()
            ),
        )
    } else {
        Verdict::new(
            Classification::PotentialMisinformation,
            "No official statement has been released - this news is not true",
        )
    }
}

fn keyword_override(raw_text: &str) -> Option<Verdict> {
    let text = raw_text.to_lowercase();

    if text.contains("dead") || text.contains("died") {
        Some(Verdict::new(
            Classification::PotentialMisinformation,
            "Death claims require verification from official sources",
        ))
    } else if text.contains("flat earth") {
        Some(Verdict::new(
            Classification::PotentialMisinformation,
            "Scientific consensus contradicts flat earth claims",
        ))
    } else if text.contains("covid") && text.contains("hoax") {
        Some(Verdict::new(
            Classification::PotentialMisinformation,
            "COVID-19 is a verified pandemic by WHO and medical authorities",
        ))
    } else if MISINFORMATION_PHRASES.iter().any(|p| text.contains(p)) {
        Some(Verdict::new(
            Classification::PotentialMisinformation,
            "Content contains common misinformation patterns and unsubstantiated claims",
        ))
    } else if text.contains("breaking") || text.contains("urgent") {
        Some(Verdict::new(
            Classification::Unverified,
            "Breaking news requires additional verification",
        ))
    } else {
        None
    }
}
