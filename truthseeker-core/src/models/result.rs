use serde::{Deserialize, Serialize};

use super::evidence::{EvidenceItem, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Verified,
    #[serde(rename = "Potential Misinformation")]
    PotentialMisinformation,
    Unverified,
}

impl Classification {
    pub fn from_truth(is_true: bool) -> Self {
        if is_true {
            Classification::Verified
        } else {
            Classification::PotentialMisinformation
        }
    }

    /// Map an upstream label onto the three-way classification.
    /// Unrecognized labels read as `Unverified`.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "verified" | "true" => Classification::Verified,
            "potential misinformation" | "misinformation" | "false" => {
                Classification::PotentialMisinformation
            }
            "unverified" => Classification::Unverified,
            other => {
                tracing::warn!(label = %other, "Unrecognized classification label, treating as Unverified");
                Classification::Unverified
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Verified => "Verified",
            Classification::PotentialMisinformation => "Potential Misinformation",
            Classification::Unverified => "Unverified",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the pipeline produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Workflow,
    Ai,
    Offline,
    Correction,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Workflow => "workflow",
            Stage::Ai => "ai",
            Stage::Offline => "offline",
            Stage::Correction => "correction",
        }
    }
}

/// Canonical verdict handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub classification: Classification,
    pub confidence: u8,
    pub reason: String,
    pub sources: Vec<EvidenceItem>,
    #[serde(default)]
    pub corrected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<Stage>,
}

impl VerificationResult {
    pub fn new(
        classification: Classification,
        confidence: u8,
        reason: impl Into<String>,
        sources: Vec<EvidenceItem>,
    ) -> Self {
        Self {
            classification,
            confidence: confidence.min(100),
            reason: reason.into(),
            sources,
            corrected: false,
            processed_by: None,
        }
    }

    pub fn processed_by(mut self, stage: Stage) -> Self {
        self.processed_by = Some(stage);
        self
    }

    /// Enforce the output contract: confidence within 0–100 and at least one source.
    pub fn ensure_contract(mut self) -> Self {
        self.confidence = self.confidence.min(100);
        if self.sources.is_empty() {
            self.sources.push(unavailable_source());
        }
        self
    }
}

/// Placeholder used whenever a path has no evidence to show.
pub fn unavailable_source() -> EvidenceItem {
    EvidenceItem::new("Service Unavailable", "#", "Offline Mode", SourceKind::OfflineFallback)
}

/// Clamp an arbitrary upstream score into 0–100.
pub fn clamp_confidence(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}
