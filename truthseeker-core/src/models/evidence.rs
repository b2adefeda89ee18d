use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an evidence item is. The first four are the aggregator's categories;
/// the rest tag placeholder and catalog sources attached by the other stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    NewsArticle,
    SocialPost,
    Image,
    OfficialUpdate,
    WorkflowAnalysis,
    OfflineAnalysis,
    OfflineFallback,
    FactCorrection,
    NewsVerification,
    FactCheck,
    PoliticalFactCheck,
    AiAnalysis,
    NewsArchive,
    SocialVerification,
    AcademicSource,
    Reference,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credibility {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Publisher, outlet, handle or account the item came from.
    #[serde(rename = "source", default)]
    pub publisher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility: Option<Credibility>,
}

impl EvidenceItem {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        publisher: impl Into<String>,
        kind: SourceKind,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            publisher: publisher.into(),
            platform: None,
            kind,
            timestamp: None,
            verified: false,
            credibility: None,
        }
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn on_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_credibility(mut self, credibility: Credibility) -> Self {
        self.credibility = Some(credibility);
        self
    }

    pub fn is_high_credibility(&self) -> bool {
        self.credibility == Some(Credibility::High)
    }
}

/// Counts over the articles, social posts and images collected for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceSummary {
    pub total_sources: usize,
    pub articles_count: usize,
    pub social_posts_count: usize,
    pub images_count: usize,
    pub verified_sources: usize,
    pub high_credibility_sources: usize,
}

impl EvidenceSummary {
    pub fn from_items(items: &[EvidenceItem]) -> Self {
        let count = |kind: SourceKind| items.iter().filter(|i| i.kind == kind).count();
        Self {
            total_sources: items.len(),
            articles_count: count(SourceKind::NewsArticle),
            social_posts_count: count(SourceKind::SocialPost),
            images_count: count(SourceKind::Image),
            verified_sources: items.iter().filter(|i| i.verified).count(),
            high_credibility_sources: items.iter().filter(|i| i.is_high_credibility()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_item_wire_names() {
        let item = EvidenceItem::new("t", "https://x", "Reuters", SourceKind::WorkflowAnalysis)
            .verified(true);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["source"], "Reuters");
        assert_eq!(json["type"], "workflow_analysis");
        assert_eq!(json["verified"], true);
        assert!(json.get("credibility").is_none());
    }

    #[test]
    fn test_unknown_kind_from_upstream() {
        let item: EvidenceItem = serde_json::from_value(serde_json::json!({
            "title": "Blog",
            "url": "https://blog.example",
            "source": "someone",
            "type": "blog_post"
        }))
        .unwrap();
        assert_eq!(item.kind, SourceKind::Unknown);
        assert!(!item.verified);
    }
}
