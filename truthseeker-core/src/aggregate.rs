//! Source Aggregator: gathers evidence for a claim
//!
//! Articles, social posts and images are collected concurrently and merged
//! newest-first. Official updates are only looked up for entities with a
//! registered channel. A failing collector contributes an empty list; the
//! aggregator itself never fails.

use std::sync::Arc;

use crate::entities::{channels_for, extract_entities};
use crate::models::{Entity, EvidenceItem, EvidenceSummary};
use crate::sources::{
    ImageSource, NewsSource, OfficialChannelSource, SimulatedImageSource, SimulatedNewsSource,
    SimulatedOfficialChannels, SimulatedSocialSource, SocialSource,
};

/// Everything collected for one query.
#[derive(Debug, Clone, Default)]
pub struct AggregatedEvidence {
    pub entities: Vec<Entity>,
    pub articles: Vec<EvidenceItem>,
    pub social_posts: Vec<EvidenceItem>,
    pub images: Vec<EvidenceItem>,
    pub official_updates: Vec<EvidenceItem>,
    /// Articles, social posts and images, newest first.
    pub all: Vec<EvidenceItem>,
    pub summary: EvidenceSummary,
}

#[derive(Clone)]
pub struct SourceAggregator {
    news: Arc<dyn NewsSource>,
    social: Arc<dyn SocialSource>,
    images: Arc<dyn ImageSource>,
    official: Arc<dyn OfficialChannelSource>,
}

impl SourceAggregator {
    pub fn new(
        news: Arc<dyn NewsSource>,
        social: Arc<dyn SocialSource>,
        images: Arc<dyn ImageSource>,
        official: Arc<dyn OfficialChannelSource>,
    ) -> Self {
        Self {
            news,
            social,
            images,
            official,
        }
    }

    /// Aggregator backed by the simulated collectors.
    pub fn simulated(official_activity_probability: f64) -> Self {
        Self::new(
            Arc::new(SimulatedNewsSource),
            Arc::new(SimulatedSocialSource),
            Arc::new(SimulatedImageSource),
            Arc::new(SimulatedOfficialChannels::new(official_activity_probability)),
        )
    }

    pub async fn aggregate(&self, query: &str) -> AggregatedEvidence {
        let entities = extract_entities(query);
        let official_updates = self.official_updates(&entities).await;

        let (articles, social_posts, images) = tokio::join!(
            self.news.articles(query),
            self.social.posts(query),
            self.images.images(query),
        );
        let articles = or_empty("news", articles);
        let social_posts = or_empty("social", social_posts);
        let images = or_empty("images", images);

        let mut all: Vec<EvidenceItem> = articles
            .iter()
            .chain(social_posts.iter())
            .chain(images.iter())
            .cloned()
            .collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let summary = EvidenceSummary::from_items(&all);

        tracing::info!(
            total = summary.total_sources,
            articles = summary.articles_count,
            social_posts = summary.social_posts_count,
            images = summary.images_count,
            official = official_updates.len(),
            "Aggregated evidence"
        );

        AggregatedEvidence {
            entities,
            articles,
            social_posts,
            images,
            official_updates,
            all,
            summary,
        }
    }

    async fn official_updates(&self, entities: &[Entity]) -> Vec<EvidenceItem> {
        let mut updates = Vec::new();
        for (entity, channel) in channels_for(entities) {
            match self.official.recent_updates(entity, channel).await {
                Ok(found) => updates.extend(found),
                Err(e) => {
                    tracing::warn!(entity = %entity.name, error = %e, "Official channel lookup failed");
                }
            }
        }
        updates
    }
}

fn or_empty(collector: &str, result: anyhow::Result<Vec<EvidenceItem>>) -> Vec<EvidenceItem> {
    result.unwrap_or_else(|e| {
        tracing::warn!(collector, error = %e, "Evidence collector failed, continuing without it");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OfficialChannel;
    use crate::models::{Credibility, SourceKind};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    struct FixedNews(Vec<EvidenceItem>);
    struct FixedSocial(Vec<EvidenceItem>);
    struct FixedImages(Vec<EvidenceItem>);
    struct FailingNews;
    struct AlwaysOfficial;

    #[async_trait]
    impl NewsSource for FixedNews {
        async fn articles(&self, _query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl NewsSource for FailingNews {
        async fn articles(&self, _query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
            anyhow::bail!("scraper blocked")
        }
    }

    #[async_trait]
    impl SocialSource for FixedSocial {
        async fn posts(&self, _query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl ImageSource for FixedImages {
        async fn images(&self, _query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
            Ok(self.0.clone())
        }
    }

    #[async_trait]
    impl OfficialChannelSource for AlwaysOfficial {
        async fn recent_updates(
            &self,
            entity: &Entity,
            channel: &OfficialChannel,
        ) -> anyhow::Result<Vec<EvidenceItem>> {
            Ok(vec![EvidenceItem::new(
                format!("Official {} statement", entity.name),
                "https://twitter.com/x",
                channel.key(),
                SourceKind::OfficialUpdate,
            )
            .verified(true)])
        }
    }

    fn item(title: &str, kind: SourceKind, hours_ago: i64) -> EvidenceItem {
        let base = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        EvidenceItem::new(title, "https://example.com", "example", kind)
            .at(base - Duration::hours(hours_ago))
    }

    #[tokio::test]
    async fn test_merge_sorted_newest_first() {
        let aggregator = SourceAggregator::new(
            Arc::new(FixedNews(vec![item("a-old", SourceKind::NewsArticle, 30)])),
            Arc::new(FixedSocial(vec![item("s-new", SourceKind::SocialPost, 1)])),
            Arc::new(FixedImages(vec![item("i-mid", SourceKind::Image, 5)])),
            Arc::new(SimulatedOfficialChannels::new(0.0)),
        );

        let evidence = aggregator.aggregate("anything").await;
        let titles: Vec<&str> = evidence.all.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["s-new", "i-mid", "a-old"]);
        assert_eq!(evidence.summary.total_sources, 3);
        assert_eq!(evidence.summary.articles_count, 1);
    }

    #[tokio::test]
    async fn test_failing_collector_yields_empty_list() {
        let aggregator = SourceAggregator::new(
            Arc::new(FailingNews),
            Arc::new(FixedSocial(vec![item("s", SourceKind::SocialPost, 1)])),
            Arc::new(FixedImages(vec![])),
            Arc::new(SimulatedOfficialChannels::new(0.0)),
        );

        let evidence = aggregator.aggregate("anything").await;
        assert!(evidence.articles.is_empty());
        assert_eq!(evidence.summary.total_sources, 1);
    }

    #[tokio::test]
    async fn test_official_updates_only_for_registered_entities() {
        let aggregator = SourceAggregator::new(
            Arc::new(FixedNews(vec![])),
            Arc::new(FixedSocial(vec![])),
            Arc::new(FixedImages(vec![])),
            Arc::new(AlwaysOfficial),
        );

        let none = aggregator.aggregate("putin visits a farm").await;
        assert_eq!(none.entities.len(), 1);
        assert!(none.official_updates.is_empty());

        let some = aggregator.aggregate("Narendra Modi and Apple").await;
        // "modi" and "narendra modi" share one channel
        assert_eq!(some.official_updates.len(), 2);
        assert!(some.all.is_empty(), "official updates stay out of web evidence");
    }

    #[tokio::test]
    async fn test_simulated_summary_consistency() {
        let aggregator = SourceAggregator::simulated(0.3);
        for _ in 0..5 {
            let evidence = aggregator.aggregate("tesla recalls cars").await;
            let s = evidence.summary;
            assert_eq!(s.total_sources, s.articles_count + s.social_posts_count + s.images_count);
            assert!(s.verified_sources <= s.total_sources);
            assert!(s.high_credibility_sources <= s.articles_count);
            assert!(evidence
                .all
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp));
            assert!(evidence.articles.iter().all(|a| a.credibility.is_some()));
            assert!(evidence
                .social_posts
                .iter()
                .chain(evidence.images.iter())
                .all(|i| i.credibility != Some(Credibility::High)));
        }
    }
}
