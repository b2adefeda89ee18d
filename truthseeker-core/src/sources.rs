//! Evidence sources: pluggable collectors behind the Source Aggregator
//!
//! Each source kind is a trait so a real scraper or search API can replace the
//! simulated collectors without touching aggregation or classification.
//! The simulated collectors synthesize items whose counts and timestamps are
//! random but whose shape is fixed.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::entities::OfficialChannel;
use crate::models::{Credibility, Entity, EvidenceItem, SourceKind};

// ============================================================================
// Source traits
// ============================================================================

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn articles(&self, query: &str) -> anyhow::Result<Vec<EvidenceItem>>;
}

#[async_trait]
pub trait SocialSource: Send + Sync {
    async fn posts(&self, query: &str) -> anyhow::Result<Vec<EvidenceItem>>;
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn images(&self, query: &str) -> anyhow::Result<Vec<EvidenceItem>>;
}

#[async_trait]
pub trait OfficialChannelSource: Send + Sync {
    /// Recent statements published through `channel` by `entity`.
    async fn recent_updates(
        &self,
        entity: &Entity,
        channel: &OfficialChannel,
    ) -> anyhow::Result<Vec<EvidenceItem>>;
}

// ============================================================================
// Static source tables
// ============================================================================

pub const NEWS_SOURCES: &[&str] = &[
    "cnn.com", "bbc.com", "reuters.com", "apnews.com", "nytimes.com", "washingtonpost.com",
    "theguardian.com", "foxnews.com", "nbcnews.com", "abcnews.go.com", "cbsnews.com",
    "usatoday.com", "wsj.com", "timesofindia.indiatimes.com", "hindustantimes.com",
    "indianexpress.com", "ndtv.com", "news18.com", "zeenews.india.com", "aajtak.in",
    "republicworld.com", "timesnownews.com", "india.com", "financialexpress.com",
    "businesstoday.in", "moneycontrol.com", "theprint.in", "scroll.in", "thewire.in",
    "newslaundry.com",
];

pub const TWITTER_HANDLES: &[&str] = &[
    "@CNN", "@BBCBreaking", "@Reuters", "@AP", "@nytimes", "@washingtonpost", "@timesofindia",
    "@htTweets", "@IndianExpress", "@ndtv", "@News18dotcom", "@ZeeNews", "@aajtak", "@republic",
    "@TimesNow", "@IndiaToday", "@narendramodi", "@PMOIndia", "@AmitShah", "@RahulGandhi",
    "@PIB_India", "@MIB_India", "@mygovindia", "@PresidencyZA",
];

pub const SOCIAL_ACCOUNTS: &[(&str, &[&str])] = &[
    (
        "facebook",
        &[
            "CNN", "BBC News", "Reuters", "Associated Press", "Times of India", "Hindustan Times",
            "NDTV", "India Today", "Zee News", "Aaj Tak", "Republic TV", "Times Now",
        ],
    ),
    (
        "instagram",
        &[
            "cnn", "bbcnews", "reuters", "ap", "timesofindia", "hindustantimes", "ndtv",
            "indiatoday", "zeenews", "aajtak", "republicworld", "timesnow",
        ],
    ),
    (
        "youtube",
        &[
            "CNN", "BBC News", "Reuters TV", "Associated Press", "Times of India", "NDTV",
            "India Today", "Zee News", "Aaj Tak", "Republic TV", "Times Now", "ABP News",
        ],
    ),
    (
        "tiktok",
        &["cnn", "bbc", "reuters", "ap", "timesofindia", "ndtv", "indiatoday", "zeenews"],
    ),
];

pub const IMAGE_SOURCES: &[&str] = &[
    "Getty Images", "AP Images", "Reuters Pictures", "Shutterstock", "Google Images",
    "Bing Images", "TinEye", "Yandex Images",
];

const HIGH_CREDIBILITY: &[&str] = &[
    "bbc.com", "reuters.com", "apnews.com", "nytimes.com", "timesofindia.indiatimes.com",
    "hindustantimes.com", "indianexpress.com", "ndtv.com", "theprint.in",
];

const MEDIUM_CREDIBILITY: &[&str] = &[
    "cnn.com", "washingtonpost.com", "theguardian.com", "news18.com", "zeenews.india.com",
    "aajtak.in", "republicworld.com", "timesnownews.com", "india.com", "scroll.in",
];

/// Static credibility tier of a news outlet; anything unlisted is `Low`.
pub fn source_credibility(source: &str) -> Credibility {
    if HIGH_CREDIBILITY.contains(&source) {
        Credibility::High
    } else if MEDIUM_CREDIBILITY.contains(&source) {
        Credibility::Medium
    } else {
        Credibility::Low
    }
}

fn minutes_ago<R: Rng + ?Sized>(rng: &mut R, max_hours: i64) -> chrono::DateTime<Utc> {
    Utc::now() - Duration::minutes(rng.gen_range(0..max_hours * 60))
}

fn post_id<R: Rng + ?Sized>(rng: &mut R, i: usize) -> String {
    format!("{}{}", Utc::now().timestamp_millis(), rng.gen_range(0..1000) * 10 + i)
}

// ============================================================================
// Simulated collectors
// ============================================================================

/// Synthesizes 1–3 articles per outlet, published within the last week.
#[derive(Debug, Clone, Default)]
pub struct SimulatedNewsSource;

impl SimulatedNewsSource {
    pub fn articles_from<R: Rng + ?Sized>(rng: &mut R, outlet: &str, query: &str) -> Vec<EvidenceItem> {
        let count = rng.gen_range(1..=3);
        (0..count)
            .map(|i| {
                EvidenceItem::new(
                    format!("{} - {} Report", query, outlet),
                    format!("https://{}/article/{}-{}", outlet, Utc::now().timestamp_millis(), i),
                    outlet,
                    SourceKind::NewsArticle,
                )
                .at(minutes_ago(rng, 7 * 24))
                .with_credibility(source_credibility(outlet))
            })
            .collect()
    }
}

#[async_trait]
impl NewsSource for SimulatedNewsSource {
    async fn articles(&self, query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
        let mut rng = rand::thread_rng();
        Ok(NEWS_SOURCES
            .iter()
            .flat_map(|outlet| Self::articles_from(&mut rng, outlet, query))
            .collect())
    }
}

/// Synthesizes posts: 1–5 verified tweets per handle (last 24h), 1–3 posts per
/// account elsewhere (last 48h, verified 70% of the time).
#[derive(Debug, Clone, Default)]
pub struct SimulatedSocialSource;

impl SimulatedSocialSource {
    pub fn tweets_from<R: Rng + ?Sized>(rng: &mut R, handle: &str, query: &str) -> Vec<EvidenceItem> {
        let count = rng.gen_range(1..=5);
        (0..count)
            .map(|i| {
                EvidenceItem::new(
                    format!("{} tweet about {}", handle, query),
                    format!(
                        "https://twitter.com/{}/status/{}",
                        handle.trim_start_matches('@'),
                        post_id(rng, i)
                    ),
                    handle,
                    SourceKind::SocialPost,
                )
                .on_platform("Twitter")
                .at(minutes_ago(rng, 24))
                .verified(true)
            })
            .collect()
    }

    pub fn posts_from<R: Rng + ?Sized>(
        rng: &mut R,
        platform: &str,
        account: &str,
        query: &str,
    ) -> Vec<EvidenceItem> {
        let count = rng.gen_range(1..=3);
        (0..count)
            .map(|i| {
                EvidenceItem::new(
                    format!("{} {} post about {}", account, platform, query),
                    format!(
                        "https://{}.com/{}/post/{}",
                        platform,
                        account.replace(' ', ""),
                        post_id(rng, i)
                    ),
                    account,
                    SourceKind::SocialPost,
                )
                .on_platform(platform)
                .at(minutes_ago(rng, 48))
                .verified(rng.gen_bool(0.7))
            })
            .collect()
    }
}

#[async_trait]
impl SocialSource for SimulatedSocialSource {
    async fn posts(&self, query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
        let mut rng = rand::thread_rng();
        let mut posts: Vec<EvidenceItem> = TWITTER_HANDLES
            .iter()
            .flat_map(|handle| Self::tweets_from(&mut rng, handle, query))
            .collect();
        for (platform, accounts) in SOCIAL_ACCOUNTS {
            for account in accounts.iter() {
                posts.extend(Self::posts_from(&mut rng, platform, account, query));
            }
        }
        Ok(posts)
    }
}

/// Synthesizes 1–4 images per source from the last 30 days; wire agencies count as verified.
#[derive(Debug, Clone, Default)]
pub struct SimulatedImageSource;

impl SimulatedImageSource {
    pub fn images_from<R: Rng + ?Sized>(rng: &mut R, source: &str, query: &str) -> Vec<EvidenceItem> {
        let count = rng.gen_range(1..=4);
        let verified = ["Getty", "AP", "Reuters"].iter().any(|agency| source.contains(agency));
        (0..count)
            .map(|i| {
                EvidenceItem::new(
                    format!("{} image from {}", query, source),
                    format!(
                        "https://{}.com/image/{}",
                        source.to_lowercase().replacen(' ', "", 1),
                        post_id(rng, i)
                    ),
                    source,
                    SourceKind::Image,
                )
                .at(minutes_ago(rng, 30 * 24))
                .verified(verified)
            })
            .collect()
    }
}

#[async_trait]
impl ImageSource for SimulatedImageSource {
    async fn images(&self, query: &str) -> anyhow::Result<Vec<EvidenceItem>> {
        let mut rng = rand::thread_rng();
        Ok(IMAGE_SOURCES
            .iter()
            .flat_map(|source| Self::images_from(&mut rng, source, query))
            .collect())
    }
}

/// Official statements are rare: a channel shows fresh activity only with
/// `activity_probability`, and then yields a single statement from the last 24h.
#[derive(Debug, Clone)]
pub struct SimulatedOfficialChannels {
    pub activity_probability: f64,
}

impl SimulatedOfficialChannels {
    pub fn new(activity_probability: f64) -> Self {
        let activity_probability = if activity_probability.is_nan() {
            0.0
        } else {
            activity_probability.clamp(0.0, 1.0)
        };
        Self {
            activity_probability,
        }
    }

    pub fn statement<R: Rng + ?Sized>(
        rng: &mut R,
        entity: &Entity,
        channel: &OfficialChannel,
    ) -> EvidenceItem {
        let publisher = channel.twitter.or(channel.website).unwrap_or("official");
        let account = channel
            .twitter
            .map(|handle| handle.trim_start_matches('@'))
            .unwrap_or("official");
        EvidenceItem::new(
            format!("Official {} statement - Last 24hrs", entity.name),
            format!("https://twitter.com/{}", account),
            publisher,
            SourceKind::OfficialUpdate,
        )
        .at(minutes_ago(rng, 24))
        .verified(channel.verified)
    }
}

impl Default for SimulatedOfficialChannels {
    fn default() -> Self {
        Self::new(0.3)
    }
}

#[async_trait]
impl OfficialChannelSource for SimulatedOfficialChannels {
    async fn recent_updates(
        &self,
        entity: &Entity,
        channel: &OfficialChannel,
    ) -> anyhow::Result<Vec<EvidenceItem>> {
        let mut rng = rand::thread_rng();
        if !rng.gen_bool(self.activity_probability) {
            return Ok(Vec::new());
        }
        Ok(vec![Self::statement(&mut rng, entity, channel)])
    }
}
