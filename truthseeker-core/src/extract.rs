//! Content extraction: turns a raw submission into a `VerificationRequest`.
//!
//! Text passes straight through. URLs go through a `PageExtractor` and images
//! through an `OcrProvider`; when either fails the URL or file name itself is
//! checked instead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::SeekerError;
use crate::models::{InputType, VerificationRequest};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub file_name: String,
    #[serde(default)]
    pub size: u64,
}

/// Raw user input as received by a transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageUpload>,
}

impl Submission {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Text,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            input_type: InputType::Url,
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn image(file_name: impl Into<String>, size: u64) -> Self {
        Self {
            input_type: InputType::Image,
            image: Some(ImageUpload {
                file_name: file_name.into(),
                size,
            }),
            ..Default::default()
        }
    }

    /// Whether the field matching `input_type` carries anything to check.
    pub fn has_content(&self) -> bool {
        let non_blank = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        match self.input_type {
            InputType::Text => non_blank(&self.text),
            InputType::Url => non_blank(&self.url),
            InputType::Image => self
                .image
                .as_ref()
                .is_some_and(|i| !i.file_name.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPage {
    pub title: String,
    pub content: String,
    pub author: String,
    pub publish_date: DateTime<Utc>,
    pub domain: String,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    pub confidence: u8,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    pub text: String,
    pub confidence: u8,
    pub language: String,
    pub text_blocks: Vec<TextBlock>,
}

// ============================================================================
// Provider traits
// ============================================================================

#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> anyhow::Result<ExtractedPage>;
}

#[async_trait]
pub trait OcrProvider: Send + Sync {
    async fn extract(&self, image: &ImageUpload) -> anyhow::Result<OcrResult>;
}

// ============================================================================
// Simulated providers
// ============================================================================

const PAGE_TEMPLATES: &[(&str, &str, &str, &str)] = &[
    (
        "timesofindia.indiatimes.com",
        "Breaking News from Times of India",
        "This is a simulated article content from Times of India. The article discusses recent developments in Indian politics and economy. Key points include government policies, market trends, and social issues affecting the nation.",
        "TOI Reporter",
    ),
    (
        "ndtv.com",
        "NDTV News Report",
        "NDTV reports on current affairs with detailed analysis. This simulated content covers breaking news, political updates, and comprehensive coverage of national and international events.",
        "NDTV Correspondent",
    ),
    (
        "cnn.com",
        "CNN Breaking News",
        "CNN provides comprehensive coverage of global events. This simulated article includes analysis of international politics, business news, and social developments affecting worldwide communities.",
        "CNN Reporter",
    ),
    (
        "bbc.com",
        "BBC World News",
        "BBC delivers trusted news coverage with in-depth reporting. This simulated content focuses on global affairs, technology trends, and cultural developments across different regions.",
        "BBC Correspondent",
    ),
];

const GENERIC_PAGE: (&str, &str, &str) = (
    "News Article",
    "This is simulated article content extracted from the provided URL. The content includes relevant information about the topic being fact-checked.",
    "News Reporter",
);

/// Domain-keyed article templates with a random publish date in the last week.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPageExtractor;

impl SimulatedPageExtractor {
    pub fn page_for<R: Rng + ?Sized>(rng: &mut R, url: &str) -> anyhow::Result<ExtractedPage> {
        let parsed = Url::parse(url)?;
        let domain = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL has no host: {}", url))?
            .to_string();

        let (title, body, author) = PAGE_TEMPLATES
            .iter()
            .find(|(d, ..)| *d == domain)
            .map(|(_, t, c, a)| (*t, *c, *a))
            .unwrap_or(GENERIC_PAGE);

        let publish_date = Utc::now() - Duration::seconds(rng.gen_range(0..7 * 24 * 3600));
        let content = format!("{} Published on {}.", body, publish_date.format("%a %b %d %Y"));
        let word_count = content.split(' ').count();

        Ok(ExtractedPage {
            title: title.to_string(),
            content,
            author: author.to_string(),
            publish_date,
            domain,
            word_count,
        })
    }
}

#[async_trait]
impl PageExtractor for SimulatedPageExtractor {
    async fn extract(&self, url: &str) -> anyhow::Result<ExtractedPage> {
        tracing::info!(url, "Extracting text from URL");
        Self::page_for(&mut rand::thread_rng(), url)
    }
}

/// OCR text keyed on file name patterns, 80–99% confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedOcr;

impl SimulatedOcr {
    pub fn read<R: Rng + ?Sized>(rng: &mut R, image: &ImageUpload) -> OcrResult {
        let name = image.file_name.to_lowercase();
        let text = if name.contains("news") || name.contains("article") {
            "BREAKING NEWS: This is simulated text extracted from a news image. The headline reads about recent developments in current affairs. Additional text includes details about the story and relevant quotes from officials."
        } else if name.contains("social") || name.contains("post") {
            "Social media post text: \"This is a simulated social media post extracted from the image. It contains claims about recent events and includes hashtags and mentions.\""
        } else if name.contains("screenshot") {
            "Screenshot text: This appears to be a screenshot containing text about current events. The content discusses various claims and statements that need verification."
        } else {
            "Image contains text: This is simulated OCR text extraction from the uploaded image. The text discusses various topics and claims that require fact-checking verification."
        };
        let confidence = rng.gen_range(80..100);
        let preview: String = text.chars().take(50).collect();

        OcrResult {
            text: text.to_string(),
            confidence,
            language: "en".to_string(),
            text_blocks: vec![TextBlock {
                text: format!("{}...", preview),
                confidence,
                bounding_box: BoundingBox {
                    x: 10,
                    y: 10,
                    width: 200,
                    height: 30,
                },
            }],
        }
    }
}

#[async_trait]
impl OcrProvider for SimulatedOcr {
    async fn extract(&self, image: &ImageUpload) -> anyhow::Result<OcrResult> {
        tracing::info!(file = %image.file_name, size = image.size, "Extracting text from image");
        Ok(Self::read(&mut rand::thread_rng(), image))
    }
}

// ============================================================================
// ContentExtractor
// ============================================================================

#[derive(Clone)]
pub struct ContentExtractor {
    pages: Arc<dyn PageExtractor>,
    ocr: Arc<dyn OcrProvider>,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(Arc::new(SimulatedPageExtractor), Arc::new(SimulatedOcr))
    }
}

impl ContentExtractor {
    pub fn new(pages: Arc<dyn PageExtractor>, ocr: Arc<dyn OcrProvider>) -> Self {
        Self { pages, ocr }
    }

    /// Build the request for a submission. Fails only when the submission
    /// carries nothing to check.
    pub async fn to_request(&self, submission: &Submission) -> Result<VerificationRequest, SeekerError> {
        let request = match submission.input_type {
            InputType::Text => {
                let text = submission.text.as_deref().unwrap_or_default();
                VerificationRequest::new(text, InputType::Text)?
            }
            InputType::Url => {
                let url = submission
                    .url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or(SeekerError::NoContent)?;
                let request = match self.pages.extract(url).await {
                    Ok(page) => VerificationRequest::new(page.content, InputType::Url)?
                        .with_title(page.title),
                    Err(e) => {
                        tracing::warn!(url, error = %e, "URL extraction failed, checking the URL itself");
                        VerificationRequest::new(url, InputType::Url)?
                    }
                };
                request.with_source_url(url)
            }
            InputType::Image => {
                let image = submission.image.as_ref().ok_or(SeekerError::NoContent)?;
                match self.ocr.extract(image).await {
                    Ok(ocr) => VerificationRequest::new(ocr.text, InputType::Image)?
                        .with_title(format!("Image OCR: {}", image.file_name)),
                    Err(e) => {
                        tracing::warn!(file = %image.file_name, error = %e, "OCR failed, checking the file name");
                        VerificationRequest::new(image.file_name.as_str(), InputType::Image)?
                    }
                }
            }
        };

        Ok(match &submission.title {
            Some(title) if request.title.is_none() && !title.trim().is_empty() => {
                request.with_title(title.trim())
            }
            _ => request,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct BrokenPages;

    #[async_trait]
    impl PageExtractor for BrokenPages {
        async fn extract(&self, _url: &str) -> anyhow::Result<ExtractedPage> {
            anyhow::bail!("connection refused")
        }
    }

    struct BrokenOcr;

    #[async_trait]
    impl OcrProvider for BrokenOcr {
        async fn extract(&self, _image: &ImageUpload) -> anyhow::Result<OcrResult> {
            anyhow::bail!("unreadable image")
        }
    }

    fn broken() -> ContentExtractor {
        ContentExtractor::new(Arc::new(BrokenPages), Arc::new(BrokenOcr))
    }

    #[test]
    fn test_page_template_by_domain() {
        let mut rng = StdRng::seed_from_u64(3);
        let page = SimulatedPageExtractor::page_for(&mut rng, "https://ndtv.com/story/1").unwrap();
        assert_eq!(page.domain, "ndtv.com");
        assert_eq!(page.title, "NDTV News Report");
        assert!(page.content.contains("Published on"));
        assert_eq!(page.word_count, page.content.split(' ').count());
        assert!(page.publish_date <= Utc::now());

        let generic = SimulatedPageExtractor::page_for(&mut rng, "https://example.org/x").unwrap();
        assert_eq!(generic.title, "News Article");
    }

    #[test]
    fn test_page_rejects_invalid_url() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(SimulatedPageExtractor::page_for(&mut rng, "not a url").is_err());
    }

    #[test]
    fn test_ocr_patterns_and_confidence() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let ocr = SimulatedOcr::read(
                &mut rng,
                &ImageUpload {
                    file_name: "News_Clip.png".into(),
                    size: 10,
                },
            );
            assert!(ocr.text.starts_with("BREAKING NEWS"));
            assert!((80..=99).contains(&ocr.confidence));
            assert_eq!(ocr.text_blocks.len(), 1);
        }
        let shot = SimulatedOcr::read(
            &mut rng,
            &ImageUpload {
                file_name: "screenshot.jpg".into(),
                size: 10,
            },
        );
        assert!(shot.text.starts_with("Screenshot text"));
    }

    #[test]
    fn test_has_content_follows_input_type() {
        assert!(Submission::text("claim").has_content());
        assert!(!Submission::text("  ").has_content());
        assert!(Submission::url("https://x.com").has_content());
        assert!(Submission::image("a.png", 1).has_content());

        let mismatched = Submission {
            input_type: InputType::Url,
            text: Some("claim".into()),
            ..Default::default()
        };
        assert!(!mismatched.has_content());
    }

    #[tokio::test]
    async fn test_text_submission() {
        let request = ContentExtractor::default()
            .to_request(&Submission::text("  Water boils at 100 degrees  "))
            .await
            .unwrap();
        assert_eq!(request.query, "Water boils at 100 degrees");
        assert_eq!(request.input_type, InputType::Text);
    }

    #[tokio::test]
    async fn test_empty_text_is_no_content() {
        let err = ContentExtractor::default()
            .to_request(&Submission::text("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, SeekerError::NoContent));

        let err = ContentExtractor::default()
            .to_request(&Submission {
                input_type: InputType::Image,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SeekerError::NoContent));
    }

    #[tokio::test]
    async fn test_url_submission_uses_page_content() {
        let request = ContentExtractor::default()
            .to_request(&Submission::url("https://bbc.com/news/1"))
            .await
            .unwrap();
        assert!(request.query.starts_with("BBC delivers trusted news coverage"));
        assert_eq!(request.title.as_deref(), Some("BBC World News"));
        assert_eq!(request.source_url.as_deref(), Some("https://bbc.com/news/1"));
    }

    #[tokio::test]
    async fn test_failed_extraction_falls_back_to_raw_input() {
        let extractor = broken();

        let url = extractor
            .to_request(&Submission::url("https://cnn.com/a"))
            .await
            .unwrap();
        assert_eq!(url.query, "https://cnn.com/a");
        assert_eq!(url.source_url.as_deref(), Some("https://cnn.com/a"));

        let image = extractor
            .to_request(&Submission::image("meme.png", 2048))
            .await
            .unwrap();
        assert_eq!(image.query, "meme.png");
        assert_eq!(image.input_type, InputType::Image);
    }

    #[tokio::test]
    async fn test_image_submission_title() {
        let request = ContentExtractor::default()
            .to_request(&Submission::image("social_post.png", 1024))
            .await
            .unwrap();
        assert_eq!(request.title.as_deref(), Some("Image OCR: social_post.png"));
        assert!(request.query.starts_with("Social media post text"));
    }

    #[tokio::test]
    async fn test_caller_title_used_when_extraction_has_none() {
        let mut submission = Submission::text("Tesla opens a factory");
        submission.title = Some("Tip from a reader".into());
        let request = ContentExtractor::default().to_request(&submission).await.unwrap();
        assert_eq!(request.title.as_deref(), Some("Tip from a reader"));
    }
}
