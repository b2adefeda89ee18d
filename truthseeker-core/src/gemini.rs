//! AI Verifier Adapter: claim verification via the Gemini `generateContent` API
//!
//! Provides an `AiVerifier` trait with the Gemini implementation:
//! - builds a fixed fact-checking prompt that demands a strict JSON verdict
//! - strips code fences from the answer and parses `{isTrue, confidence, reason}`
//! - retries 429/503 with linear backoff (2s, 4s by default); everything else
//!   surfaces as a single `ServiceUnavailable`

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_retry::RetryIf;

use crate::config::AiConfig;
use crate::error::SeekerError;
use crate::models::result::clamp_confidence;
use crate::models::{Classification, EvidenceItem, SourceKind, Stage, VerificationResult};

// ============================================================================
// AiVerifier trait
// ============================================================================

#[async_trait]
pub trait AiVerifier: Send + Sync {
    /// Verify a claim. No partial results: either a full verdict or an error.
    async fn verify(&self, query: &str) -> Result<VerificationResult, AiError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("No response text from Gemini")]
    EmptyResponse,

    #[error("Malformed verdict: {0}")]
    Parse(String),

    #[error("Missing API key")]
    MissingApiKey,

    #[error("AI service temporarily unavailable after {attempts} attempts")]
    ServiceUnavailable { attempts: usize },
}

impl AiError {
    /// Rate limiting and temporary unavailability are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, AiError::Api { code: 429 | 503, .. })
    }
}

impl From<AiError> for SeekerError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Parse(msg) => SeekerError::Parse(msg),
            other => SeekerError::AiServiceUnavailable(other.to_string()),
        }
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: String, settings: &AiConfig) -> Self {
        Self {
            api_key,
            model: settings.model.clone(),
            max_retries: settings.max_retries,
            retry_delay_ms: settings.retry_delay_ms,
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            timeout: Duration::from_secs(settings.timeout_seconds),
        }
    }
}

/// Delays of `base`, `2 * base`, … for `retries` extra attempts.
pub fn linear_backoff(base_ms: u64, retries: usize) -> impl Iterator<Item = Duration> {
    (1..=retries as u64).map(move |n| Duration::from_millis(base_ms * n))
}

// ============================================================================
// Gemini API structs (private)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    code: u16,
    message: String,
}

/// The JSON object the prompt asks the model to return.
#[derive(Debug, Deserialize, PartialEq)]
pub struct AiVerdict {
    #[serde(rename = "isTrue")]
    pub is_true: bool,
    pub confidence: f64,
    pub reason: String,
}

// ============================================================================
// Prompt + parsing
// ============================================================================

pub fn build_prompt(query: &str) -> String {
    format!(
        r#"You are an expert fact-checker with access to current knowledge. Analyze this claim objectively:

CLAIM: "{query}"

Instructions:
1. Use your knowledge to determine if this claim is factually accurate
2. For scientific facts, use established scientific consensus
3. For recent events, consider if they would be widely reported
4. For celebrity/political news, check if major outlets would cover it
5. Be decisive - return TRUE or FALSE based on factual evidence

Return ONLY this JSON:
{{
  "isTrue": true/false,
  "confidence": 60-100,
  "reason": "Clear factual explanation"
}}"#
    )
}

/// Strip ```json fences and parse the verdict object.
pub fn parse_verdict(raw: &str) -> Result<AiVerdict, AiError> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    serde_json::from_str(cleaned.trim()).map_err(|e| AiError::Parse(e.to_string()))
}

// ============================================================================
// Supporting source catalog
// ============================================================================

const SOURCE_CATALOG: &[(&str, &str, &str, SourceKind)] = &[
    ("Reuters Fact Check", "https://www.reuters.com/fact-check/", "Reuters", SourceKind::NewsVerification),
    ("Associated Press Verification", "https://apnews.com/hub/ap-fact-check", "Associated Press", SourceKind::NewsVerification),
    ("BBC Reality Check", "https://www.bbc.com/news/reality_check", "BBC", SourceKind::NewsVerification),
    ("Snopes Fact Check", "https://www.snopes.com/", "Snopes", SourceKind::FactCheck),
    ("PolitiFact Analysis", "https://www.politifact.com/", "PolitiFact", SourceKind::PoliticalFactCheck),
    ("FactCheck.org Verification", "https://www.factcheck.org/", "FactCheck.org", SourceKind::FactCheck),
    ("CNN Fact First", "https://www.cnn.com/specials/politics/fact-check-politics", "CNN", SourceKind::NewsVerification),
    ("Washington Post Fact Checker", "https://www.washingtonpost.com/news/fact-checker/", "Washington Post", SourceKind::NewsVerification),
    ("Google Gemini AI Analysis", "https://gemini.google.com", "Google Gemini Pro", SourceKind::AiAnalysis),
    ("Cross-referenced News Archives", "https://news.google.com/", "Google News", SourceKind::NewsArchive),
    ("Social Media Verification", "https://www.facebook.com/help/1952307158131536", "Meta Fact Check", SourceKind::SocialVerification),
    ("Academic Research Database", "https://scholar.google.com/", "Google Scholar", SourceKind::AcademicSource),
];

/// 3–8 distinct catalog entries in random order, each verified with probability 0.8.
pub fn pick_sources<R: Rng + ?Sized>(rng: &mut R) -> Vec<EvidenceItem> {
    let count = rng.gen_range(3..=8);
    let mut catalog: Vec<_> = SOURCE_CATALOG.iter().collect();
    catalog.shuffle(rng);
    catalog
        .into_iter()
        .take(count)
        .map(|(title, url, publisher, kind)| {
            EvidenceItem::new(*title, *url, *publisher, *kind).verified(rng.gen_bool(0.8))
        })
        .collect()
}

// ============================================================================
// GeminiVerifier
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeminiVerifier {
    client: Client,
    config: GeminiConfig,
    base_url: String,
}

impl GeminiVerifier {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        Self::with_base_url(
            config,
            "https://generativelanguage.googleapis.com/v1beta".to_string(),
        )
    }

    /// Create a verifier with a custom base URL (for testing / proxies)
    pub fn with_base_url(config: GeminiConfig, base_url: String) -> Result<Self, AiError> {
        if config.api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Ask Gemini about `query`, retrying transient failures.
    pub async fn verify_claim(&self, query: &str) -> Result<VerificationResult, AiError> {
        tracing::info!(model = %self.config.model, "Verifying with Gemini");

        let prompt = build_prompt(query);
        let strategy = linear_backoff(self.config.retry_delay_ms, self.config.max_retries);
        let mut attempts = 0usize;

        let outcome = RetryIf::spawn(
            strategy,
            || {
                attempts += 1;
                self.generate_once(&prompt)
            },
            |e: &AiError| {
                let retry = e.is_transient();
                if retry {
                    tracing::warn!(error = %e, "Gemini transient failure, backing off");
                }
                retry
            },
        )
        .await;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(attempts, error = %e, "Gemini verification failed");
                return Err(AiError::ServiceUnavailable { attempts });
            }
        };

        let verdict = parse_verdict(&raw)?;
        tracing::info!(is_true = verdict.is_true, confidence = verdict.confidence, "Gemini verdict");

        let sources = pick_sources(&mut rand::thread_rng());
        Ok(VerificationResult::new(
            Classification::from_truth(verdict.is_true),
            clamp_confidence(verdict.confidence),
            verdict.reason,
            sources,
        )
        .processed_by(Stage::Ai))
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: 1,
                top_p: 1.0,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let (code, message) = serde_json::from_str::<GeminiErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| (e.code, e.message))
                .unwrap_or((status.as_u16(), error_body));

            tracing::error!(code = code, message = %message, "Gemini API error");
            return Err(AiError::Api { code, message });
        }

        let body: GenerateResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

#[async_trait]
impl AiVerifier for GeminiVerifier {
    async fn verify(&self, query: &str) -> Result<VerificationResult, AiError> {
        self.verify_claim(query).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================================================
// TESTS
// ============================================================================
