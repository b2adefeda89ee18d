//! Workflow Client: primary verification path through an automation webhook
//!
//! The webhook answers in one of two shapes (`classification/confidence/reason/
//! sources` or `result/score/explanation/relevantArticles`). Both decode into
//! `WorkflowReply`, which `normalize_response` turns into the canonical result.
//! No retries happen here; the coordinator falls through on any error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SeekerError;
use crate::models::result::clamp_confidence;
use crate::models::{
    Classification, EvidenceItem, SourceKind, Stage, VerificationRequest, VerificationResult,
};

pub const DEFAULT_TITLE: &str = "User Submitted Content";
pub const DEFAULT_REASON: &str = "Analysis completed via workflow";
pub const DEFAULT_CONFIDENCE: u8 = 75;
pub const UNTITLED_SOURCE: &str = "Untitled Source";
const WORKFLOW_PUBLISHER: &str = "Workflow Automation";
const PAYLOAD_SOURCE: &str = "TruthSeeker_Frontend";

#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    async fn submit(&self, request: &VerificationRequest)
        -> Result<VerificationResult, WorkflowError>;

    fn name(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Undecodable webhook response: {0}")]
    Decode(String),
}

impl From<WorkflowError> for SeekerError {
    fn from(e: WorkflowError) -> Self {
        SeekerError::WorkflowUnavailable(e.to_string())
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Body POSTed to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPayload {
    pub title: String,
    pub content_snippet: String,
    pub link: String,
    pub input_type: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl From<&VerificationRequest> for WorkflowPayload {
    fn from(request: &VerificationRequest) -> Self {
        Self {
            title: request
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content_snippet: request.query.clone(),
            link: request.source_url.clone().unwrap_or_default(),
            input_type: request.input_type.as_str().to_string(),
            timestamp: request.timestamp,
            source: PAYLOAD_SOURCE.to_string(),
        }
    }
}

/// Webhook answer, carrying both naming conventions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<EvidenceItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_articles: Option<Vec<EvidenceItem>>,
}

/// Placeholder used when the workflow reports no sources.
pub fn workflow_placeholder(url: &str) -> EvidenceItem {
    EvidenceItem::new(
        "Workflow Analysis",
        url,
        WORKFLOW_PUBLISHER,
        SourceKind::WorkflowAnalysis,
    )
    .verified(true)
}

/// Fold either reply shape into a `VerificationResult`. A confidence of 0 is
/// a real value, not a missing one.
pub fn normalize_response(reply: WorkflowReply, placeholder_url: &str) -> VerificationResult {
    let classification = reply
        .classification
        .or(reply.result)
        .map(|label| Classification::from_label(&label))
        .unwrap_or(Classification::Unverified);

    let confidence = reply
        .confidence
        .or(reply.score)
        .map(clamp_confidence)
        .unwrap_or(DEFAULT_CONFIDENCE);

    let reason = reply
        .reason
        .or(reply.explanation)
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REASON.to_string());

    let mut sources: Vec<EvidenceItem> = reply
        .sources
        .or(reply.relevant_articles)
        .unwrap_or_default()
        .into_iter()
        .filter_map(fill_source)
        .collect();
    if sources.is_empty() {
        sources.push(workflow_placeholder(placeholder_url));
    }

    VerificationResult::new(classification, confidence, reason, sources)
        .processed_by(Stage::Workflow)
}

/// Fill the fields an upstream source entry left out. Entries with neither a
/// title nor a url carry nothing to show and are dropped.
fn fill_source(mut item: EvidenceItem) -> Option<EvidenceItem> {
    let has_title = !item.title.trim().is_empty();
    let has_url = !item.url.trim().is_empty();
    if !has_title && !has_url {
        return None;
    }
    if !has_title {
        item.title = UNTITLED_SOURCE.to_string();
    }
    if !has_url {
        item.url = "#".to_string();
    }
    if item.publisher.trim().is_empty() {
        item.publisher = reqwest::Url::parse(&item.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| WORKFLOW_PUBLISHER.to_string());
    }
    Some(item)
}

// ============================================================================
// Webhook client
// ============================================================================

#[derive(Debug, Clone)]
pub struct WebhookWorkflowClient {
    client: Client,
    webhook_url: String,
}

impl WebhookWorkflowClient {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, WorkflowError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

#[async_trait]
impl WorkflowBackend for WebhookWorkflowClient {
    async fn submit(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, WorkflowError> {
        let payload = WorkflowPayload::from(request);
        tracing::info!(url = %self.webhook_url, input_type = %payload.input_type, "Calling workflow webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(code = status.as_u16(), body = %body, "Workflow webhook error");
            return Err(WorkflowError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let reply: WorkflowReply =
            serde_json::from_str(&body).map_err(|e| WorkflowError::Decode(e.to_string()))?;

        let result = normalize_response(reply, &self.webhook_url);
        tracing::info!(
            classification = %result.classification,
            confidence = result.confidence,
            "Workflow verdict"
        );
        Ok(result)
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
