//! FactChecker: the single verification entry point.
//!
//! Wires extraction, the fallback coordinator and the result validator
//! together from configuration, and reports readiness.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::aggregate::SourceAggregator;
use crate::config::{SeekerConfig, WorkflowMode};
use crate::coordinator::FallbackCoordinator;
use crate::error::SeekerError;
use crate::extract::{ContentExtractor, Submission};
use crate::gemini::{AiVerifier, GeminiConfig, GeminiVerifier};
use crate::local_workflow::LocalWorkflow;
use crate::models::{VerificationRequest, VerificationResult};
use crate::validator::ResultValidator;
use crate::workflow::{WebhookWorkflowClient, WorkflowBackend};

const WEBHOOK_PLACEHOLDER: &str = "your-n8n-instance";
const API_KEY_PLACEHOLDERS: &[&str] = &["your_api_key_here", "your-api-key", "changeme"];

// ============================================================================
// Readiness
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCheck {
    pub ai_configured: bool,
    pub workflow_configured: bool,
    pub workflow_mode: String,
    pub retry_attempts: u32,
    pub ready: bool,
}

pub fn api_key_configured(key: Option<&str>) -> bool {
    key.map(str::trim)
        .map(|k| !k.is_empty() && !API_KEY_PLACEHOLDERS.contains(&k))
        .unwrap_or(false)
}

pub fn webhook_configured(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && !url.contains(WEBHOOK_PLACEHOLDER)
}

impl SystemCheck {
    pub fn from_config(config: &SeekerConfig, ai_key: Option<&str>) -> Self {
        let ai_configured = api_key_configured(ai_key);
        let workflow_configured = match config.workflow.mode {
            WorkflowMode::Webhook => webhook_configured(&config.workflow.webhook_url),
            WorkflowMode::Local => true,
            WorkflowMode::Disabled => false,
        };

        Self {
            ai_configured,
            workflow_configured,
            workflow_mode: config.workflow.mode.as_str().to_string(),
            retry_attempts: config.workflow.retry_attempts,
            ready: ai_configured || workflow_configured,
        }
    }

    pub fn log(&self) {
        if self.workflow_configured {
            tracing::info!(mode = %self.workflow_mode, "Workflow configured, AI verifier as fallback");
        } else if self.ai_configured {
            tracing::info!("Workflow not configured, using the AI verifier directly");
        }
        if self.ready {
            tracing::info!("System check passed");
        } else {
            tracing::warn!("No workflow or AI key configured, only offline checks available");
        }
    }
}

// ============================================================================
// Backend construction
// ============================================================================

pub fn create_workflow_backend(
    config: &SeekerConfig,
) -> Result<Option<Arc<dyn WorkflowBackend>>, SeekerError> {
    let workflow = &config.workflow;
    match workflow.mode {
        WorkflowMode::Disabled => Ok(None),
        WorkflowMode::Local => {
            let aggregator =
                SourceAggregator::simulated(config.aggregator.official_activity_probability);
            let local: Arc<dyn WorkflowBackend> = Arc::new(LocalWorkflow::new(
                aggregator,
                Duration::from_millis(workflow.simulated_latency_ms),
            ));
            Ok(Some(local))
        }
        WorkflowMode::Webhook if !webhook_configured(&workflow.webhook_url) => {
            tracing::warn!(url = %workflow.webhook_url, "Webhook URL not configured, skipping workflow stage");
            Ok(None)
        }
        WorkflowMode::Webhook => {
            let client: Arc<dyn WorkflowBackend> = Arc::new(WebhookWorkflowClient::new(
                workflow.webhook_url.clone(),
                Duration::from_secs(workflow.timeout_seconds),
            )?);
            Ok(Some(client))
        }
    }
}

pub fn create_ai_verifier(
    config: &SeekerConfig,
    ai_key: Option<&str>,
) -> Result<Option<Arc<dyn AiVerifier>>, SeekerError> {
    let Some(key) = ai_key.filter(|k| api_key_configured(Some(*k))) else {
        return Ok(None);
    };
    let verifier: Arc<dyn AiVerifier> = Arc::new(GeminiVerifier::with_base_url(
        GeminiConfig::new(key.trim().to_string(), &config.ai),
        config.ai.base_url.clone(),
    )?);
    Ok(Some(verifier))
}

// ============================================================================
// FactChecker
// ============================================================================

#[derive(Clone)]
pub struct FactChecker {
    extractor: ContentExtractor,
    coordinator: FallbackCoordinator,
    validator: ResultValidator,
    system: SystemCheck,
}

impl FactChecker {
    pub fn new(
        coordinator: FallbackCoordinator,
        extractor: ContentExtractor,
        system: SystemCheck,
    ) -> Self {
        Self {
            extractor,
            coordinator,
            validator: ResultValidator::new(),
            system,
        }
    }

    pub fn from_config(config: &SeekerConfig, ai_key: Option<&str>) -> Result<Self, SeekerError> {
        let workflow = create_workflow_backend(config)?;
        let ai = create_ai_verifier(config, ai_key)?;
        let system = SystemCheck::from_config(config, ai_key);
        system.log();

        Ok(Self::new(
            FallbackCoordinator::new(workflow, ai),
            ContentExtractor::default(),
            system,
        ))
    }

    pub fn system_check(&self) -> &SystemCheck {
        &self.system
    }

    /// Verify a request. Never fails: the worst case is Unverified at 50%.
    pub async fn check_fact(&self, request: &VerificationRequest) -> VerificationResult {
        tracing::info!(input_type = %request.input_type.as_str(), "Checking fact");
        let result = self.coordinator.run(request).await;
        let result = self.validator.validate(&request.query, result);
        tracing::info!(
            classification = %result.classification,
            confidence = result.confidence,
            corrected = result.corrected,
            "Fact check complete"
        );
        result
    }

    /// Extract content from a raw submission, then verify it.
    pub async fn check_submission(
        &self,
        submission: &Submission,
    ) -> Result<VerificationResult, SeekerError> {
        let request = self.extractor.to_request(submission).await?;
        Ok(self.check_fact(&request).await)
    }
}
