//! In-process stand-in for the remote workflow.
//!
//! Runs aggregation and classification locally and answers in the workflow's
//! alternate reply shape, so the result goes through the same normalizer as a
//! real webhook answer.

use std::time::Duration;

use async_trait::async_trait;

use crate::aggregate::SourceAggregator;
use crate::classify::classify;
use crate::models::{
    Classification, EvidenceItem, SourceKind, VerificationRequest, VerificationResult,
};
use crate::workflow::{normalize_response, WorkflowBackend, WorkflowError, WorkflowReply};

const LOCAL_WORKFLOW_URL: &str = "local://workflow";

#[derive(Clone)]
pub struct LocalWorkflow {
    aggregator: SourceAggregator,
    latency: Duration,
}

impl LocalWorkflow {
    pub fn new(aggregator: SourceAggregator, latency: Duration) -> Self {
        Self {
            aggregator,
            latency,
        }
    }

    /// Run the workflow and return its raw reply.
    pub async fn analyze(&self, request: &VerificationRequest) -> WorkflowReply {
        let content = request.query.as_str();
        let evidence = self.aggregator.aggregate(content).await;
        let verdict = classify(
            &evidence.entities,
            &evidence.official_updates,
            &evidence.all,
            content,
        );

        let mut relevant = evidence.official_updates.clone();
        relevant.extend(reference_articles(content));
        relevant.extend(evidence.all);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if verdict.classification == Classification::PotentialMisinformation {
            tracing::warn!(
                title = request.title.as_deref().unwrap_or("-"),
                reason = %verdict.reason,
                relevant_articles = relevant.len(),
                official_sources_checked = evidence.official_updates.len(),
                "Misinformation alert"
            );
        }
        if !evidence.official_updates.is_empty() {
            let handles: Vec<&str> = evidence
                .official_updates
                .iter()
                .map(|u| u.publisher.as_str())
                .collect();
            tracing::info!(?handles, "Official sources checked (last 24h)");
        }

        WorkflowReply {
            result: Some(verdict.classification.as_str().to_string()),
            explanation: Some(verdict.reason),
            relevant_articles: Some(relevant),
            ..Default::default()
        }
    }
}

#[async_trait]
impl WorkflowBackend for LocalWorkflow {
    async fn submit(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResult, WorkflowError> {
        let reply = self.analyze(request).await;
        Ok(normalize_response(reply, LOCAL_WORKFLOW_URL))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Topical fact-check references for a claim.
pub fn reference_articles(content: &str) -> Vec<EvidenceItem> {
    let text = content.to_lowercase();
    let table: &[(&str, &str, &str)] = if text.contains("covid") || text.contains("vaccine") {
        &[
            ("WHO COVID-19 Official Guidelines", "https://www.who.int/emergencies/diseases/novel-coronavirus-2019", "WHO"),
            ("CDC COVID-19 Vaccine Information", "https://www.cdc.gov/coronavirus/2019-ncov/vaccines/", "CDC"),
            ("Reuters Fact Check: COVID-19 Vaccines", "https://www.reuters.com/fact-check/covid-vaccines/", "Reuters"),
        ]
    } else if text.contains("climate") || text.contains("global warming") {
        &[
            ("NASA Climate Change Evidence", "https://climate.nasa.gov/evidence/", "NASA"),
            ("IPCC Climate Reports", "https://www.ipcc.ch/reports/", "IPCC"),
            ("Scientific Consensus on Climate Change", "https://climate.nasa.gov/scientific-consensus/", "NASA"),
        ]
    } else if text.contains("election") || text.contains("voting") {
        &[
            ("Official Election Results", "https://www.fec.gov/", "FEC"),
            ("AP Election Coverage", "https://apnews.com/hub/election-2024", "Associated Press"),
            ("Fact Check: Election Claims", "https://www.factcheck.org/tag/elections/", "FactCheck.org"),
        ]
    } else {
        &[
            ("Snopes Fact Check Database", "https://www.snopes.com/", "Snopes"),
            ("Reuters Fact Check", "https://www.reuters.com/fact-check/", "Reuters"),
            ("Associated Press Fact Check", "https://apnews.com/hub/ap-fact-check", "AP News"),
        ]
    };

    table
        .iter()
        .map(|(title, url, publisher)| EvidenceItem::new(*title, *url, *publisher, SourceKind::Reference))
        .collect()
}
