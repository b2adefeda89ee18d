//! Fallback Coordinator
//!
//! Walks `Workflow -> Ai -> Offline`. The first stage that completes produces
//! the result; an error or an unconfigured stage advances to the next. The
//! offline stage cannot fail, so `run` always returns a result.

use std::sync::Arc;

use crate::gemini::AiVerifier;
use crate::models::{VerificationRequest, VerificationResult};
use crate::offline::OfflineFallback;
use crate::workflow::WorkflowBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    TryWorkflow,
    TryAi,
    TryOffline,
}

#[derive(Clone)]
pub struct FallbackCoordinator {
    workflow: Option<Arc<dyn WorkflowBackend>>,
    ai: Option<Arc<dyn AiVerifier>>,
    offline: OfflineFallback,
}

impl FallbackCoordinator {
    pub fn new(
        workflow: Option<Arc<dyn WorkflowBackend>>,
        ai: Option<Arc<dyn AiVerifier>>,
    ) -> Self {
        Self {
            workflow,
            ai,
            offline: OfflineFallback::new(),
        }
    }

    pub fn has_workflow(&self) -> bool {
        self.workflow.is_some()
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    pub async fn run(&self, request: &VerificationRequest) -> VerificationResult {
        let mut step = Step::TryWorkflow;
        loop {
            match step {
                Step::TryWorkflow => {
                    step = Step::TryAi;
                    let Some(workflow) = &self.workflow else {
                        tracing::debug!("Workflow not configured, skipping");
                        continue;
                    };
                    match workflow.submit(request).await {
                        Ok(result) => return result.ensure_contract(),
                        Err(e) => {
                            tracing::warn!(backend = workflow.name(), error = %e, "Workflow failed, falling back to AI");
                        }
                    }
                }
                Step::TryAi => {
                    step = Step::TryOffline;
                    let Some(ai) = &self.ai else {
                        tracing::debug!("AI verifier not configured, skipping");
                        continue;
                    };
                    match ai.verify(&request.query).await {
                        Ok(result) => return result.ensure_contract(),
                        Err(e) => {
                            tracing::warn!(backend = ai.name(), error = %e, "AI verification failed, using offline fallback");
                        }
                    }
                }
                Step::TryOffline => {
                    return self.offline.basic_fact_check(&request.query).ensure_contract();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::AiError;
    use crate::models::{Classification, EvidenceItem, SourceKind, Stage};
    use crate::workflow::WorkflowError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FailingWorkflow {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WorkflowBackend for FailingWorkflow {
        async fn submit(
            &self,
            _request: &VerificationRequest,
        ) -> Result<VerificationResult, WorkflowError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(WorkflowError::Status {
                code: 503,
                body: "down".into(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SourcelessWorkflow;

    #[async_trait]
    impl WorkflowBackend for SourcelessWorkflow {
        async fn submit(
            &self,
            _request: &VerificationRequest,
        ) -> Result<VerificationResult, WorkflowError> {
            Ok(VerificationResult::new(Classification::Verified, 80, "ok", vec![])
                .processed_by(Stage::Workflow))
        }

        fn name(&self) -> &str {
            "sourceless"
        }
    }

    #[derive(Default)]
    struct FixedAi {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AiVerifier for FixedAi {
        async fn verify(&self, _query: &str) -> Result<VerificationResult, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AiError::ServiceUnavailable { attempts: 3 });
            }
            Ok(VerificationResult::new(
                Classification::PotentialMisinformation,
                82,
                "model says no",
                vec![EvidenceItem::new("a", "https://a", "a", SourceKind::AiAnalysis)],
            )
            .processed_by(Stage::Ai))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn request(query: &str) -> VerificationRequest {
        VerificationRequest::text(query).unwrap()
    }

    #[tokio::test]
    async fn test_workflow_failure_falls_to_ai() {
        let workflow = Arc::new(FailingWorkflow::default());
        let ai = Arc::new(FixedAi::default());
        let coordinator = FallbackCoordinator::new(Some(workflow.clone()), Some(ai.clone()));

        let result = coordinator.run(&request("The mayor bought a boat")).await;
        assert_eq!(result.processed_by, Some(Stage::Ai));
        assert_eq!(result.reason, "model says no");
        assert_eq!(workflow.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_everything_down_reaches_offline() {
        let ai = Arc::new(FixedAi {
            fail: true,
            ..Default::default()
        });
        let coordinator = FallbackCoordinator::new(
            Some(Arc::new(FailingWorkflow::default())),
            Some(ai),
        );

        let result = coordinator.run(&request("Delhi is the capital of India")).await;
        assert_eq!(result.processed_by, Some(Stage::Offline));
        assert_eq!(result.classification, Classification::Verified);
        assert_eq!(result.confidence, 95);
    }

    #[tokio::test]
    async fn test_unconfigured_stages_skipped() {
        let coordinator = FallbackCoordinator::new(None, None);
        assert!(!coordinator.has_workflow());
        assert!(!coordinator.has_ai());

        let result = coordinator.run(&request("The mayor bought a boat")).await;
        assert_eq!(result.classification, Classification::Unverified);
        assert_eq!(result.confidence, 50);
        assert_eq!(result.sources.len(), 1);
    }

    #[tokio::test]
    async fn test_first_success_wins_without_merging() {
        let ai = Arc::new(FixedAi::default());
        let coordinator = FallbackCoordinator::new(Some(Arc::new(SourcelessWorkflow)), Some(ai.clone()));

        let result = coordinator.run(&request("anything")).await;
        assert_eq!(result.processed_by, Some(Stage::Workflow));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.sources.len(), 1, "contract adds a placeholder");
    }

    #[tokio::test]
    async fn test_coordinator_does_not_validate() {
        let coordinator = FallbackCoordinator::new(None, Some(Arc::new(FixedAi::default())));
        let result = coordinator.run(&request("The sun rises in the east")).await;
        assert_eq!(result.classification, Classification::PotentialMisinformation);
        assert!(!result.corrected);
    }
}
