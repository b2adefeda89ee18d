use truthseeker_core::ipc::{SeekerRequest, SeekerResponse};
use truthseeker_core::{FactChecker, ReportService};

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    pub checker: FactChecker,
    pub reports: ReportService,
    pub socket_path: String,
}

pub async fn handle_request(request: SeekerRequest, ctx: &AppContext) -> SeekerResponse {
    match request {
        SeekerRequest::Ping => SeekerResponse::pong(),
        SeekerRequest::Health => {
            let system = ctx.checker.system_check();
            SeekerResponse::ok(serde_json::json!({
                "status": if system.ready { "healthy" } else { "degraded" },
                "system": system,
                "socket": ctx.socket_path,
            }))
        }
        SeekerRequest::Check { submission } => {
            match ctx.checker.check_submission(&submission).await {
                Ok(result) => match serde_json::to_value(&result) {
                    Ok(data) => SeekerResponse::ok(data),
                    Err(e) => SeekerResponse::err(format!("Failed to encode result: {}", e)),
                },
                Err(e) => SeekerResponse::err(e.to_string()),
            }
        }
        SeekerRequest::Report { report } => {
            let receipt = ctx.reports.submit(report).await;
            if !receipt.success {
                return SeekerResponse::err(receipt.message);
            }
            match serde_json::to_value(&receipt) {
                Ok(data) => SeekerResponse::ok(data),
                Err(e) => SeekerResponse::err(format!("Failed to encode receipt: {}", e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use truthseeker_core::config::WorkflowMode;
    use truthseeker_core::models::ReportSubmission;
    use truthseeker_core::{MemoryReportStore, SeekerConfig, Submission};

    fn context() -> AppContext {
        let mut config = SeekerConfig::default();
        config.workflow.mode = WorkflowMode::Disabled;
        AppContext {
            checker: FactChecker::from_config(&config, None).unwrap(),
            reports: ReportService::new(Arc::new(MemoryReportStore::default()), "admin@x"),
            socket_path: "/tmp/truthseeker-test.sock".into(),
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let response = handle_request(SeekerRequest::Ping, &context()).await;
        assert!(response.is_ok());
        assert_eq!(response.data.unwrap()["pong"], true);
    }

    #[tokio::test]
    async fn test_health_degraded_without_backends() {
        let response = handle_request(SeekerRequest::Health, &context()).await;
        let data = response.data.unwrap();
        assert_eq!(data["status"], "degraded");
        assert_eq!(data["system"]["workflow_mode"], "disabled");
        assert_eq!(data["system"]["ready"], false);
    }

    #[tokio::test]
    async fn test_check_returns_result() {
        let response = handle_request(
            SeekerRequest::Check {
                submission: Submission::text("Water boils at 100 degrees"),
            },
            &context(),
        )
        .await;
        let data = response.data.unwrap();
        assert_eq!(data["classification"], "Verified");
        assert_eq!(data["confidence"], 90);
        assert_eq!(data["corrected"], true);
    }

    #[tokio::test]
    async fn test_check_empty_is_error() {
        let response = handle_request(
            SeekerRequest::Check {
                submission: Submission::text(""),
            },
            &context(),
        )
        .await;
        assert!(!response.is_ok());
        assert_eq!(response.error.as_deref(), Some("No content to verify"));
    }

    #[tokio::test]
    async fn test_report_receipt() {
        let response = handle_request(
            SeekerRequest::Report {
                report: ReportSubmission {
                    original_claim: "claim".into(),
                    classification: "Verified".into(),
                    confidence: 80,
                    user_feedback: "Incorrect".into(),
                    report_reason: "Outdated".into(),
                    user_comments: String::new(),
                    user_email: None,
                },
            },
            &context(),
        )
        .await;
        let data = response.data.unwrap();
        assert_eq!(data["success"], true);
        assert!(data["id"].is_string());
    }
}
