//! User feedback reports: compose the admin notification and persist the
//! report to an append-only store.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::SeekerError;
use crate::models::{ReportReceipt, ReportSubmission, StoredReport};

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn append(&self, report: &StoredReport) -> Result<(), SeekerError>;

    async fn list(&self) -> Result<Vec<StoredReport>, SeekerError>;
}

// ============================================================================
// JSONL store
// ============================================================================

/// One JSON object per line. Writers serialize through the mutex.
pub struct JsonlReportStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ReportStore for JsonlReportStore {
    async fn append(&self, report: &StoredReport) -> Result<(), SeekerError> {
        let mut line = serde_json::to_string(report)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredReport>, SeekerError> {
        let _guard = self.lock.lock().await;
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(SeekerError::from))
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryReportStore {
    reports: Mutex<Vec<StoredReport>>,
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn append(&self, report: &StoredReport) -> Result<(), SeekerError> {
        self.reports.lock().await.push(report.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredReport>, SeekerError> {
        Ok(self.reports.lock().await.clone())
    }
}

// ============================================================================
// ReportService
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminEmail {
    pub to: String,
    pub from_name: String,
    pub subject: String,
    pub message: String,
}

pub fn compose_email(admin: &str, report: &ReportSubmission) -> AdminEmail {
    let email = report.user_email.as_deref().filter(|e| !e.trim().is_empty());
    let message = format!(
        "FACT-CHECK REPORT\n\n\
         Original Claim: \"{}\"\n\
         Our Result: {} ({}% confidence)\n\
         User Says: {}\n\n\
         Reason for Report: {}\n\
         User Comments: {}\n\n\
         Submitted: {}\n\
         User Email: {}\n",
        report.original_claim,
        report.classification,
        report.confidence,
        report.user_feedback,
        report.report_reason,
        report.user_comments,
        Utc::now().to_rfc3339(),
        email.unwrap_or("Not provided"),
    );

    AdminEmail {
        to: admin.to_string(),
        from_name: email.unwrap_or("Anonymous User").to_string(),
        subject: format!("Fact-Check Report: {}", report.classification),
        message,
    }
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    admin_email: String,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, admin_email: impl Into<String>) -> Self {
        Self {
            store,
            admin_email: admin_email.into(),
        }
    }

    pub async fn submit(&self, report: ReportSubmission) -> ReportReceipt {
        let email = compose_email(&self.admin_email, &report);
        tracing::info!(to = %email.to, subject = %email.subject, from = %email.from_name, "Sending report email");

        let stored = StoredReport {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            report,
        };

        match self.store.append(&stored).await {
            Ok(()) => {
                tracing::info!(id = %stored.id, "Report logged");
                ReportReceipt {
                    success: true,
                    message: "Report sent successfully".to_string(),
                    id: Some(stored.id),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to store report");
                ReportReceipt {
                    success: false,
                    message: "Failed to send report".to_string(),
                    id: None,
                }
            }
        }
    }

    pub async fn reports(&self) -> Result<Vec<StoredReport>, SeekerError> {
        self.store.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ReportSubmission {
        ReportSubmission {
            original_claim: "The earth is flat".into(),
            classification: "Potential Misinformation".into(),
            confidence: 99,
            user_feedback: "Correct".into(),
            report_reason: "Just confirming".into(),
            user_comments: "".into(),
            user_email: None,
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ReportStore for BrokenStore {
        async fn append(&self, _report: &StoredReport) -> Result<(), SeekerError> {
            Err(SeekerError::Other("disk full".into()))
        }

        async fn list(&self) -> Result<Vec<StoredReport>, SeekerError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_compose_email() {
        let email = compose_email("admin@truthseeker.com", &submission());
        assert_eq!(email.subject, "Fact-Check Report: Potential Misinformation");
        assert_eq!(email.from_name, "Anonymous User");
        assert!(email.message.contains("Original Claim: \"The earth is flat\""));
        assert!(email.message.contains("Our Result: Potential Misinformation (99% confidence)"));
        assert!(email.message.contains("User Email: Not provided"));
    }

    #[tokio::test]
    async fn test_submit_to_memory_store() {
        let store = Arc::new(MemoryReportStore::default());
        let service = ReportService::new(store.clone(), "admin@truthseeker.com");

        let receipt = service.submit(submission()).await;
        assert!(receipt.success);
        let reports = store.list().await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(Some(reports[0].id), receipt.id);
        assert_eq!(reports[0].report, submission());
    }

    #[tokio::test]
    async fn test_jsonl_store_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.jsonl");
        let service = ReportService::new(Arc::new(JsonlReportStore::new(&path)), "admin@x");

        assert!(service.submit(submission()).await.success);
        let mut second = submission();
        second.user_email = Some("reader@example.com".into());
        assert!(service.submit(second).await.success);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains("\"originalClaim\":\"The earth is flat\""));

        let reports = service.reports().await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].report.user_email.as_deref(), Some("reader@example.com"));
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlReportStore::new(dir.path().join("none.jsonl"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_reported_in_receipt() {
        let service = ReportService::new(Arc::new(BrokenStore), "admin@x");
        let receipt = service.submit(submission()).await;
        assert!(!receipt.success);
        assert_eq!(receipt.message, "Failed to send report");
        assert!(receipt.id.is_none());
    }
}
