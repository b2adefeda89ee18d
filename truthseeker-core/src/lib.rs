pub mod aggregate;
pub mod checker;
pub mod classify;
pub mod config;
pub mod coordinator;
pub mod entities;
pub mod error;
pub mod extract;
pub mod facts;
pub mod gemini;
pub mod ipc;
pub mod local_workflow;
pub mod models;
pub mod offline;
pub mod reports;
pub mod sources;
pub mod validator;
pub mod workflow;

pub use aggregate::{AggregatedEvidence, SourceAggregator};
pub use checker::{FactChecker, SystemCheck};
pub use classify::{classify, Verdict};
pub use config::SeekerConfig;
pub use coordinator::FallbackCoordinator;
pub use entities::extract_entities;
pub use error::SeekerError;
pub use extract::{ContentExtractor, Submission};
pub use gemini::{AiError, AiVerifier, GeminiConfig, GeminiVerifier};
pub use local_workflow::LocalWorkflow;
pub use offline::OfflineFallback;
pub use reports::{JsonlReportStore, MemoryReportStore, ReportService, ReportStore};
pub use validator::ResultValidator;
pub use workflow::{
    normalize_response, WebhookWorkflowClient, WorkflowBackend, WorkflowError, WorkflowReply,
};
