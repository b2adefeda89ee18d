use serde::{Deserialize, Serialize};

use crate::extract::Submission;
use crate::models::ReportSubmission;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SeekerRequest {
    Ping,
    Health,
    Check { submission: Submission },
    Report { report: ReportSubmission },
}

impl SeekerRequest {
    /// Wire name of the request, as carried in the `action` tag.
    pub fn action(&self) -> &'static str {
        match self {
            SeekerRequest::Ping => "ping",
            SeekerRequest::Health => "health",
            SeekerRequest::Check { .. } => "check",
            SeekerRequest::Report { .. } => "report",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeekerResponse {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub version: String,
}

impl SeekerResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(msg.into()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(serde_json::json!({"pong": true}))
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
