use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeekerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Url,
    #[default]
    Text,
    Image,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Url => "url",
            InputType::Text => "text",
            InputType::Image => "image",
        }
    }
}

/// One user submission, ready for dispatch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub query: String,
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl VerificationRequest {
    /// Build a request, rejecting queries that are empty after trimming.
    pub fn new(query: impl Into<String>, input_type: InputType) -> Result<Self, SeekerError> {
        let query = query.into().trim().to_string();
        if query.is_empty() {
            return Err(SeekerError::NoContent);
        }
        Ok(Self {
            query,
            input_type,
            source_url: None,
            title: None,
            timestamp: Utc::now(),
        })
    }

    pub fn text(query: impl Into<String>) -> Result<Self, SeekerError> {
        Self::new(query, InputType::Text)
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
