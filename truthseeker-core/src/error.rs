use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeekerError {
    #[error("No content to verify")]
    NoContent,

    #[error("Workflow unavailable: {0}")]
    WorkflowUnavailable(String),

    #[error("AI service unavailable: {0}")]
    AiServiceUnavailable(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IPC error: {0}")]
    Ipc(String),

    #[error("Other error: {0}")]
    Other(String),
}
