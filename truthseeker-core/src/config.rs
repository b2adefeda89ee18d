use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variables consulted (in order) for the Gemini API key.
pub const AI_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeekerConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub reports: ReportConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub socket_path: String,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            socket_path: "/tmp/truthseeker.sock".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Which implementation answers the workflow stage.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    #[default]
    Webhook,
    Local,
    Disabled,
}

impl WorkflowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowMode::Webhook => "webhook",
            WorkflowMode::Local => "local",
            WorkflowMode::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkflowConfig {
    pub mode: WorkflowMode,
    pub webhook_url: String,
    pub timeout_seconds: u64,
    /// Declared for the webhook deployment; the client itself never retries.
    pub retry_attempts: u32,
    pub simulated_latency_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            mode: WorkflowMode::Webhook,
            webhook_url: "http://localhost:5678/webhook/fact-check".to_string(),
            timeout_seconds: 30,
            retry_attempts: 2,
            simulated_latency_ms: 2000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub model: String,
    pub base_url: String,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_retries: 2,
            retry_delay_ms: 2000,
            temperature: 0.1,
            max_output_tokens: 1024,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Chance that a registered official channel shows activity in the last 24h.
    pub official_activity_probability: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            official_activity_probability: 0.3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub path: String,
    pub admin_email: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: "reports.jsonl".to_string(),
            admin_email: "admin@truthseeker.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl SeekerConfig {
    /// Load from a TOML file (optional) overlaid with `TRUTHSEEKER__SECTION__KEY`
    /// environment variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TRUTHSEEKER").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// The Gemini API key from the process environment, if any.
    pub fn ai_api_key() -> Option<String> {
        AI_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}
