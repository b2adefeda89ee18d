//! truthseeker-cli: command-line client for the TruthSeeker HTTP API
//!
//! # Subcommands
//! - `check <text> [--url] [--title <t>] [--json]`: verify a claim or article URL
//! - `report --claim <c> --classification <c> --confidence <n> --feedback <f> …`
//! - `status`: show server readiness

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8787";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "truthseeker-cli", version, about = "TruthSeeker fact-checking client")]
struct Cli {
    /// TruthSeeker HTTP server URL (overrides TRUTHSEEKER_HTTP_URL env var)
    #[arg(long, env = "TRUTHSEEKER_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a claim
    Check {
        /// Claim text, or an article URL with --url
        text: String,

        /// Treat the argument as an article URL
        #[arg(long)]
        url: bool,

        /// Optional headline for the submission
        #[arg(long)]
        title: Option<String>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Report feedback on a verdict
    Report {
        #[arg(long)]
        claim: String,

        #[arg(long)]
        classification: String,

        #[arg(long)]
        confidence: u8,

        /// What the user thinks of the verdict (e.g. "Correct", "Incorrect")
        #[arg(long)]
        feedback: String,

        #[arg(long, default_value = "")]
        reason: String,

        #[arg(long, default_value = "")]
        comments: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// Show TruthSeeker server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SourceView {
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub classification: String,
    pub confidence: u8,
    pub reason: String,
    #[serde(default)]
    pub sources: Vec<SourceView>,
    #[serde(default)]
    pub corrected: bool,
    pub processed_by: Option<String>,
    #[serde(rename = "took_ms")]
    pub took_ms: Option<u64>,
}

pub fn check_body(text: &str, is_url: bool, title: Option<&str>) -> serde_json::Value {
    let mut body = if is_url {
        serde_json::json!({ "inputType": "url", "url": text })
    } else {
        serde_json::json!({ "inputType": "text", "query": text })
    };
    if let (Some(title), Some(obj)) = (title, body.as_object_mut()) {
        obj.insert("title".to_string(), serde_json::json!(title));
    }
    body
}

/// Human-readable rendering of a verdict.
pub fn render_result(r: &CheckResponse) -> String {
    let mut out = format!("{} ({}% confidence)\n", r.classification, r.confidence);
    out.push_str(&format!("Reason: {}\n", r.reason));
    if let Some(stage) = &r.processed_by {
        out.push_str(&format!("Checked by: {}", stage));
        if r.corrected {
            out.push_str(" (corrected against known facts)");
        }
        out.push('\n');
    }
    out.push_str("\nSources:\n");
    for s in &r.sources {
        let mark = if s.verified { "✓" } else { " " };
        out.push_str(&format!("  [{}] {} - {} <{}>\n", mark, s.title, s.source, s.url));
    }
    out
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}

fn do_check(
    server: &str,
    text: &str,
    is_url: bool,
    title: Option<&str>,
    json_output: bool,
) -> anyhow::Result<()> {
    // The server may wait on the webhook and on AI retries before answering.
    let client = client(120)?;
    let url = format!("{}/check", server);

    let resp = match client.post(&url).json(&check_body(text, is_url, title)).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("truthseeker-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("truthseeker-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    let body: serde_json::Value = resp.json()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let result: CheckResponse = serde_json::from_value(body)?;
    print!("{}", render_result(&result));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn do_report(
    server: &str,
    claim: &str,
    classification: &str,
    confidence: u8,
    feedback: &str,
    reason: &str,
    comments: &str,
    email: Option<&str>,
) -> anyhow::Result<()> {
    let client = client(30)?;
    let url = format!("{}/report", server);
    let body = serde_json::json!({
        "originalClaim": claim,
        "classification": classification,
        "confidence": confidence,
        "userFeedback": feedback,
        "reportReason": reason,
        "userComments": comments,
        "userEmail": email,
    });

    let resp = client.post(&url).json(&body).send()?;
    let status = resp.status();
    let receipt: serde_json::Value = resp.json().unwrap_or_default();
    if !status.is_success() || receipt["success"] != true {
        eprintln!(
            "truthseeker-cli: report failed (HTTP {}): {}",
            status,
            receipt["message"].as_str().or(receipt["error"].as_str()).unwrap_or("unknown error")
        );
        std::process::exit(1);
    }
    println!(
        "{} (id: {})",
        receipt["message"].as_str().unwrap_or("Report sent"),
        receipt["id"].as_str().unwrap_or("?")
    );
    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = client(10)?;
    let url = format!("{}/health", server);

    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            let system = &body["system"];
            println!("TruthSeeker server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:            {}", body["version"].as_str().unwrap_or("?"));
            println!("AI configured:      {}", system["ai_configured"].as_bool().unwrap_or(false));
            println!(
                "Workflow:           {} (configured: {})",
                system["workflow_mode"].as_str().unwrap_or("?"),
                system["workflow_configured"].as_bool().unwrap_or(false)
            );
            println!("Socket:             {}", body["socket"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            eprintln!("truthseeker-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("truthseeker-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Check {
            text,
            url,
            title,
            json,
        } => do_check(&server, &text, url, title.as_deref(), json),
        Commands::Report {
            claim,
            classification,
            confidence,
            feedback,
            reason,
            comments,
            email,
        } => do_report(
            &server,
            &claim,
            &classification,
            confidence,
            &feedback,
            &reason,
            &comments,
            email.as_deref(),
        ),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("truthseeker-cli: {}", e);
        std::process::exit(1);
    }
}
