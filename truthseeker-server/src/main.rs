use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};
use truthseeker_core::{FactChecker, JsonlReportStore, ReportService, SeekerConfig};

use truthseeker_server::router::AppContext;
use truthseeker_server::server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "truthseeker.toml")]
    config: String,

    /// Print the system check and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience: production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match SeekerConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let ai_key = SeekerConfig::ai_api_key();
    let checker = match FactChecker::from_config(&config, ai_key.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialise fact checker: {}", e);
            std::process::exit(1);
        }
    };

    if args.health {
        let system = checker.system_check();
        let mark = |ok: bool| if ok { "✅" } else { "❌" };
        println!("{} AI verifier configured", mark(system.ai_configured));
        println!(
            "{} Workflow configured (mode: {}, retry attempts: {})",
            mark(system.workflow_configured),
            system.workflow_mode,
            system.retry_attempts
        );
        if !system.ready {
            println!("❌ TruthSeeker not ready: only offline checks are available");
            std::process::exit(1);
        }
        println!("✅ TruthSeeker is ready");
        return Ok(());
    }

    let reports = ReportService::new(
        Arc::new(JsonlReportStore::new(&config.reports.path)),
        config.reports.admin_email.clone(),
    );
    let ctx = AppContext {
        checker,
        reports,
        socket_path: config.service.socket_path.clone(),
    };

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    if config.http.enabled {
        let http_ctx = ctx.clone();
        let http_config = config.clone();
        let http_shutdown = tx.subscribe();
        tokio::spawn(async move {
            if let Err(e) =
                truthseeker_server::http::start_http_server(http_ctx, http_config, http_shutdown)
                    .await
            {
                tracing::error!("HTTP server error: {}", e);
            }
        });
    }

    let socket_path = config.service.socket_path.clone();
    server::run_unix_server(&socket_path, ctx, tx.subscribe()).await?;

    Ok(())
}
