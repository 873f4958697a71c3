mod infra;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use ministry_admissions::config::AppConfig;
use ministry_admissions::error::AppError;
use ministry_admissions::telemetry;
use ministry_admissions::workflows::admissions::{
    admissions_router, required_documents, AdmissionLevel, MaritalStatus, ReviewService,
};
use ministry_admissions::workflows::allowlist::{allowlist_router, AllowlistService};
use serde_json::json;
use tracing::info;

use infra::{AppState, InMemoryAllowlistRepository, InMemoryApplicationRepository, LoggingSmsGateway};

#[derive(Parser, Debug)]
#[command(
    name = "Ministerial Admissions Service",
    about = "Run the admissions review workflow service or inspect its document checklists",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the required-documents checklist for a level and marital status
    Checklist(ChecklistArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ChecklistArgs {
    /// Admission level (licensing, recognition, ordination)
    #[arg(long, value_parser = parse_level)]
    level: AdmissionLevel,
    /// Marital status (single, married, widowed, divorced)
    #[arg(long, value_parser = parse_marital_status)]
    marital_status: MaritalStatus,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Checklist(args) => {
            run_checklist(args);
            Ok(())
        }
    }
}

fn parse_level(raw: &str) -> Result<AdmissionLevel, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "licensing" => Ok(AdmissionLevel::Licensing),
        "recognition" => Ok(AdmissionLevel::Recognition),
        "ordination" => Ok(AdmissionLevel::Ordination),
        other => Err(format!("unknown admission level '{other}'")),
    }
}

fn parse_marital_status(raw: &str) -> Result<MaritalStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "single" => Ok(MaritalStatus::Single),
        "married" => Ok(MaritalStatus::Married),
        "widowed" => Ok(MaritalStatus::Widowed),
        "divorced" => Ok(MaritalStatus::Divorced),
        other => Err(format!("unknown marital status '{other}'")),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let gateway = Arc::new(LoggingSmsGateway::new(&config.messaging));
    let review_service = Arc::new(ReviewService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        gateway.clone(),
    ));
    let allowlist_service = Arc::new(AllowlistService::new(
        Arc::new(InMemoryAllowlistRepository::default()),
        gateway,
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(admissions_router(review_service))
        .merge(allowlist_router(allowlist_service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admissions workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_checklist(args: ChecklistArgs) {
    let ChecklistArgs {
        level,
        marital_status,
    } = args;

    println!(
        "Required documents for {} ({})",
        level.label(),
        marital_status.label()
    );
    for doc_type in required_documents(level, marital_status) {
        println!("- {}", doc_type.label());
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
