//! ToS Lens analysis server
//!
//! Scores terms of service and privacy policies for user-hostile clauses.
//! Provides REST API endpoints for:
//!
//! - Text analysis
//! - PDF/TXT upload with deduplication by content hash
//! - Stored results, JSON export, history and comparison
//!
//! ## Architecture
//!
//! One `ClauseEngine` is built at startup and shared by every request.
//! Analyses run on the blocking pool under a per-request timeout; results
//! of uploads are kept in an in-memory report store.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::{Parser, ValueEnum};
use clause_engine::{ClauseEngine, LexiconEmbedder, ScoringPolicy};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod store;

use api::{
    handle_analyze, handle_compare, handle_export, handle_get_result, handle_health,
    handle_history, handle_upload,
};
use store::{MemoryStore, ReportStore};

/// Uploads arrive base64-encoded inside JSON
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Sentence classifier merged into the pattern results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassifierChoice {
    /// Clause patterns only
    #[value(name = "none")]
    Disabled,
    /// Sentence-level enhanced patterns
    Patterns,
    /// Embedding centroids over the built-in legal lexicon
    Embedding,
}

/// Command-line arguments for the analysis server
#[derive(Parser, Debug)]
#[command(name = "tos-server")]
#[command(about = "Clause-risk analysis server for terms of service and privacy policies")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Analysis timeout in milliseconds
    #[arg(long, default_value = "10000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Classifier fallback
    #[arg(long, value_enum, default_value = "patterns")]
    classifier: ClassifierChoice,

    /// TOML file overriding scoring thresholds
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Entries returned by the history endpoint
    #[arg(long, default_value = "50")]
    history_limit: usize,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ClauseEngine>,
    pub store: Arc<dyn ReportStore>,
    /// Analysis timeout in milliseconds
    pub timeout_ms: u64,
    pub history_limit: usize,
}

/// API routes without middleware
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Analysis
        .route("/api/analyze", post(handle_analyze))
        .route("/api/upload", post(handle_upload))
        // Stored results
        .route("/api/results/:id", get(handle_get_result))
        .route("/api/export/:id", get(handle_export))
        .route("/api/history", get(handle_history))
        .route("/api/compare", get(handle_compare))
}

fn load_policy(path: &Path) -> anyhow::Result<ScoringPolicy> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading policy file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing policy file {}", path.display()))
}

fn build_engine(
    classifier: ClassifierChoice,
    policy: Option<ScoringPolicy>,
) -> anyhow::Result<ClauseEngine> {
    let mut engine = ClauseEngine::new()?;
    if let Some(policy) = policy {
        engine = engine.with_policy(policy);
    }
    Ok(match classifier {
        ClassifierChoice::Disabled => engine,
        ClassifierChoice::Patterns => engine.with_pattern_classifier(),
        ClassifierChoice::Embedding => engine.with_embedder(LexiconEmbedder),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tos-server on {}:{}", args.host, args.port);

    let policy = args.policy.as_deref().map(load_policy).transpose()?;
    let engine = build_engine(args.classifier, policy)?;
    info!(
        "Engine ready: classifier={:?}, method={:?}",
        args.classifier,
        engine.method()
    );

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .ok_or_else(|| anyhow!("invalid rate limit: {}", args.rate_limit))?,
    );

    let state = AppState {
        engine: Arc::new(engine),
        store: Arc::new(MemoryStore::new()),
        timeout_ms: args.timeout_ms,
        history_limit: args.history_limit,
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes()
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Analysis timeout: {}ms", args.timeout_ms);

    // The rate limiter keys on the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
