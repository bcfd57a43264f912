//! harbor-analytics - Housing market analytics service
//!
//! Read-only HTTP API over the market database: metric time series by
//! town/neighborhood and property type, location discovery, and the metric
//! catalog.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use harbor_analytics::{build_router, db, AppState};
use harbor_common::config::ServiceConfig;

/// Command-line arguments for harbor-analytics
#[derive(Parser, Debug)]
#[command(name = "harbor-analytics")]
#[command(about = "Housing market analytics API service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the SQLite market database
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Harbor Analytics v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = ServiceConfig::resolve(args.database, args.port, args.config.as_deref())?;
    info!("Database path: {}", config.database_path.display());

    let pool = match db::connect_readonly(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to market database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to market database: {e}");
            return Err(e.into());
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("harbor-analytics listening on http://{addr}");
    info!("Health check: http://{addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the browser dashboard; only GET is ever needed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring malformed CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}
