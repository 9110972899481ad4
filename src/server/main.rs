//! Geocoding server.
//!
//! Answers `?lat=..&lng=..` with a Google Geocoding style response naming the
//! area that contains the point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use areafinder::config::Config;
use areafinder::models::{GeocodeResponse, LatLng};
use areafinder::pip::{BoundaryStore, PipService};

mod geocode;
use geocode::{parse_coordinates, GeocodeQueryParams};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Point-in-polygon geocoding server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoJSON areas file
    #[arg(long)]
    areas: Option<PathBuf>,

    /// Plain HTTP listen address
    #[arg(long)]
    http_listen: Option<String>,

    /// HTTPS listen address
    #[arg(long)]
    https_listen: Option<String>,

    /// PEM certificate chain for HTTPS
    #[arg(long)]
    tls_cert: Option<PathBuf>,

    /// PEM private key for HTTPS
    #[arg(long)]
    tls_key: Option<PathBuf>,

    /// Locality reported when no area matches
    #[arg(long)]
    fallback_locality: Option<String>,

    /// Reuse parsed boundaries until the areas file changes
    #[arg(long)]
    cache_boundaries: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(areas) = self.areas {
            config.areas_path = areas;
        }
        if let Some(listen) = self.http_listen {
            config.http_listen = listen;
        }
        if let Some(listen) = self.https_listen {
            config.https_listen = listen;
        }
        if self.tls_cert.is_some() {
            config.tls_cert = self.tls_cert;
        }
        if self.tls_key.is_some() {
            config.tls_key = self.tls_key;
        }
        if let Some(locality) = self.fallback_locality {
            config.fallback_locality = locality;
        }
        config.cache_boundaries |= self.cache_boundaries;

        Ok(config)
    }
}

/// Application state shared across handlers
struct AppState {
    pip: Arc<PipService>,
    fallback_locality: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Args::parse().into_config()?;

    info!("Areafinder Geocoding Server");
    info!("Areas file: {}", config.areas_path.display());

    let store = BoundaryStore::new(&config.areas_path);
    let pip = if config.cache_boundaries {
        info!("Boundary caching enabled");
        PipService::cached(store)
    } else {
        PipService::uncached(store)
    };

    let state = Arc::new(AppState {
        pip: Arc::new(pip),
        fallback_locality: config.fallback_locality.clone(),
    });

    let app = router(state);

    match config.tls_paths() {
        Some((cert, key)) => {
            let http_app = app.clone();
            let http_listen = config.http_listen.clone();
            tokio::spawn(async move {
                if let Err(e) = serve_http(&http_listen, http_app).await {
                    error!("HTTP server error: {:#}", e);
                }
            });

            let tls = RustlsConfig::from_pem_file(cert, key)
                .await
                .context("Failed to load TLS certificate or key")?;
            let addr: SocketAddr = config
                .https_listen
                .parse()
                .context("Invalid HTTPS listen address")?;

            info!("HTTPS server listening on {}", addr);
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        }
        None => {
            info!("TLS not configured, serving plain HTTP only");
            serve_http(&config.http_listen, app).await?;
        }
    }

    Ok(())
}

/// Build the router; every path other than /health is a geocode request
fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(health_handler))
        .fallback(geocode_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn serve_http(listen: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {}", listen))?;
    info!("HTTP server listening on {}", listen);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check endpoint
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Reverse geocode a point to the containing area
async fn geocode_handler(
    method: Method,
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    let params = GeocodeQueryParams::from_pairs(pairs);
    let (lat, lng) = match parse_coordinates(&params) {
        Ok(coords) => coords,
        Err(msg) => return (StatusCode::BAD_REQUEST, msg).into_response(),
    };

    // The uncached path reads the areas file
    let pip = Arc::clone(&state.pip);
    let area = match tokio::task::spawn_blocking(move || pip.locate(lng, lat)).await {
        Ok(area) => area,
        Err(e) => {
            error!("Area lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Area lookup failed").into_response();
        }
    };

    Json(GeocodeResponse::from_match(
        &area,
        LatLng { lat, lng },
        &state.fallback_locality,
    ))
    .into_response()
}
