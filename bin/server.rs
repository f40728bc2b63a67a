// Tradie Directory - Preview Server
// Serves the directory page and the dataset API from tradies.json

use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tradie_directory::{render_page, Business, LicenseVerificationStats, TradieStore};

const STORE_FILE: &str = "tradies.json";
const BIND_ADDR: &str = "127.0.0.1:3000";

/// Shared application state - the dataset is read once at startup
#[derive(Clone)]
struct AppState {
    page: Arc<String>,
    tradies: Arc<Vec<Business>>,
    stats: Arc<StatsResponse>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Stats response
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    total_tradies: usize,
    api_calls_used: u32,
    breakdown: BTreeMap<String, u32>,
    license_verification_stats: LicenseVerificationStats,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET / - The directory page with the data block embedded
async fn serve_page(State(state): State<AppState>) -> impl IntoResponse {
    Html(state.page.as_ref().clone())
}

/// GET /api/tradies - Full record list
async fn get_tradies(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.tradies.as_ref().clone()))
}

/// GET /api/stats - Derived dataset metadata
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.stats.as_ref().clone()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🖥️  Tradie Directory preview server");

    let store = TradieStore::load(STORE_FILE)?;
    let dataset = store.dataset();
    println!("📊 Loaded {} businesses from {}", dataset.total_tradies, STORE_FILE);

    let state = AppState {
        page: Arc::new(render_page(&store.tradies)?),
        tradies: Arc::new(dataset.tradies),
        stats: Arc::new(StatsResponse {
            total_tradies: dataset.total_tradies,
            api_calls_used: dataset.api_calls_used,
            breakdown: dataset.breakdown,
            license_verification_stats: dataset.license_verification_stats,
        }),
    };

    let app = Router::new()
        .route("/", get(serve_page))
        .route("/api/health", get(health_check))
        .route("/api/tradies", get(get_tradies))
        .route("/api/stats", get(get_stats))
        .nest_service("/web", ServeDir::new("web"))
        .layer(CorsLayer::permissive())
        .with_state(state);

    println!("🚀 Listening on http://{}", BIND_ADDR);
    let listener = tokio::net::TcpListener::bind(BIND_ADDR).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
