// In crates/web-server/src/lib.rs

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use app_config::types::ServerSettings;
use engine::Engine;
use std::sync::Arc;
use tokio::net::TcpListener;
use types::{
    AddressBody, AddressQuery, Envelope, InsightsRequest, InsightsResponse, QueuedResponse,
    TaskResponse, WalletAnalysisResponse,
};

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self { engine: Arc::new(engine) }
    }
}

/// Creates the main application router with all routes and middleware.
pub fn create_router(app_state: AppState) -> Router {
    // The dashboard is served from a different origin.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let api_router = Router::new()
        .route("/analyze-wallet", get(analyze_wallet_handler))
        .route("/analyze-trades", post(analyze_trades_handler))
        .route("/task/{execution_id}", get(task_status_handler))
        .route("/generate-insights", post(generate_insights_handler));

    Router::new()
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// Handler for `GET /api/analyze-wallet?address=...`
async fn analyze_wallet_handler(
    State(state): State<AppState>,
    Query(params): Query<AddressQuery>,
) -> Result<Json<WalletAnalysisResponse>> {
    let metrics = state.engine.wallet.analyze(&params.address).await?;
    Ok(Json(WalletAnalysisResponse {
        metrics,
        timestamp: chrono::Utc::now().timestamp_millis(),
        status: "success",
    }))
}

/// Handler for `POST /api/analyze-trades`
async fn analyze_trades_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddressBody>, JsonRejection>,
) -> Result<Json<QueuedResponse>> {
    let Json(body) = payload.map_err(|rejection| Error::InvalidBody {
        message: "Wallet address is required",
        rejection,
    })?;
    let execution = state.engine.trades.queue(&body.address).await?;
    Ok(Json(Envelope::ok(execution)))
}

/// Handler for `GET /api/task/{execution_id}`
async fn task_status_handler(
    State(state): State<AppState>,
    Path(execution_id): Path<String>,
) -> Result<Json<TaskResponse>> {
    let report = state.engine.trades.poll(&execution_id).await?;
    Ok(Json(Envelope::ok(report)))
}

/// Handler for `POST /api/generate-insights`
async fn generate_insights_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<InsightsRequest>, JsonRejection>,
) -> Result<Json<InsightsResponse>> {
    let Json(request) = payload.map_err(|rejection| Error::InvalidBody {
        message: "Invalid request body",
        rejection,
    })?;
    let insights = state.engine.insights.generate(&request.prompt, &request.metrics).await?;
    Ok(Json(InsightsResponse { insights }))
}

/// The main entry point for running the web server.
///
/// It will run forever until the process is terminated.
pub async fn run(settings: &ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state);

    let address = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Web server listening on {}", address);

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServerBindError)?;

    Ok(())
}
