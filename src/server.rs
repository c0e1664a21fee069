use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};

use crate::api::{ApiAnalyzeRequest, ApiAnalyzeResponse};
use content_matrix::analyze;
use content_matrix::config::AnalysisConfig;

#[derive(Clone)]
struct AppState {
    config: Arc<AnalysisConfig>,
}

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let (config, _) = AnalysisConfig::load(args.config)?;
    config.validate().map_err(|err| err.to_string())?;

    let state = AppState {
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/config", get(config_handler))
        .route("/api/analyze", post(analyze_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(%addr, "content matrix API listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn config_handler(State(state): State<AppState>) -> Json<AnalysisConfig> {
    Json(state.config.as_ref().clone())
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiAnalyzeResponse>, (StatusCode, String)> {
    let (records, config) = request
        .into_parts(&state.config)
        .map_err(bad_request)?;

    let analysis = analyze(&records, &config).map_err(|err| bad_request(err.to_string()))?;
    info!(
        posts = analysis.posts.len(),
        median_reach = analysis.medians.reach,
        median_engagement_rate = analysis.medians.engagement_rate,
        "analyzed batch"
    );

    Ok(Json(ApiAnalyzeResponse::new(&config, analysis)))
}

fn bad_request(message: String) -> (StatusCode, String) {
    warn!(%message, "rejected analyze request");
    (StatusCode::BAD_REQUEST, message)
}
