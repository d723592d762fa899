use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use std::time::Instant;

use crate::api::models::{AnalyzeRequest, AnalyzeResponse, ChartKindInfo};
use crate::api::response;
use crate::charts::ChartKind;
use crate::error::{AppError, Result};
use crate::pipeline::analyze_page;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/chart-kinds", get(chart_kinds_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse> {
    log::info!("Analyzing {} as '{}'", req.url, req.chart_kind);
    let start_time = Instant::now();

    let limit = state.config.request_timeout;
    let result = match tokio::time::timeout(limit, process_analyze_request(&state, &req)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(limit.as_secs())),
    };

    let elapsed = start_time.elapsed();
    match &result {
        Ok(_) => log::info!("Analyzed {} in {:?}", req.url, elapsed),
        Err(err @ (AppError::Fetch(_) | AppError::InvalidRequest(_))) => {
            log::warn!("Analysis of {} failed after {:?}: {}", req.url, elapsed, err)
        }
        Err(err) => log::error!("Analysis of {} failed after {:?}: {}", req.url, elapsed, err),
    }

    result.map(response::success)
}

async fn process_analyze_request(state: &AppState, req: &AnalyzeRequest) -> Result<AnalyzeResponse> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidRequest("url must not be empty".to_string()));
    }

    let analysis = analyze_page(&state.client, &state.config, url, &req.chart_kind).await?;
    for degradation in &analysis.degradations {
        log::debug!("Degraded analysis of {}: {:?}", url, degradation);
    }

    Ok(AnalyzeResponse::from_analysis(
        analysis,
        state.config.text_preview_chars,
    ))
}

async fn chart_kinds_handler() -> impl IntoResponse {
    let kinds: Vec<ChartKindInfo> = ChartKind::ALL.into_iter().map(ChartKindInfo::from).collect();
    response::success(kinds)
}
