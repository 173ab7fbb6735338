//! Dashboard routes: the page, the cached view, single charts and refresh.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Serialize;

use crate::errors::{ApiResponse, AppError};
use crate::models::chart::{Chart, DashboardView};
use crate::services::refresher::DashboardStatus;
use crate::AppState;

const PAGE: &str = include_str!("../../static/index.html");

/// Headline text for the live count heading.
#[derive(Debug, Serialize)]
pub struct SightingCount {
    pub total: u64,
    pub headline: String,
}

/// In render-once mode nothing ticks in the background, so the first
/// request loads the view.
async fn load_if_needed(state: &AppState) {
    if !state.config.auto_refresh {
        // A failure is recorded in the status and surfaced by the caller.
        let _ = state.dashboard.ensure_loaded().await;
    }
}

/// GET / — dashboard page.
pub async fn page() -> Html<&'static str> {
    Html(PAGE)
}

/// GET /api/v1/dashboard — last good view, last failure and polling period.
pub async fn status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStatus>>, AppError> {
    load_if_needed(&state).await;
    Ok(ApiResponse::success(state.dashboard.status().await))
}

/// GET /api/v1/dashboard/count — total sightings and headline sentence.
pub async fn count(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SightingCount>>, AppError> {
    load_if_needed(&state).await;
    let view = state.dashboard.current_view().await?;
    Ok(ApiResponse::success(SightingCount {
        total: view.total,
        headline: view.headline,
    }))
}

/// GET /api/v1/dashboard/charts/{chart_id} — one chart by page element id.
pub async fn chart(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
) -> Result<Json<ApiResponse<Chart>>, AppError> {
    load_if_needed(&state).await;
    let view = state.dashboard.current_view().await?;
    let chart = view
        .chart(&chart_id)
        .ok_or_else(|| AppError::NotFound(format!("Chart {chart_id} not found")))?;
    Ok(ApiResponse::success(chart))
}

/// POST /api/v1/dashboard/refresh — run one refresh tick now.
pub async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let view = state.dashboard.tick().await.map_err(|e| match e {
        AppError::ConnectionFailure(_) => e,
        other => AppError::Unavailable(other.to_string()),
    })?;
    Ok(ApiResponse::success(view))
}
