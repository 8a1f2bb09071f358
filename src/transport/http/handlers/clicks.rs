use crate::app::counters::CacheReport;
use crate::transport::http::types::{AppState, ClickQuery};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

#[utoipa::path(
    get,
    path = "/click",
    params(
        ("refresh" = Option<String>, Query, description = "`true` bypasses the cached response")
    ),
    responses((status = 200, description = "Click recorded"))
)]
pub async fn click_handler(State(state): State<AppState>, Query(query): Query<ClickQuery>) -> StatusCode {
    if state.counters.hit(query.refresh()) {
        return StatusCode::OK;
    }
    let refreshed = state.counters.record_execution();
    info!(refreshed_requests = refreshed, "click: cache refreshed");
    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/cacheHits",
    responses((status = 200, description = "Request and cache hit counts", body = CacheReport))
)]
pub async fn cache_hits_handler(State(state): State<AppState>) -> Json<CacheReport> {
    Json(state.counters.report())
}
