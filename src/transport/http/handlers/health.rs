use crate::domain::model::Dog;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::warn;

/// Reports the store as healthy when the dogs table can be counted.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable, body carries the record count", body = ApiResponse),
        (status = 503, description = "Store or dogs table unavailable", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse>) {
    match state.records.count::<Dog>().await {
        Ok(dogs) => (
            StatusCode::OK,
            Json(ApiResponse::ok(json!({ "status": "ok", "dogs": dogs }))),
        ),
        Err(e) => {
            warn!(error = %e, "health: store check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::failed(
                    format!("store check failed: {}", e),
                    Some(json!({ "status": "unhealthy" })),
                )),
            )
        }
    }
}
