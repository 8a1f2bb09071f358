use crate::domain::model::Dog;
use crate::error::{parse_id, RecordResult};
use crate::transport::http::handlers::common::success;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::BTreeMap;

type Reply = RecordResult<(StatusCode, Json<ApiResponse>)>;

#[utoipa::path(
    get,
    path = "/api/dogs",
    params(
        ("age" = Option<i64>, Query, description = "Only dogs at least this old")
    ),
    responses(
        (status = 200, description = "All matching dogs", body = ApiResponse),
        (status = 422, description = "Filter value is not an integer", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_dogs_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Reply {
    let dogs = state.records.list::<Dog>(&params).await?;
    success(StatusCode::OK, &dogs)
}

#[utoipa::path(
    get,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog id")),
    responses(
        (status = 200, description = "The dog", body = ApiResponse),
        (status = 400, description = "Id is not an integer", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn get_dog_handler(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let id = parse_id(&id)?;
    let dog = state.records.find::<Dog>(id).await?;
    success(StatusCode::OK, &dog)
}

#[utoipa::path(
    post,
    path = "/api/dogs",
    request_body = Dog,
    responses(
        (status = 201, description = "Dog created", body = ApiResponse),
        (status = 400, description = "Validation failed (all violations listed)", body = ApiResponse),
        (status = 422, description = "Body is not a JSON object", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_dog_handler(State(state): State<AppState>, body: Bytes) -> Reply {
    let dog = state.records.create::<Dog>(&body).await?;
    success(StatusCode::CREATED, &dog)
}

#[utoipa::path(
    put,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog id")),
    request_body = Dog,
    responses(
        (status = 200, description = "All fields except id replaced", body = ApiResponse),
        (status = 400, description = "Bad id or validation failed", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 422, description = "Body is not a JSON object", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_dog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let id = parse_id(&id)?;
    let dog = state
        .records
        .update_full::<Dog>(id, &body)
        .await?
        .into_found(id)?;
    success(StatusCode::OK, &dog)
}

#[utoipa::path(
    patch,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog id")),
    request_body(content = Dog, description = "Any subset of the dog's fields"),
    responses(
        (status = 200, description = "Supplied fields updated", body = ApiResponse),
        (status = 400, description = "Id is not an integer", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 422, description = "Body is not a flat JSON object or does not decode", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_dog_partial_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Reply {
    let id = parse_id(&id)?;
    let dog = state
        .records
        .update_partial::<Dog>(id, &body)
        .await?
        .into_found(id)?;
    success(StatusCode::OK, &dog)
}

#[utoipa::path(
    delete,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse),
        (status = 400, description = "Id is not an integer", body = ApiResponse),
        (status = 403, description = "Sample data (id < 4) cannot be deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_dog_handler(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let id = parse_id(&id)?;
    state.records.delete::<Dog>(id).await?;
    success(StatusCode::OK, &serde_json::json!({ "deleted": id }))
}
