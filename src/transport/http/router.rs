use crate::app::counters::CacheReport;
use crate::domain::model::{Dog, NullInt16};
use crate::domain::validate::Violation;
use crate::transport::http::handlers::{clicks, dogs, health};
use crate::transport::http::types::ApiResponse;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        dogs::list_dogs_handler,
        dogs::get_dog_handler,
        dogs::create_dog_handler,
        dogs::update_dog_handler,
        dogs::update_dog_partial_handler,
        dogs::delete_dog_handler,
        clicks::click_handler,
        clicks::cache_hits_handler
    ),
    components(schemas(ApiResponse, Dog, NullInt16, Violation, CacheReport))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/dogs",
            get(dogs::list_dogs_handler).post(dogs::create_dog_handler),
        )
        .route(
            "/api/dogs/:id",
            get(dogs::get_dog_handler)
                .put(dogs::update_dog_handler)
                .patch(dogs::update_dog_partial_handler)
                .delete(dogs::delete_dog_handler),
        )
        .route("/click", get(clicks::click_handler))
        .route("/cacheHits", get(clicks::cache_hits_handler))
        .with_state(app_state)
}
