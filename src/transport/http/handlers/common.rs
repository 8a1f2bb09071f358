use crate::error::{RecordError, RecordResult};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

pub fn status_for(err: &RecordError) -> StatusCode {
    match err {
        RecordError::MalformedPayload(_) | RecordError::Decode(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RecordError::InvalidId(_) | RecordError::Validation(_) => StatusCode::BAD_REQUEST,
        RecordError::NotFound(_) => StatusCode::NOT_FOUND,
        RecordError::ProtectedRecord(_) => StatusCode::FORBIDDEN,
        RecordError::Schema(_) | RecordError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let data = match &self {
            RecordError::Validation(violations) => {
                Some(serde_json::json!({ "errors": violations }))
            }
            _ => None,
        };
        (status, Json(ApiResponse::failed(self.to_string(), data))).into_response()
    }
}

/// Wraps `data` in a success envelope.
pub fn success<T: Serialize>(status: StatusCode, data: &T) -> RecordResult<(StatusCode, Json<ApiResponse>)> {
    let data = serde_json::to_value(data)?;
    Ok((status, Json(ApiResponse::ok(data))))
}
