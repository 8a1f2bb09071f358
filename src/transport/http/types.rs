use crate::app::counters::CacheCounters;
use crate::app::record_service::RecordService;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordService>,
    pub counters: Arc<CacheCounters>,
}

impl AppState {
    pub fn new(records: RecordService) -> Self {
        Self {
            records: Arc::new(records),
            counters: Arc::new(CacheCounters::default()),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>, data: Option<JsonValue>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ClickQuery {
    #[serde(default)]
    pub refresh: Option<String>,
}

impl ClickQuery {
    pub fn refresh(&self) -> bool {
        self.refresh.as_deref() == Some("true")
    }
}
