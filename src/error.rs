use crate::domain::model::registry::SchemaError;
use crate::domain::validate::Violation;
use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

/// Failure modes of record operations.
///
/// Every variant that can occur after a transaction was opened implies the
/// transaction was rolled back.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("invalid identifier '{0}'")]
    InvalidId(String),
    #[error("payload does not decode into a record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<Violation>),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("record {0} not found")]
    NotFound(i64),
    #[error("record {0} is sample data and cannot be deleted")]
    ProtectedRecord(i64),
}

impl RecordError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    pub fn invalid_id(raw: impl Into<String>) -> Self {
        Self::InvalidId(raw.into())
    }
}

/// Parses a path identifier into the store's key type.
pub fn parse_id(raw: &str) -> RecordResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| RecordError::invalid_id(raw))
}
