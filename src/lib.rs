pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::counters::CacheCounters;
pub use app::record_service::{RecordService, UpdateOutcome};
pub use domain::model::registry::{resolve_schema, RecordSchema, SchemaCatalog, SchemaError};
pub use domain::model::{Dog, NullInt16, Record};
pub use domain::payload::{extract_present_fields, translate};
pub use error::{RecordError, RecordResult};
pub use storage::SqlStore;
