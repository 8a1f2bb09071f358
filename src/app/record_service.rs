//! The Record Service.
//!
//! This module sits between the HTTP handlers and the record store.
//! It is responsible for:
//! 1.  Resolving which columns a partial payload actually supplies and
//!     writing only those, inside one transaction.
//! 2.  Full-record writes (create / replace) with exhaustive validation.
//! 3.  Refusing to delete protected seed records before the store is touched.

use crate::domain::model::registry::{RecordSchema, SchemaCatalog};
use crate::domain::model::{ColumnKind, Record};
use crate::domain::payload::{extract_present_fields, translate};
use crate::error::{RecordError, RecordResult};
use crate::storage::{AtLeast, SqlStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of an update that reached the store.
///
/// `rows_matched == 0` means the target id does not exist; callers decide
/// how to surface that.
#[derive(Debug, Clone)]
pub struct UpdateOutcome<R> {
    /// The record as decoded from the payload, with the target id applied.
    pub record: R,
    /// Storage columns that were written.
    pub fields: Vec<String>,
    pub rows_matched: u64,
}

impl<R> UpdateOutcome<R> {
    pub fn found(&self) -> bool {
        self.rows_matched > 0
    }

    pub fn into_found(self, id: i64) -> RecordResult<R> {
        if self.found() {
            Ok(self.record)
        } else {
            Err(RecordError::NotFound(id))
        }
    }
}

/// Record operations over a store handle. Holds no per-request state.
pub struct RecordService {
    store: SqlStore,
    catalog: Arc<SchemaCatalog>,
}

impl RecordService {
    pub fn new(store: SqlStore) -> Self {
        Self::with_catalog(store, Arc::new(SchemaCatalog::new()))
    }

    pub fn with_catalog(store: SqlStore, catalog: Arc<SchemaCatalog>) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &SqlStore {
        &self.store
    }

    pub fn schema<R: Record>(&self) -> RecordResult<Arc<RecordSchema>> {
        Ok(self.catalog.get::<R>()?)
    }

    /// Creates the table for `R` and inserts `seed` if the table is empty.
    /// Returns the number of seeded rows.
    pub async fn init<R: Record>(&self, seed: &[R]) -> RecordResult<usize> {
        let schema = self.schema::<R>()?;
        self.store.migrate::<R>().await?;

        if seed.is_empty() || self.store.count(&schema).await? > 0 {
            return Ok(0);
        }
        for record in seed {
            self.store.create(&schema, record).await?;
        }
        info!(table = %schema.table, count = seed.len(), "init: seed records inserted");
        Ok(seed.len())
    }

    pub async fn create<R: Record>(&self, raw: &[u8]) -> RecordResult<R> {
        let schema = self.schema::<R>()?;
        let record = decode_object::<R>(raw)?;
        record.validate().map_err(RecordError::Validation)?;

        let created = self.store.create(&schema, &record).await?;
        debug!(table = %schema.table, id = created.id(), "create");
        Ok(created)
    }

    pub async fn find<R: Record>(&self, id: i64) -> RecordResult<R> {
        let schema = self.schema::<R>()?;
        self.store
            .find_by_id(&schema, id)
            .await?
            .ok_or(RecordError::NotFound(id))
    }

    pub async fn count<R: Record>(&self) -> RecordResult<i64> {
        let schema = self.schema::<R>()?;
        Ok(self.store.count(&schema).await?)
    }

    /// Lists records. Each query parameter naming an integer wire field
    /// becomes a `column >= value` filter; other parameters are ignored.
    pub async fn list<R: Record>(&self, params: &BTreeMap<String, String>) -> RecordResult<Vec<R>> {
        let schema = self.schema::<R>()?;
        let mut filters = Vec::new();
        for (wire, raw) in params {
            let Some(column) = schema.column_for_wire(wire) else {
                continue;
            };
            if schema.column_kind(column) != Some(ColumnKind::Integer) {
                continue;
            }
            let min = raw.trim().parse::<i64>().map_err(|_| {
                RecordError::malformed(format!("filter '{}' expects an integer, got '{}'", wire, raw))
            })?;
            filters.push(AtLeast {
                column: column.to_string(),
                min,
            });
        }
        Ok(self.store.find_all(&schema, &filters).await?)
    }

    /// Updates only the fields present in `raw`.
    ///
    /// Unknown wire names are ignored and the identifier is never written.
    /// `{}` is a valid zero-column update.
    pub async fn update_partial<R: Record>(
        &self,
        id: i64,
        raw: &[u8],
    ) -> RecordResult<UpdateOutcome<R>> {
        let schema = self.schema::<R>()?;

        let tags = extract_present_fields(raw)
            .ok_or_else(|| RecordError::malformed("payload must be a single JSON object"))?;
        let fields: Vec<String> = translate(&tags, &schema.mapping)
            .into_iter()
            .filter(|c| *c != schema.primary_key)
            .collect();
        info!(table = %schema.table, ?tags, ?fields, "partial update: tags => fields");

        let mut record = decode_object::<R>(raw)?;
        record.set_id(id);
        self.apply(&schema, id, record, fields).await
    }

    /// Replaces every column except the identifier.
    pub async fn update_full<R: Record>(
        &self,
        id: i64,
        raw: &[u8],
    ) -> RecordResult<UpdateOutcome<R>> {
        let schema = self.schema::<R>()?;
        let mut record = decode_object::<R>(raw)?;
        record.validate().map_err(RecordError::Validation)?;
        record.set_id(id);
        let fields = schema.writable_columns();
        debug!(table = %schema.table, id, "full update");
        self.apply(&schema, id, record, fields).await
    }

    /// Deletes one record. Protected ids are rejected before any store call.
    pub async fn delete<R: Record>(&self, id: i64) -> RecordResult<()> {
        if R::is_protected(id) {
            warn!(table = R::table_name(), id, "delete cancelled: protected record");
            return Err(RecordError::ProtectedRecord(id));
        }
        let schema = self.schema::<R>()?;

        let mut tx = self.store.begin().await?;
        let removed = match self.store.delete(&mut tx, &schema, id).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback failed");
                }
                return Err(e.into());
            }
        };
        tx.commit().await?;

        if removed == 0 {
            return Err(RecordError::NotFound(id));
        }
        info!(table = %schema.table, id, "deleted");
        Ok(())
    }

    async fn apply<R: Record>(
        &self,
        schema: &RecordSchema,
        id: i64,
        record: R,
        fields: Vec<String>,
    ) -> RecordResult<UpdateOutcome<R>> {
        let mut tx = self.store.begin().await?;
        let rows_matched = match self
            .store
            .selective_update(&mut tx, schema, id, &record, &fields)
            .await
        {
            Ok(n) => n,
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback failed");
                }
                return Err(e.into());
            }
        };
        tx.commit().await?;

        Ok(UpdateOutcome {
            record,
            fields,
            rows_matched,
        })
    }
}

/// Decodes `raw` into `R`, rejecting anything that is not a JSON object first.
fn decode_object<R: Record>(raw: &[u8]) -> RecordResult<R> {
    let value: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|e| RecordError::malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(RecordError::malformed("payload must be a single JSON object"));
    }
    Ok(serde_json::from_value(value)?)
}
