//! Schema catalog: wire-name to column mapping per record type.

use crate::domain::model::{ColumnKind, FieldDef, Record};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("record type for table '{0}' declares no fields")]
    NoFields(String),
    #[error("record type for table '{table}' declares no primary key")]
    MissingPrimaryKey { table: String },
    #[error("wire field '{field}' declared twice in table '{table}'")]
    DuplicateWireField { table: String, field: String },
    #[error("column '{column}' declared twice in table '{table}'")]
    DuplicateColumn { table: String, column: String },
}

/// Resolved schema of one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub table: String,
    pub primary_key: String,
    /// wire field -> storage column
    pub mapping: BTreeMap<String, String>,
    columns: BTreeMap<String, ColumnKind>,
}

impl RecordSchema {
    /// Storage columns in wire-name order, excluding the primary key.
    pub fn writable_columns(&self) -> Vec<String> {
        self.mapping
            .values()
            .filter(|c| **c != self.primary_key)
            .cloned()
            .collect()
    }

    /// Every storage column, primary key first.
    pub fn all_columns(&self) -> Vec<String> {
        let mut cols = vec![self.primary_key.clone()];
        cols.extend(self.writable_columns());
        cols
    }

    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns.get(column).copied()
    }

    pub fn column_for_wire(&self, wire: &str) -> Option<&str> {
        self.mapping.get(wire).map(String::as_str)
    }
}

/// Derives the schema from a static field table.
///
/// The mapping must be a bijection with exactly one primary key.
pub fn resolve_fields(table: &str, fields: &[FieldDef]) -> Result<RecordSchema, SchemaError> {
    if fields.is_empty() {
        return Err(SchemaError::NoFields(table.to_string()));
    }

    let mut mapping = BTreeMap::new();
    let mut columns = BTreeMap::new();
    let mut primary_key = None;

    for f in fields {
        if mapping
            .insert(f.wire.to_string(), f.column.to_string())
            .is_some()
        {
            return Err(SchemaError::DuplicateWireField {
                table: table.to_string(),
                field: f.wire.to_string(),
            });
        }
        if columns.insert(f.column.to_string(), f.kind).is_some() {
            return Err(SchemaError::DuplicateColumn {
                table: table.to_string(),
                column: f.column.to_string(),
            });
        }
        if f.primary_key && primary_key.is_none() {
            primary_key = Some(f.column.to_string());
        }
    }

    let primary_key = primary_key.ok_or_else(|| SchemaError::MissingPrimaryKey {
        table: table.to_string(),
    })?;

    Ok(RecordSchema {
        table: table.to_string(),
        primary_key,
        mapping,
        columns,
    })
}

/// Resolves the storage location and wire mapping of `R`.
pub fn resolve_schema<R: Record>() -> Result<RecordSchema, SchemaError> {
    resolve_fields(R::table_name(), R::fields())
}

/// Process-wide cache of resolved schemas, keyed by record type.
///
/// Entries are immutable once inserted. Two requests racing on the first
/// lookup both compute the same value; the second insert is discarded.
#[derive(Default)]
pub struct SchemaCatalog {
    schemas: RwLock<HashMap<TypeId, Arc<RecordSchema>>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<R: Record>(&self) -> Result<Arc<RecordSchema>, SchemaError> {
        let key = TypeId::of::<R>();
        if let Ok(schemas) = self.schemas.read() {
            if let Some(s) = schemas.get(&key) {
                return Ok(s.clone());
            }
        }

        let schema = Arc::new(resolve_schema::<R>()?);
        match self.schemas.write() {
            Ok(mut schemas) => Ok(schemas.entry(key).or_insert(schema).clone()),
            // A poisoned cache only loses memoization; the schema is still valid.
            Err(_) => Ok(schema),
        }
    }

    pub fn len(&self) -> usize {
        self.schemas.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
