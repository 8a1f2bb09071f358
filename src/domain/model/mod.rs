//! Domain model definitions for managed records.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

pub mod dog;
pub mod nullable;
pub mod registry;

pub use dog::Dog;
pub use nullable::NullInt16;

use crate::domain::validate::Violation;

/// Storage kind of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Boolean,
}

/// Static metadata for one field of a record type.
///
/// `wire` is the key used in encoded payloads, `column` is the storage column.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub wire: &'static str,
    pub column: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub primary_key: bool,
}

impl FieldDef {
    pub const fn new(wire: &'static str, column: &'static str, kind: ColumnKind) -> Self {
        Self {
            wire,
            column,
            kind,
            nullable: false,
            primary_key: false,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// A single column value ready to be bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Null,
}

/// Trait that defines the contract for any managed record type.
///
/// Each record type provides:
/// - Storage location name and the declared field table
/// - Access to column values for binding
/// - The protected identifier range (records that cannot be deleted)
/// - Optional validation logic for full-record writes
pub trait Record:
    Serialize + DeserializeOwned + for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static
{
    /// Returns the name of the database table for this record type.
    fn table_name() -> &'static str;

    /// Returns the statically declared field table.
    fn fields() -> &'static [FieldDef];

    /// Returns the store-assigned identifier.
    fn id(&self) -> i64;

    /// Overwrites the identifier on an in-memory record.
    fn set_id(&mut self, id: i64);

    /// Returns the value held for `column`, or `None` if the column is unknown.
    fn column_value(&self, column: &str) -> Option<ColumnValue>;

    /// Records whose identifier satisfies this predicate cannot be deleted.
    ///
    /// Default implementation protects nothing.
    fn is_protected(_id: i64) -> bool {
        false
    }

    /// Validates a decoded record before full-record writes.
    /// Returns every violation found, not just the first.
    ///
    /// Default implementation does no validation.
    fn validate(&self) -> Result<(), Vec<Violation>> {
        Ok(())
    }
}
