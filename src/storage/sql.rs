//! Record store adapter over a SQLite connection pool.
//!
//! Statements are built from a resolved `RecordSchema`; column names never come
//! from request data.

use crate::domain::model::registry::RecordSchema;
use crate::domain::model::{ColumnKind, ColumnValue, Record};
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Transaction};
use std::time::Duration;

/// Transaction handle owned by the caller. Dropping it without `commit` rolls back.
pub type StoreTx = Transaction<'static, Sqlite>;

/// Integer lower-bound filter (`column >= min`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtLeast {
    pub column: String,
    pub min: i64,
}

#[derive(Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Private in-memory database. A single connection is kept alive for the
    /// lifetime of the pool since the data lives in that connection.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Creates the table for `R` if it does not exist yet.
    pub async fn migrate<R: Record>(&self) -> Result<(), sqlx::Error> {
        let columns: Vec<String> = R::fields()
            .iter()
            .map(|f| {
                if f.primary_key {
                    return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", f.column);
                }
                let sql_type = match f.kind {
                    ColumnKind::Integer => "INTEGER",
                    ColumnKind::Text => "TEXT",
                    ColumnKind::Boolean => "BOOLEAN",
                };
                match (f.nullable, f.kind) {
                    (true, _) => format!("{} {}", f.column, sql_type),
                    (false, ColumnKind::Boolean) => {
                        format!("{} {} NOT NULL DEFAULT FALSE", f.column, sql_type)
                    }
                    (false, _) => format!("{} {} NOT NULL", f.column, sql_type),
                }
            })
            .collect();

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            R::table_name(),
            columns.join(", ")
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn begin(&self) -> Result<StoreTx, sqlx::Error> {
        self.pool.begin().await
    }

    /// Inserts every non-key column of `record` and returns the stored row.
    pub async fn create<R: Record>(
        &self,
        schema: &RecordSchema,
        record: &R,
    ) -> Result<R, sqlx::Error> {
        let mut tx = self.begin().await?;
        let columns = schema.writable_columns();

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            schema.table,
            columns.join(", ")
        ));
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, column_value(record, column)?);
        }
        qb.push(")");

        let id = qb.build().execute(tx.as_mut()).await?.last_insert_rowid();
        let created = select_by_id(schema)
            .push_bind(id)
            .build_query_as::<R>()
            .fetch_one(tx.as_mut())
            .await?;
        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id<R: Record>(
        &self,
        schema: &RecordSchema,
        id: i64,
    ) -> Result<Option<R>, sqlx::Error> {
        select_by_id(schema)
            .push_bind(id)
            .build_query_as::<R>()
            .fetch_optional(&self.pool)
            .await
    }

    /// All rows matching every filter, ordered by primary key.
    pub async fn find_all<R: Record>(
        &self,
        schema: &RecordSchema,
        filters: &[AtLeast],
    ) -> Result<Vec<R>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            schema.all_columns().join(", "),
            schema.table
        ));
        for (i, f) in filters.iter().enumerate() {
            ensure_column(schema, &f.column)?;
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(format!("{} >= ", f.column)).push_bind(f.min);
        }
        qb.push(format!(" ORDER BY {}", schema.primary_key));

        qb.build_query_as::<R>().fetch_all(&self.pool).await
    }

    pub async fn count(&self, schema: &RecordSchema) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", schema.table))
            .fetch_one(&self.pool)
            .await
    }

    /// Writes only `fields` of `record` to the row with `id`, inside `tx`.
    ///
    /// Returns the number of rows matched. With no fields, nothing is written
    /// and the row is only counted, so a missing row still reports zero.
    pub async fn selective_update<R: Record>(
        &self,
        tx: &mut StoreTx,
        schema: &RecordSchema,
        id: i64,
        record: &R,
        fields: &[String],
    ) -> Result<u64, sqlx::Error> {
        if fields.is_empty() {
            let matched = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                schema.table, schema.primary_key
            ))
            .bind(id)
            .fetch_one(tx.as_mut())
            .await?;
            return Ok(matched as u64);
        }

        let mut qb = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", schema.table));
        for (i, column) in fields.iter().enumerate() {
            ensure_column(schema, column)?;
            if i > 0 {
                qb.push(", ");
            }
            qb.push(format!("{} = ", column));
            push_value(&mut qb, column_value(record, column)?);
        }
        qb.push(format!(" WHERE {} = ", schema.primary_key))
            .push_bind(id);

        let result = qb.build().execute(tx.as_mut()).await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(
        &self,
        tx: &mut StoreTx,
        schema: &RecordSchema,
        id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ?",
            schema.table, schema.primary_key
        ))
        .bind(id)
        .execute(tx.as_mut())
        .await?;
        Ok(result.rows_affected())
    }
}

fn select_by_id<'a>(schema: &RecordSchema) -> QueryBuilder<'a, Sqlite> {
    QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE {} = ",
        schema.all_columns().join(", "),
        schema.table,
        schema.primary_key
    ))
}

fn ensure_column(schema: &RecordSchema, column: &str) -> Result<(), sqlx::Error> {
    match schema.column_kind(column) {
        Some(_) => Ok(()),
        None => Err(sqlx::Error::ColumnNotFound(column.to_string())),
    }
}

fn column_value<R: Record>(record: &R, column: &str) -> Result<ColumnValue, sqlx::Error> {
    record
        .column_value(column)
        .ok_or_else(|| sqlx::Error::ColumnNotFound(column.to_string()))
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: ColumnValue) {
    match value {
        ColumnValue::Integer(v) => {
            qb.push_bind(v);
        }
        ColumnValue::Text(v) => {
            qb.push_bind(v);
        }
        ColumnValue::Boolean(v) => {
            qb.push_bind(v);
        }
        ColumnValue::Null => {
            qb.push_bind(None::<i64>);
        }
    }
}
