pub mod sql;

pub use sql::{AtLeast, SqlStore, StoreTx};
