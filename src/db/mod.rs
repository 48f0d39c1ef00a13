pub mod postgres;

pub use postgres::PgSink;

use tokio_postgres::types::ToSql;

use crate::error::BoxError;

/// A database row with a fixed destination table and column order.
pub trait Record {
    /// Destination table.
    const TABLE: &'static str;

    /// Destination columns, in the order `params` binds them.
    const COLUMNS: &'static [&'static str];

    /// One positional parameter per entry of `COLUMNS`.
    fn params(&self) -> Vec<&(dyn ToSql + Sync)>;
}

/// `INSERT INTO <table> (<c1>, ...) VALUES ($1, ...)` for `R`.
pub fn insert_statement<R: Record>() -> String {
    let placeholders: Vec<String> = (1..=R::COLUMNS.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

/// Where loaded rows go. One call per CSV row, in file order.
#[allow(async_fn_in_trait)]
pub trait RowSink<R: Record> {
    async fn insert(&mut self, row: &R) -> Result<(), BoxError>;
}
