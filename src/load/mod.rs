pub mod csv_source;
pub mod parse;

pub use csv_source::CsvSource;

use csv::StringRecord;
use serde::de::DeserializeOwned;
use std::{io::Read, path::PathBuf};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::db::{Record, RowSink};
use crate::error::LoadError;

/// Outcome of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub file: PathBuf,
    pub table: &'static str,
    pub rows_inserted: u64,
}

/// Stream every data row of `source` into `sink`, in file order.
///
/// Each row is deserialized into `T`, turned into a database row by `to_row`
/// and inserted before the next line is read. The first failure stops the
/// load; rows already handed to the sink are not rolled back.
pub async fn load_rows<Rd, T, R, S, F>(
    mut source: CsvSource<Rd>,
    sink: &mut S,
    mut to_row: F,
) -> Result<LoadSummary, LoadError>
where
    Rd: Read,
    T: DeserializeOwned,
    R: Record,
    S: RowSink<R>,
    F: FnMut(T) -> R,
{
    info!("loading {} into {}", source.path.display(), R::TABLE);
    let start = Instant::now();

    let mut raw = StringRecord::new();
    let mut rows_inserted = 0u64;
    while source.next_record(&mut raw)? {
        let line = raw.position().map_or(0, |p| p.line());
        debug!("Processing row {}", line);

        let parsed: T = raw
            .deserialize(Some(&source.headers))
            .map_err(|source| LoadError::Csv { line, source })?;
        let row = to_row(parsed);

        sink.insert(&row)
            .await
            .map_err(|source| LoadError::Insert {
                line,
                table: R::TABLE,
                source,
            })?;
        rows_inserted += 1;
    }

    info!(
        "inserted {} rows into {} in {:.3}s",
        rows_inserted,
        R::TABLE,
        start.elapsed().as_secs_f64()
    );

    Ok(LoadSummary {
        file: source.path,
        table: R::TABLE,
        rows_inserted,
    })
}
