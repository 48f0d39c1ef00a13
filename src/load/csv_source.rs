use csv::{ReaderBuilder, StringRecord, Trim};
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::LoadError;
use crate::load::parse::normalize_header;

/// An opened CSV file whose header has been read and normalized.
pub struct CsvSource<R = File> {
    pub(crate) path: PathBuf,
    pub(crate) reader: csv::Reader<R>,
    pub(crate) headers: StringRecord,
}

impl CsvSource<File> {
    /// Open `path` and read its header line. Nothing touches the database
    /// before this succeeds.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(path, file)
    }
}

impl<R: Read> CsvSource<R> {
    /// Wrap any reader; `path` only labels errors and logs.
    pub fn from_reader(path: impl Into<PathBuf>, rdr: R) -> Result<Self, LoadError> {
        let path = path.into();
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);

        let raw = reader
            .headers()
            .map_err(|e| csv_error(&path, 1, e))?
            .clone();
        if raw.is_empty() {
            return Err(LoadError::MissingHeader { path });
        }

        let headers: StringRecord = raw.iter().map(normalize_header).collect();
        debug!("{} columns in {}", headers.len(), path.display());
        reader.set_headers(headers.clone());

        Ok(Self {
            path,
            reader,
            headers,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized header names, in file order.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Read the next data row into `record`; `false` at end of file.
    pub(crate) fn next_record(&mut self, record: &mut StringRecord) -> Result<bool, LoadError> {
        let next_line = record.position().map_or(2, |p| p.line() + 1);
        self.reader.read_record(record).map_err(|e| {
            let line = e.position().map_or(next_line, |p| p.line());
            csv_error(&self.path, line, e)
        })
    }
}

/// Read failures from the file itself surface as I/O errors, not CSV ones.
fn csv_error(path: &Path, line: u64, err: csv::Error) -> LoadError {
    match err.kind() {
        csv::ErrorKind::Io(io_err) => LoadError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io_err.kind(), io_err.to_string()),
        },
        _ => LoadError::Csv { line, source: err },
    }
}
