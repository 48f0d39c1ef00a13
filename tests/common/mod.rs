#![allow(dead_code)]

use hospital_loader::db::{Record, RowSink};
use hospital_loader::error::BoxError;
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Keeps inserted rows in memory. With `reject_at = Some(n)` the n-th insert
/// fails the way a constraint violation would.
pub struct MemorySink<R> {
    pub rows: Vec<R>,
    pub reject_at: Option<usize>,
    pub attempts: usize,
}

impl<R> MemorySink<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            reject_at: None,
            attempts: 0,
        }
    }

    pub fn rejecting_at(n: usize) -> Self {
        Self {
            reject_at: Some(n),
            ..Self::new()
        }
    }
}

impl<R: Record + Clone> RowSink<R> for MemorySink<R> {
    async fn insert(&mut self, row: &R) -> Result<(), BoxError> {
        self.attempts += 1;
        if self.reject_at == Some(self.attempts) {
            return Err("violates not-null constraint".into());
        }
        self.rows.push(row.clone());
        Ok(())
    }
}
