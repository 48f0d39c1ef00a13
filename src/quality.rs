//! CMS Hospital General Information extract → `hospital_quality`.
//!
//! The extract carries no reporting period of its own, so every row of a run
//! is stamped with the date given on the command line.

use chrono::NaiveDate;
use serde::Deserialize;
use std::{io::Read, path::Path};
use tokio_postgres::types::ToSql;

use crate::config::DbConfig;
use crate::db::{PgSink, Record, RowSink};
use crate::error::LoadError;
use crate::load::{load_rows, parse, CsvSource, LoadSummary};

/// One facility as published by CMS, after header normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QualityRecord {
    #[serde(deserialize_with = "parse::required_text")]
    pub facility_id: String,
    #[serde(deserialize_with = "parse::rating")]
    pub hospital_overall_rating: Option<f64>,
    #[serde(deserialize_with = "parse::yes_no")]
    pub emergency_services: Option<bool>,
    #[serde(deserialize_with = "parse::text")]
    pub hospital_type: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub hospital_ownership: Option<String>,
}

impl QualityRecord {
    pub fn with_report_date(self, report_date: NaiveDate) -> QualityRow {
        QualityRow {
            record: self,
            report_date,
        }
    }
}

/// A quality record stamped with its reporting date.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityRow {
    pub record: QualityRecord,
    pub report_date: NaiveDate,
}

impl Record for QualityRow {
    const TABLE: &'static str = "hospital_quality";
    const COLUMNS: &'static [&'static str] = &[
        "facility_id",
        "hospital_overall_rating",
        "emergency_services",
        "hospital_type",
        "hospital_ownership",
        "report_date",
    ];

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        let r = &self.record;
        vec![
            &r.facility_id as &(dyn ToSql + Sync),
            &r.hospital_overall_rating,
            &r.emergency_services,
            &r.hospital_type,
            &r.hospital_ownership,
            &self.report_date,
        ]
    }
}

/// Parse the reporting date argument.
pub fn parse_report_date(raw: &str) -> Result<NaiveDate, LoadError> {
    parse::parse_date(raw).ok_or_else(|| LoadError::InvalidDate {
        input: raw.to_string(),
    })
}

/// Insert every row of an already opened extract, all under `report_date`.
pub async fn load<Rd, S>(
    source: CsvSource<Rd>,
    report_date: NaiveDate,
    sink: &mut S,
) -> Result<LoadSummary, LoadError>
where
    Rd: Read,
    S: RowSink<QualityRow>,
{
    load_rows(source, sink, |record: QualityRecord| {
        record.with_report_date(report_date)
    })
    .await
}

/// `load_quality <date> <file_name>`: the date is checked first, then the
/// file, then the database.
pub async fn run(date: &str, path: &Path) -> Result<LoadSummary, LoadError> {
    let report_date = parse_report_date(date)?;
    let source = CsvSource::open(path)?;
    let config = DbConfig::from_env()?;
    let mut sink = PgSink::<QualityRow>::connect(config.pg()).await?;
    load(source, report_date, &mut sink).await
}
