//! Weekly HHS hospital-capacity extract → `hhs_weekly`.

use chrono::NaiveDate;
use serde::Deserialize;
use std::{io::Read, path::Path};
use tokio_postgres::types::ToSql;

use crate::config::DbConfig;
use crate::db::{PgSink, Record, RowSink};
use crate::error::LoadError;
use crate::load::{load_rows, parse, CsvSource, LoadSummary};

/// One facility-week. Columns of the extract not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HhsRecord {
    #[serde(deserialize_with = "parse::required_text")]
    pub hospital_pk: String,
    #[serde(deserialize_with = "parse::date")]
    pub collection_week: NaiveDate,
    #[serde(deserialize_with = "parse::text")]
    pub hospital_name: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub state: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub zip: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub fips_code: Option<String>,
    #[serde(deserialize_with = "parse::text")]
    pub geocoded_hospital_address: Option<String>,
    #[serde(deserialize_with = "parse::metric")]
    pub all_adult_hospital_beds_7_day_avg: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub all_pediatric_inpatient_beds_7_day_avg: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub all_adult_hospital_inpatient_bed_occupied_7_day_coverage: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub all_pediatric_inpatient_bed_occupied_7_day_avg: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub total_icu_beds_7_day_avg: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub icu_beds_used_7_day_avg: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub inpatient_beds_used_covid_7_day_avg: Option<f64>,
    #[serde(deserialize_with = "parse::metric")]
    pub staffed_icu_adult_patients_confirmed_covid_7_day_avg: Option<f64>,
}

impl Record for HhsRecord {
    const TABLE: &'static str = "hhs_weekly";
    const COLUMNS: &'static [&'static str] = &[
        "hospital_pk",
        "collection_week",
        "hospital_name",
        "state",
        "address",
        "city",
        "zip",
        "fips_code",
        "geocoded_hospital_address",
        "all_adult_hospital_beds_7_day_avg",
        "all_pediatric_inpatient_beds_7_day_avg",
        "all_adult_hospital_inpatient_bed_occupied_7_day_coverage",
        "all_pediatric_inpatient_bed_occupied_7_day_avg",
        "total_icu_beds_7_day_avg",
        "icu_beds_used_7_day_avg",
        "inpatient_beds_used_covid_7_day_avg",
        "staffed_icu_adult_patients_confirmed_covid_7_day_avg",
    ];

    fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        vec![
            &self.hospital_pk as &(dyn ToSql + Sync),
            &self.collection_week,
            &self.hospital_name,
            &self.state,
            &self.address,
            &self.city,
            &self.zip,
            &self.fips_code,
            &self.geocoded_hospital_address,
            &self.all_adult_hospital_beds_7_day_avg,
            &self.all_pediatric_inpatient_beds_7_day_avg,
            &self.all_adult_hospital_inpatient_bed_occupied_7_day_coverage,
            &self.all_pediatric_inpatient_bed_occupied_7_day_avg,
            &self.total_icu_beds_7_day_avg,
            &self.icu_beds_used_7_day_avg,
            &self.inpatient_beds_used_covid_7_day_avg,
            &self.staffed_icu_adult_patients_confirmed_covid_7_day_avg,
        ]
    }
}

/// Insert every row of an already opened HHS extract.
pub async fn load<Rd, S>(source: CsvSource<Rd>, sink: &mut S) -> Result<LoadSummary, LoadError>
where
    Rd: Read,
    S: RowSink<HhsRecord>,
{
    load_rows(source, sink, |record: HhsRecord| record).await
}

/// `load_hhs <file_name>`: the file is opened before any connection is made.
pub async fn run(path: &Path) -> Result<LoadSummary, LoadError> {
    let source = CsvSource::open(path)?;
    let config = DbConfig::from_env()?;
    let mut sink = PgSink::<HhsRecord>::connect(config.pg()).await?;
    load(source, &mut sink).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "hospital_pk,collection_week,state,ccn,hospital_name,address,city,zip,fips_code,\
all_adult_hospital_beds_7_day_avg,all_pediatric_inpatient_beds_7_day_avg,\
all_adult_hospital_inpatient_bed_occupied_7_day_coverage,all_pediatric_inpatient_bed_occupied_7_day_avg,\
total_icu_beds_7_day_avg,icu_beds_used_7_day_avg,inpatient_beds_used_covid_7_day_avg,\
staffed_icu_adult_patients_confirmed_covid_7_day_avg,geocoded_hospital_address";

    fn parse_one(row: &str) -> Result<HhsRecord, csv::Error> {
        let data = format!("{HEADER}\n{row}\n");
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        rdr.deserialize().next().unwrap()
    }

    #[test]
    fn test_parses_full_row() {
        let rec = parse_one(
            "010001,2022-01-04,AL,010001,SOUTHEAST HEALTH MEDICAL CENTER,1108 ROSS CLARK CIRCLE,DOTHAN,36301,01069,\
             290.4,-999999,7,0,30.1,25.6,60.3,12.0,POINT (-85.36 31.21)",
        )
        .unwrap();
        assert_eq!(rec.hospital_pk, "010001");
        assert_eq!(rec.collection_week, NaiveDate::from_ymd_opt(2022, 1, 4).unwrap());
        assert_eq!(rec.zip.as_deref(), Some("36301"));
        assert_eq!(rec.fips_code.as_deref(), Some("01069"));
        assert_eq!(rec.all_adult_hospital_beds_7_day_avg, Some(290.4));
        assert_eq!(rec.all_pediatric_inpatient_beds_7_day_avg, None);
        assert_eq!(rec.all_pediatric_inpatient_bed_occupied_7_day_avg, Some(0.0));
        assert_eq!(rec.geocoded_hospital_address.as_deref(), Some("POINT (-85.36 31.21)"));
    }

    #[test]
    fn test_empty_cells_are_null() {
        let rec = parse_one("010001,2022/01/04,,,,,,,,,,,,,,,,").unwrap();
        assert_eq!(rec.collection_week, NaiveDate::from_ymd_opt(2022, 1, 4).unwrap());
        assert_eq!(rec.hospital_name, None);
        assert_eq!(rec.total_icu_beds_7_day_avg, None);
    }

    #[test]
    fn test_bad_metric_is_an_error() {
        let err = parse_one("010001,2022-01-04,AL,,X,,,,,lots,,,,,,,,").unwrap_err();
        assert!(err.to_string().contains("invalid number"));
    }

    #[test]
    fn test_missing_collection_week() {
        assert!(parse_one("010001,,AL,,X,,,,,,,,,,,,,").is_err());
    }

    #[test]
    fn test_params_follow_columns() {
        let rec = parse_one("010001,2022-01-04,,,,,,,,,,,,,,,,").unwrap();
        assert_eq!(rec.params().len(), HhsRecord::COLUMNS.len());
    }
}
