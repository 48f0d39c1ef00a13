//! Runs against a real server. Point `DATABASE_URL` at a scratch database and
//! run with `--ignored`; the tables are session-local temporaries.

mod common;

use anyhow::Result;
use common::fixture;
use hospital_loader::{
    config::DbConfig,
    db::PgSink,
    hhs::{self, HhsRecord},
    quality::{self, QualityRow},
    CsvSource, LoadError,
};
use tokio_postgres::{Client, NoTls};

const SCHEMA: &str = include_str!("../sql/schema.sql");

async fn scratch_client() -> Result<Client> {
    let config = DbConfig::from_env()?;
    let (client, connection) = config.pg().connect(NoTls).await?;
    tokio::spawn(connection);
    client
        .batch_execute(&SCHEMA.replace("CREATE TABLE IF NOT EXISTS", "CREATE TEMP TABLE"))
        .await?;
    Ok(client)
}

async fn count(client: &Client, sql: &str) -> Result<i64> {
    Ok(client.query_one(sql, &[]).await?.get(0))
}

#[tokio::test]
#[ignore]
async fn test_hhs_rows_reach_the_table() -> Result<()> {
    let mut sink = PgSink::<HhsRecord>::new(scratch_client().await?);

    let summary = hhs::load(CsvSource::open(fixture("2022-01-04-hhs-data.csv"))?, &mut sink).await?;
    assert_eq!(summary.rows_inserted, 3);

    let client = sink.client();
    assert_eq!(count(client, "SELECT COUNT(*) FROM hhs_weekly").await?, 3);
    assert_eq!(
        count(
            client,
            "SELECT COUNT(*) FROM hhs_weekly WHERE all_pediatric_inpatient_beds_7_day_avg IS NULL"
        )
        .await?,
        2
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_quality_rows_share_report_date() -> Result<()> {
    let mut sink = PgSink::<QualityRow>::new(scratch_client().await?);
    let date = quality::parse_report_date("2021-07-01")?;

    let source = CsvSource::open(fixture("Hospital_General_Information-2021-07.csv"))?;
    quality::load(source, date, &mut sink).await?;

    let client = sink.client();
    assert_eq!(
        count(
            client,
            "SELECT COUNT(*) FROM hospital_quality WHERE report_date = DATE '2021-07-01'"
        )
        .await?,
        5
    );
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_constraint_violation_keeps_earlier_rows() -> Result<()> {
    let client = scratch_client().await?;
    client
        .batch_execute("ALTER TABLE hhs_weekly ADD CONSTRAINT small_icu CHECK (total_icu_beds_7_day_avg < 35)")
        .await?;
    let mut sink = PgSink::<HhsRecord>::new(client);

    let err = hhs::load(CsvSource::open(fixture("2022-01-04-hhs-data.csv"))?, &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Insert { line: 4, .. }), "{err}");

    assert_eq!(count(sink.client(), "SELECT COUNT(*) FROM hhs_weekly").await?, 2);
    Ok(())
}
