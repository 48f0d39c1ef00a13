use anyhow::{Context, Result};
use hospital_loader::{config, logging, quality, LoadError, LoadSummary};
use std::{env, path::Path, process::ExitCode};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = logging::init(config::log_file_from_env().as_deref()) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <date> <csv_file>", args[0]);
        return ExitCode::from(1);
    }
    let (date, csv_file) = (&args[1], Path::new(&args[2]));

    match run(date, csv_file).await {
        Ok(summary) => {
            info!(
                "Data loaded successfully: {} rows into {} for {}",
                summary.rows_inserted, summary.table, date
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(e.downcast_ref::<LoadError>().map_or(1, LoadError::exit_code))
        }
    }
}

async fn run(date: &str, path: &Path) -> Result<LoadSummary> {
    info!("startup");
    quality::run(date, path)
        .await
        .with_context(|| format!("loading quality data from {}", path.display()))
}
