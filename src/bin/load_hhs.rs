use anyhow::{Context, Result};
use hospital_loader::{config, hhs, logging, LoadError, LoadSummary};
use std::{env, path::Path, process::ExitCode};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = logging::init(config::log_file_from_env().as_deref()) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <csv_file>", args[0]);
        return ExitCode::from(1);
    }

    match run(Path::new(&args[1])).await {
        Ok(summary) => {
            info!(
                "Data loaded successfully: {} rows into {}",
                summary.rows_inserted, summary.table
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(e.downcast_ref::<LoadError>().map_or(1, LoadError::exit_code))
        }
    }
}

async fn run(path: &Path) -> Result<LoadSummary> {
    info!("startup");
    hhs::run(path)
        .await
        .with_context(|| format!("loading HHS data from {}", path.display()))
}
