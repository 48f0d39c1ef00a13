pub mod config;
pub mod db;
pub mod error;
pub mod hhs;
pub mod load;
pub mod logging;
pub mod quality;

pub use error::LoadError;
pub use load::{load_rows, CsvSource, LoadSummary};
