//! Connection settings, read from the environment.
//!
//! `DATABASE_URL` wins when set and accepts either a `postgres://` URL or a
//! libpq key/value string. Otherwise the usual `PG*` variables are used.

use std::{env, path::PathBuf};

use crate::error::LoadError;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const LOG_FILE: &str = "LOADER_LOG_FILE";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const APPLICATION_NAME: &str = "hospital-loader";

#[derive(Debug, Clone)]
pub struct DbConfig {
    pg: tokio_postgres::Config,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, LoadError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut pg = if let Some(url) = get(DATABASE_URL) {
            url.parse::<tokio_postgres::Config>()
                .map_err(|e| LoadError::Config(format!("{DATABASE_URL}: {e}")))?
        } else {
            let user = get("PGUSER").ok_or_else(|| {
                LoadError::Config(format!("set {DATABASE_URL} or PGHOST/PGUSER/PGDATABASE"))
            })?;
            let port = match get("PGPORT") {
                Some(raw) => raw
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| LoadError::Config(format!("PGPORT: invalid port {raw:?}")))?,
                None => DEFAULT_PORT,
            };

            let mut pg = tokio_postgres::Config::new();
            pg.host(get("PGHOST").as_deref().unwrap_or(DEFAULT_HOST))
                .port(port)
                .user(&user);
            if let Some(password) = get("PGPASSWORD") {
                pg.password(password);
            }
            if let Some(dbname) = get("PGDATABASE") {
                pg.dbname(&dbname);
            }
            pg
        };

        if pg.get_application_name().is_none() {
            pg.application_name(APPLICATION_NAME);
        }
        Ok(Self { pg })
    }

    pub fn pg(&self) -> &tokio_postgres::Config {
        &self.pg
    }
}

/// Extra log destination, if `LOADER_LOG_FILE` is set.
pub fn log_file_from_env() -> Option<PathBuf> {
    env::var_os(LOG_FILE)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
