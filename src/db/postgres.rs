use std::marker::PhantomData;
use tokio_postgres::{Client, Config, NoTls, Statement};
use tracing::{debug, error, info};

use super::{insert_statement, Record, RowSink};
use crate::error::{BoxError, LoadError};

/// Inserts rows of `R` over a single PostgreSQL connection.
///
/// Statements run in autocommit mode, so every row commits on its own. The
/// connection closes when the sink is dropped.
pub struct PgSink<R> {
    client: Client,
    statement: Option<Statement>,
    _row: PhantomData<fn(&R)>,
}

impl<R: Record> PgSink<R> {
    pub async fn connect(config: &Config) -> Result<Self, LoadError> {
        let (client, connection) = config.connect(NoTls).await.map_err(LoadError::Connect)?;

        // the connection object drives the socket until the client is dropped
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("database connection error: {}", e);
            }
        });

        info!(
            "connected to {}",
            config.get_dbname().unwrap_or("default database")
        );
        Ok(Self::new(client))
    }

    pub fn new(client: Client) -> Self {
        Self {
            client,
            statement: None,
            _row: PhantomData,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn statement(&mut self) -> Result<Statement, tokio_postgres::Error> {
        if let Some(statement) = &self.statement {
            return Ok(statement.clone());
        }
        let sql = insert_statement::<R>();
        debug!("preparing {}", sql);
        let statement = self.client.prepare(&sql).await?;
        self.statement = Some(statement.clone());
        Ok(statement)
    }
}

impl<R: Record> RowSink<R> for PgSink<R> {
    async fn insert(&mut self, row: &R) -> Result<(), BoxError> {
        let statement = self.statement().await?;
        self.client.execute(&statement, &row.params()).await?;
        Ok(())
    }
}
