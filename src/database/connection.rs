use std::str::FromStr;

use log::info;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::Config, error::QueryError};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the pool described by `config` and brings the schema up to date.
pub async fn connect(config: &Config) -> Result<Pool<Sqlite>, QueryError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // In-memory databases disappear with their connection, keep them open.
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|e| QueryError::new(format!("Migration failed: {e}")))?;

    info!("Connected to {}", config.database_url);
    Ok(pool)
}
