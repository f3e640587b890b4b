//! Owns the Postgres connection pool and the `narocniki` table definition.

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::DbConfig;

/// Fixed-width columns, Postgres pads them with blanks on the way out.
const CREATE_SUBSCRIBERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS narocniki (
        id INTEGER PRIMARY KEY,
        ime CHAR(64) NOT NULL,
        priimek CHAR(64) NOT NULL,
        uporabnisko_ime CHAR(64) NOT NULL,
        telefonska_stevilka CHAR(32),
        ocena CHAR(20) NOT NULL DEFAULT '-1'
    )
"#;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Connects to the database and makes sure the subscriber table exists.
    /// Fails if the database is unreachable.
    pub async fn init(db_config: &DbConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let dm = Self::connect_lazy(db_config);
        dm.ensure_schema().await?;
        info!("{:<20} - Connected to {}", "init_db", db_config.host);

        Ok(dm)
    }

    /// Builds the pool without opening any connection.
    /// Connections get established on first use and are bounded by `max_connections`.
    pub fn connect_lazy(db_config: &DbConfig) -> Self {
        let db = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(db_config.acquire_timeout())
            .connect_lazy_with(db_config.connection_options());

        Self { db }
    }

    /// Creates the subscriber table if it is missing. There are no migrations,
    /// changing the schema means changing the statement above.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_SUBSCRIBERS_TABLE)
            .execute(&self.db)
            .await
            .map_err(Error::EnsureSchema)?;

        Ok(())
    }

    /// Creates a fresh, uniquely named database on the configured server,
    /// then initializes it. Used by the integration tests.
    pub async fn test_init(db_config: &DbConfig) -> Result<Self> {
        let mut db_config = db_config.clone();
        db_config.db_name = format!("narocniki_test_{}", Uuid::new_v4().simple());
        db_config.max_connections = 1;

        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;
        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;
        connection.close().await?;

        Self::init(&db_config).await
    }

    /// Closes every connection in the pool, waiting for checked out ones to be returned.
    pub async fn close(&self) {
        self.db.close().await;
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to ensure the subscriber table exists: {0}")]
    EnsureSchema(sqlx::Error),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
