//! The persistence store. A single `subscribers` table inside an SQLite database,
//! accessed through a pooled `DbManager` that is shared by every request.

mod subscriber;

pub use subscriber::Subscriber;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::config::DbConfig;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS subscribers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    name VARCHAR(255) NULL,
    timestamp DATETIME NOT NULL
)
"#;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: SqlitePool,
}

impl DbManager {
    /// Creates the pool and makes sure the schema exists.
    pub async fn init(config: &DbConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let con_opts = config
            .connection_options()
            .map_err(|er| Error::FailToCreatePool(er.to_string()))?;

        let pool_opts = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout());
        // Every connection to an in-memory database opens a brand new database,
        // so the pool has to keep exactly one connection alive.
        let pool_opts = if config.is_in_memory() {
            pool_opts
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_opts.max_connections(config.max_connections.max(1))
        };

        let db_pool = pool_opts
            .connect_with(con_opts)
            .await
            .map_err(|ex| Error::FailToCreatePool(ex.to_string()))?;

        let dm = Self { db: db_pool };
        dm.ensure_schema().await?;

        Ok(dm)
    }

    /// Idempotent, safe to call on every startup.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.db).await?;
        Ok(())
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn close(&self) {
        info!("{:<20} - Closing the DB pool", "close_db");
        self.db.close().await;
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
