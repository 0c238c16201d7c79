pub mod copy;
pub mod error;
pub mod loader;
pub mod models;
pub mod repository;
pub mod schema;

pub use copy::{CopyBuffer, CopyValue};
pub use error::{Result, StorageError};
pub use loader::BulkLoader;
pub use schema::{SchemaManager, TABLES, Table};

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

/// Connection pool shared by the schema reset and every table load.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn connect_with(options: PgConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard};

    static DATABASE_LOCK: Mutex<()> = Mutex::new(());

    /// Database tests rebuild the same tables, so they take turns.
    pub(crate) fn database_lock() -> MutexGuard<'static, ()> {
        DATABASE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }
}
