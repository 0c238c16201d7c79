use sqlx::PgPool;

use crate::error::Result;
use crate::schema::{TABLES, Table};

/// Read-only queries about what an import left in the store.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_rows(&self, table: &Table) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table.name))
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Names of the managed tables present in the current schema
    pub async fn existing_tables(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
            ORDER BY table_name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names
            .into_iter()
            .filter(|name| TABLES.iter().any(|t| t.name == name))
            .collect())
    }
}
