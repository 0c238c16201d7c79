use sqlx::{PgConnection, PgPool};
use tracing::debug;

use crate::copy::CopyBuffer;
use crate::error::Result;
use crate::schema::Table;

/// Upper bound for a single CopyData message.
const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// Streams one table's rows with `COPY ... FROM STDIN`, inside its own
/// transaction.
pub struct BulkLoader<'a> {
    pool: &'a PgPool,
}

impl<'a> BulkLoader<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Returns the number of rows the server reports as copied. On failure
    /// the transaction is rolled back and nothing from this call is visible.
    pub async fn load(&self, table: &Table, rows: &CopyBuffer) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        match copy_rows(&mut tx, table, rows).await {
            Ok(copied) => {
                tx.commit().await?;
                debug!("Committed {} rows into {}", copied, table.name);
                Ok(copied)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    debug!("Rollback of {} failed: {}", table.name, rollback);
                }
                Err(e)
            }
        }
    }
}

async fn copy_rows(conn: &mut PgConnection, table: &Table, rows: &CopyBuffer) -> Result<u64> {
    let mut copy = conn.copy_in_raw(&table.copy_statement()).await?;

    for chunk in rows.as_bytes().chunks(COPY_CHUNK_SIZE) {
        let sent = copy.send(chunk).await.map(|_| ());
        if let Err(e) = sent {
            // The abort reply is the error we already have.
            let _ = copy.abort(e.to_string()).await;
            return Err(e.into());
        }
    }

    Ok(copy.finish().await?)
}
