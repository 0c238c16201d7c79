use std::collections::HashMap;
use std::time::Duration;

use std::future::Future;

use storage::repository::CatalogRepository;
use storage::{BulkLoader, CopyBuffer, Database, SchemaManager, StorageError, Table};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::cleaner::{CleanReport, ReferenceCleaner};
use crate::config::{Dispatch, ImportConfig};
use crate::document::GameData;
use crate::report::{ImportReport, TableLoad, TableLoadError};
use crate::{ImporterError, Result};

/// Drives one full import: parse, clean, reset the schema, load every table.
pub struct Importer {
    config: ImportConfig,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<ImportReport> {
        info!("Loading game data from: {}", self.config.input().display());
        let mut data = GameData::from_path(self.config.input()).await?;
        data.log_counts();

        let clean = ReferenceCleaner::clean(&mut data);
        clean.log_warnings();

        if self.config.validate_only {
            info!("Validation only, database left untouched");
            return Ok(ImportReport {
                clean,
                ..Default::default()
            });
        }

        info!(
            "Connecting to database at: {}",
            self.config.redacted_database_url()
        );
        let options = self
            .config
            .connect_options()
            .map_err(|e| ImporterError::Connection(e.into()))?;
        let db = Database::connect_with(options, self.config.max_connections)
            .await
            .map_err(ImporterError::Connection)?;

        let result = self.import_into(&db, &data, clean).await;
        db.close().await;
        result
    }

    /// Replaces the schema and contents of `db` with `data`.
    ///
    /// Tables load tier by tier so that foreign keys always point at
    /// committed rows. A failed tier stops the run; tables committed before
    /// it stay committed.
    pub async fn import_into(
        &self,
        db: &Database,
        data: &GameData,
        clean: CleanReport,
    ) -> Result<ImportReport> {
        let schema = SchemaManager::new();

        info!("Resetting schema...");
        schema
            .reset(db.pool())
            .await
            .map_err(ImporterError::Schema)?;

        let mut payloads: HashMap<&'static str, CopyBuffer> = data
            .payloads()
            .into_iter()
            .map(|p| (p.table.name, p.rows))
            .collect();

        let mut report = ImportReport {
            clean,
            ..Default::default()
        };

        for tier in schema.load_tiers() {
            if !report.failed.is_empty() {
                report.skipped.extend(tier.iter().map(|t| t.name));
                continue;
            }

            let jobs: Vec<(&'static Table, CopyBuffer)> = tier
                .iter()
                .map(|t| (*t, payloads.remove(t.name).unwrap_or_default()))
                .collect();

            let outcomes = match self.config.dispatch {
                Dispatch::Concurrent => load_concurrently(db, jobs, self.config.load_timeout).await,
                Dispatch::Sequential => load_sequentially(db, jobs, self.config.load_timeout).await,
            };

            for outcome in outcomes {
                match outcome {
                    Ok(load) => {
                        info!("✓ {} ({} rows)", load.table, load.rows);
                        report.committed.push(load);
                    }
                    Err(failure) => {
                        error!("✗ {}: {}", failure.table, failure.source);
                        report.failed.push(failure);
                    }
                }
            }
        }

        if report.failed.is_empty() {
            report.stored = stored_row_counts(db, &schema).await;
            Ok(report)
        } else {
            if !report.skipped.is_empty() {
                warn!("Skipped dependent tables: {}", report.skipped.join(", "));
            }
            Err(ImporterError::Load(Box::new(report)))
        }
    }
}

/// Counts what the store holds per table. A table that cannot be counted is
/// left out of the summary; the import itself already succeeded.
async fn stored_row_counts(db: &Database, schema: &SchemaManager) -> Vec<(&'static str, i64)> {
    let catalog = CatalogRepository::new(db.pool());
    let mut counts = Vec::new();

    for table in schema.create_order() {
        match catalog.count_rows(table).await {
            Ok(rows) => counts.push((table.name, rows)),
            Err(e) => warn!("Could not count rows in {}: {}", table.name, e),
        }
    }

    counts
}

/// Reads, cleans and loads the document described by `config`.
pub async fn import(config: ImportConfig) -> Result<ImportReport> {
    Importer::new(config).run().await
}

type LoadOutcome = std::result::Result<TableLoad, TableLoadError>;

async fn load_table(
    db: &Database,
    table: &'static Table,
    rows: &CopyBuffer,
    timeout: Option<Duration>,
) -> LoadOutcome {
    let loader = BulkLoader::new(db.pool());

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, loader.load(table, rows)).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(limit)),
        },
        None => loader.load(table, rows).await,
    };

    result
        .map(|rows| TableLoad {
            table: table.name,
            rows,
        })
        .map_err(|source| TableLoadError {
            table: table.name,
            source,
        })
}

async fn load_sequentially(
    db: &Database,
    jobs: Vec<(&'static Table, CopyBuffer)>,
    timeout: Option<Duration>,
) -> Vec<LoadOutcome> {
    let mut outcomes = Vec::with_capacity(jobs.len());
    for (table, rows) in jobs {
        outcomes.push(load_table(db, table, &rows, timeout).await);
    }
    outcomes
}

/// Runs every job on its own task and waits for all of them. Outcomes come
/// back in job order regardless of completion order.
async fn load_concurrently(
    db: &Database,
    jobs: Vec<(&'static Table, CopyBuffer)>,
    timeout: Option<Duration>,
) -> Vec<LoadOutcome> {
    let loads = jobs.into_iter().map(|(table, rows)| {
        let db = db.clone();
        (table, async move { load_table(&db, table, &rows, timeout).await })
    });

    join_loads(loads).await
}

/// A task that panics or is cancelled counts as a failed load of its table.
async fn join_loads<F>(loads: impl IntoIterator<Item = (&'static Table, F)>) -> Vec<LoadOutcome>
where
    F: Future<Output = LoadOutcome> + Send + 'static,
{
    let mut set = JoinSet::new();
    let mut tasks = HashMap::new();

    for (idx, (table, load)) in loads.into_iter().enumerate() {
        let handle = set.spawn(load);
        tasks.insert(handle.id(), (idx, table));
    }

    let mut outcomes: Vec<(usize, LoadOutcome)> = Vec::with_capacity(tasks.len());
    while let Some(joined) = set.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                if let Some((idx, _)) = tasks.get(&id) {
                    outcomes.push((*idx, outcome));
                }
            }
            Err(e) => {
                if let Some((idx, table)) = tasks.get(&e.id()) {
                    outcomes.push((
                        *idx,
                        Err(TableLoadError {
                            table: table.name,
                            source: StorageError::Interrupted(e.to_string()),
                        }),
                    ));
                }
            }
        }
    }

    outcomes.sort_by_key(|(idx, _)| *idx);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}
