use storage::StorageError;
use tracing::{info, warn};

use crate::cleaner::CleanReport;

/// A table whose load transaction committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub table: &'static str,
    pub rows: u64,
}

/// A table whose load transaction was rolled back.
#[derive(Debug)]
pub struct TableLoadError {
    pub table: &'static str,
    pub source: StorageError,
}

/// Outcome of one import run. Loads are only atomic per table, so a failed
/// run can still have committed tables; they are listed here.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub clean: CleanReport,
    pub committed: Vec<TableLoad>,
    pub failed: Vec<TableLoadError>,
    /// Tables never dispatched because a table they depend on failed.
    pub skipped: Vec<&'static str>,
    /// Row count of every managed table, read back from the store after a
    /// successful run.
    pub stored: Vec<(&'static str, i64)>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn committed_tables(&self) -> Vec<&'static str> {
        self.committed.iter().map(|l| l.table).collect()
    }

    pub fn failed_tables(&self) -> Vec<&'static str> {
        self.failed.iter().map(|f| f.table).collect()
    }

    pub fn rows_committed(&self) -> u64 {
        self.committed.iter().map(|l| l.rows).sum()
    }

    pub fn log_summary(&self) {
        for load in &self.committed {
            info!("  {}: {} rows", load.table, load.rows);
        }
        for failure in &self.failed {
            warn!("  {}: rolled back ({})", failure.table, failure.source);
        }
        for table in &self.skipped {
            warn!("  {}: skipped", table);
        }
        if !self.stored.is_empty() {
            info!("Rows now in the store:");
            for (table, rows) in &self.stored {
                info!("  {}: {}", table, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_report_lists_committed_and_failed_tables() {
        let report = ImportReport {
            committed: vec![
                TableLoad {
                    table: "materials",
                    rows: 3,
                },
                TableLoad {
                    table: "classes",
                    rows: 2,
                },
            ],
            failed: vec![TableLoadError {
                table: "servants",
                source: StorageError::Timeout(Duration::from_secs(1)),
            }],
            skipped: vec!["skill_levels"],
            ..Default::default()
        };

        assert!(!report.is_success());
        assert_eq!(report.committed_tables(), vec!["materials", "classes"]);
        assert_eq!(report.failed_tables(), vec!["servants"]);
        assert_eq!(report.rows_committed(), 5);
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(ImportReport::default().is_success());
    }
}
