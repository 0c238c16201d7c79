use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// How the per-table loads of one dependency tier are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// One task per table, joined before the next tier starts.
    #[default]
    Concurrent,
    Sequential,
}

/// Everything one import run needs to know.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub input: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
    pub dispatch: Dispatch,
    /// Per-table bound on a single load; `None` waits forever.
    pub load_timeout: Option<Duration>,
    /// Parse and clean only, never touch the store.
    pub validate_only: bool,
}

impl ImportConfig {
    pub fn new(input: impl Into<PathBuf>, database_url: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            dispatch: Dispatch::default(),
            load_timeout: None,
            validate_only: false,
        }
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn with_load_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        PgConnectOptions::from_str(&self.database_url)
    }

    /// Host, port and database of the connection string. Credentials and
    /// query parameters never appear in it.
    pub fn redacted_database_url(&self) -> String {
        match self.connect_options() {
            Ok(options) => format!(
                "{}:{}/{}",
                options.get_host(),
                options.get_port(),
                options.get_database().unwrap_or_default()
            ),
            Err(_) => "unknown".to_string(),
        }
    }
}
