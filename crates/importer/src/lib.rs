pub mod cleaner;
pub mod config;
pub mod document;
pub mod error;
pub mod orchestrator;
pub mod report;

pub use cleaner::{CleanReport, ReferenceCleaner};
pub use config::{Dispatch, ImportConfig};
pub use document::GameData;
pub use error::{ImporterError, Result};
pub use orchestrator::{Importer, import};
pub use report::{ImportReport, TableLoad, TableLoadError};
