use serde::{Deserialize, Serialize};
use std::path::Path;
use storage::CopyBuffer;
use storage::models::{
    AscensionCost, AscensionLevel, Class, Collection, Material, Servant, SkillCost, SkillLevel,
    encode_collection,
};
use storage::schema::Table;
use tracing::info;

use crate::{ImporterError, Result};

/// The whole input document: seven entity collections keyed by id.
///
/// A collection missing from the document is read as empty. Entity fields
/// have no defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    #[serde(default)]
    pub servants: Collection<Servant>,
    #[serde(default)]
    pub classes: Collection<Class>,
    #[serde(default)]
    pub materials: Collection<Material>,
    #[serde(default)]
    pub ascension_levels: Collection<AscensionLevel>,
    #[serde(default)]
    pub ascension_costs: Collection<AscensionCost>,
    #[serde(default)]
    pub skill_levels: Collection<SkillLevel>,
    #[serde(default)]
    pub skill_costs: Collection<SkillCost>,
}

/// One table's encoded rows, ready for the bulk loader.
#[derive(Debug)]
pub struct TablePayload {
    pub table: &'static Table,
    pub rows: CopyBuffer,
}

impl GameData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ImporterError::ReadInput {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_json(&json)
    }

    /// Encodes every collection for its destination table.
    pub fn payloads(&self) -> Vec<TablePayload> {
        vec![
            payload(&self.materials),
            payload(&self.classes),
            payload(&self.servants),
            payload(&self.ascension_levels),
            payload(&self.skill_levels),
            payload(&self.ascension_costs),
            payload(&self.skill_costs),
        ]
    }

    pub fn log_counts(&self) {
        info!(
            "Loaded {} classes, {} materials, {} servants",
            self.classes.len(),
            self.materials.len(),
            self.servants.len()
        );
        info!(
            "Loaded {} skill levels ({} costs), {} ascension levels ({} costs)",
            self.skill_levels.len(),
            self.skill_costs.len(),
            self.ascension_levels.len(),
            self.ascension_costs.len()
        );
    }
}

fn payload<T: storage::models::Record>(collection: &Collection<T>) -> TablePayload {
    TablePayload {
        table: T::TABLE,
        rows: encode_collection(collection),
    }
}
