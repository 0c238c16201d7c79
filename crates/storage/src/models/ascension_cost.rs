use serde::{Deserialize, Serialize};

use super::{Record, string_int};
use crate::copy::CopyBuffer;
use crate::schema::{ASCENSION_COSTS, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AscensionCost {
    #[serde(with = "string_int")]
    pub ascension_level_id: i32,
    #[serde(with = "string_int")]
    pub material_id: i32,
    #[serde(with = "string_int")]
    pub amount: i32,
}

impl Record for AscensionCost {
    const TABLE: &'static Table = &ASCENSION_COSTS;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[
            id.into(),
            self.ascension_level_id.into(),
            self.material_id.into(),
            self.amount.into(),
        ]);
    }
}
