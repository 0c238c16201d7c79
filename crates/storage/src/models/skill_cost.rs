use serde::{Deserialize, Serialize};

use super::{Record, string_int};
use crate::copy::CopyBuffer;
use crate::schema::{SKILL_COSTS, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCost {
    #[serde(with = "string_int")]
    pub skill_level_id: i32,
    #[serde(with = "string_int")]
    pub material_id: i32,
    #[serde(with = "string_int")]
    pub amount: i32,
}

impl Record for SkillCost {
    const TABLE: &'static Table = &SKILL_COSTS;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[
            id.into(),
            self.skill_level_id.into(),
            self.material_id.into(),
            self.amount.into(),
        ]);
    }
}
