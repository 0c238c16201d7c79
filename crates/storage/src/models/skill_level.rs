use serde::{Deserialize, Serialize};

use super::{Record, string_int};
use crate::copy::CopyBuffer;
use crate::schema::{SKILL_LEVELS, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLevel {
    #[serde(with = "string_int")]
    pub level_to: i32,
    #[serde(with = "string_int")]
    pub servant_id: i32,
}

impl Record for SkillLevel {
    const TABLE: &'static Table = &SKILL_LEVELS;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[id.into(), self.servant_id.into(), self.level_to.into()]);
    }
}
