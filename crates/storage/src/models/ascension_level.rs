use serde::{Deserialize, Serialize};

use super::{Record, string_int};
use crate::copy::CopyBuffer;
use crate::schema::{ASCENSION_LEVELS, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AscensionLevel {
    #[serde(with = "string_int")]
    pub ascend_to: i32,
    #[serde(with = "string_int")]
    pub servant_id: i32,
}

impl Record for AscensionLevel {
    const TABLE: &'static Table = &ASCENSION_LEVELS;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[id.into(), self.servant_id.into(), self.ascend_to.into()]);
    }
}
