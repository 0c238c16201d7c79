use serde::{Deserialize, Serialize};

use super::{Record, string_int};
use crate::copy::CopyBuffer;
use crate::schema::{SERVANTS, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Servant {
    pub name: String,
    #[serde(with = "string_int")]
    pub rarity: i32,
    pub icon: String,
    #[serde(with = "string_int")]
    pub class_id: i32,
}

impl Record for Servant {
    const TABLE: &'static Table = &SERVANTS;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[
            id.into(),
            (&self.name).into(),
            (&self.icon).into(),
            self.rarity.into(),
            self.class_id.into(),
        ]);
    }
}
