use serde::{Deserialize, Serialize};

use super::{Record, string_int};
use crate::copy::CopyBuffer;
use crate::schema::{MATERIALS, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub icon: String,
    /// Display position, stored in the `position` column.
    #[serde(with = "string_int")]
    pub order: i32,
}

impl Record for Material {
    const TABLE: &'static Table = &MATERIALS;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[
            id.into(),
            (&self.name).into(),
            (&self.icon).into(),
            self.order.into(),
        ]);
    }
}
