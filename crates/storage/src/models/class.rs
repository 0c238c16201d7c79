use serde::{Deserialize, Serialize};

use super::Record;
use crate::copy::CopyBuffer;
use crate::schema::{CLASSES, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub icon: String,
}

impl Record for Class {
    const TABLE: &'static Table = &CLASSES;

    fn encode(&self, id: i32, buffer: &mut CopyBuffer) {
        buffer.push_row(&[id.into(), (&self.name).into(), (&self.icon).into()]);
    }
}
