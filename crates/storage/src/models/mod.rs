mod ascension_cost;
mod ascension_level;
mod class;
mod material;
mod servant;
mod skill_cost;
mod skill_level;
pub(crate) mod string_int;

pub use ascension_cost::AscensionCost;
pub use ascension_level::AscensionLevel;
pub use class::Class;
pub use material::Material;
pub use servant::Servant;
pub use skill_cost::SkillCost;
pub use skill_level::SkillLevel;

use std::collections::BTreeMap;

use crate::copy::CopyBuffer;
use crate::schema::Table;

/// Entities keyed by the identifier the source document assigned them.
pub type Collection<T> = BTreeMap<i32, T>;

/// An entity that maps onto one row of a managed table.
pub trait Record {
    const TABLE: &'static Table;

    /// Appends this entity's columns, in `TABLE.columns` order, to `buffer`.
    fn encode(&self, id: i32, buffer: &mut CopyBuffer);
}

pub fn encode_collection<T: Record>(collection: &Collection<T>) -> CopyBuffer {
    let mut buffer = CopyBuffer::new();
    for (id, record) in collection {
        record.encode(*id, &mut buffer);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servant_uses_document_field_names() {
        let servant: Servant = serde_json::from_str(
            r#"{"name": "Arthur", "rarity": "5", "icon": "c.png", "classId": "1"}"#,
        )
        .unwrap();

        assert_eq!(
            servant,
            Servant {
                name: "Arthur".to_string(),
                rarity: 5,
                icon: "c.png".to_string(),
                class_id: 1,
            }
        );
    }

    #[test]
    fn test_collection_keys_are_digit_strings() {
        let costs: Collection<SkillCost> = serde_json::from_str(
            r#"{
                "10": {"skillLevelId": "1", "materialId": "2", "amount": "3"},
                "2": {"skillLevelId": "1", "materialId": "4", "amount": "12"}
            }"#,
        )
        .unwrap();

        assert_eq!(costs.keys().copied().collect::<Vec<_>>(), vec![2, 10]);
        assert_eq!(costs[&10].amount, 3);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = serde_json::from_str::<AscensionLevel>(r#"{"ascendTo": "1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encoded_rows_follow_table_columns() {
        let mut materials = Collection::new();
        materials.insert(
            3,
            Material {
                name: "Gem".to_string(),
                icon: "b.png".to_string(),
                order: 1,
            },
        );
        let buffer = encode_collection(&materials);

        assert_eq!(Material::TABLE.columns, &["id", "name", "icon", "position"]);
        assert_eq!(buffer.rows(), 1);
        assert_eq!(std::str::from_utf8(buffer.as_bytes()).unwrap(), "3\tGem\tb.png\t1\n");
    }

    #[test]
    fn test_level_and_cost_column_order() {
        let mut buffer = CopyBuffer::new();
        SkillLevel { level_to: 2, servant_id: 1 }.encode(5, &mut buffer);
        AscensionCost {
            ascension_level_id: 4,
            material_id: 6,
            amount: 8,
        }
        .encode(9, &mut buffer);

        assert_eq!(
            std::str::from_utf8(buffer.as_bytes()).unwrap(),
            "5\t1\t2\n9\t4\t6\t8\n"
        );
    }
}
