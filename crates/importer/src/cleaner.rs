use tracing::warn;

use crate::document::GameData;

/// Ids removed by one cleaning pass, per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub skill_levels: Vec<i32>,
    pub ascension_levels: Vec<i32>,
    pub skill_costs: Vec<i32>,
    pub ascension_costs: Vec<i32>,
}

impl CleanReport {
    pub fn is_empty(&self) -> bool {
        self.removed() == 0
    }

    pub fn removed(&self) -> usize {
        self.skill_levels.len()
            + self.ascension_levels.len()
            + self.skill_costs.len()
            + self.ascension_costs.len()
    }

    pub fn log_warnings(&self) {
        let groups = [
            ("skill levels", "unknown servant", &self.skill_levels),
            ("ascension levels", "unknown servant", &self.ascension_levels),
            ("skill costs", "removed skill level", &self.skill_costs),
            ("ascension costs", "removed ascension level", &self.ascension_costs),
        ];

        for (what, why, ids) in groups {
            if !ids.is_empty() {
                warn!("Dropped {} {} referencing a {}: {:?}", ids.len(), what, why, ids);
            }
        }
    }
}

/// Removes leveling records that point at entities missing from the document.
///
/// Levels whose servant is absent are dropped, then costs whose level is
/// absent. Servant classes and cost materials are left for the store's
/// foreign keys to reject.
pub struct ReferenceCleaner;

impl ReferenceCleaner {
    pub fn clean(data: &mut GameData) -> CleanReport {
        let mut report = CleanReport::default();

        let servants = &data.servants;
        data.skill_levels.retain(|id, level| {
            let keep = servants.contains_key(&level.servant_id);
            if !keep {
                report.skill_levels.push(*id);
            }
            keep
        });
        data.ascension_levels.retain(|id, level| {
            let keep = servants.contains_key(&level.servant_id);
            if !keep {
                report.ascension_levels.push(*id);
            }
            keep
        });

        let skill_levels = &data.skill_levels;
        data.skill_costs.retain(|id, cost| {
            let keep = skill_levels.contains_key(&cost.skill_level_id);
            if !keep {
                report.skill_costs.push(*id);
            }
            keep
        });
        let ascension_levels = &data.ascension_levels;
        data.ascension_costs.retain(|id, cost| {
            let keep = ascension_levels.contains_key(&cost.ascension_level_id);
            if !keep {
                report.ascension_costs.push(*id);
            }
            keep
        });

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::MINIMAL_DOCUMENT;
    use storage::models::{AscensionCost, AscensionLevel, SkillCost, SkillLevel};

    fn minimal() -> GameData {
        GameData::from_json(MINIMAL_DOCUMENT).unwrap()
    }

    #[test]
    fn test_clean_document_is_untouched() {
        let mut data = minimal();
        let report = ReferenceCleaner::clean(&mut data);

        assert!(report.is_empty());
        assert_eq!(data, minimal());
    }

    #[test]
    fn test_dangling_skill_level_is_removed_and_nothing_else() {
        let mut data = minimal();
        data.skill_levels.insert(
            2,
            SkillLevel {
                level_to: 3,
                servant_id: 99,
            },
        );

        let report = ReferenceCleaner::clean(&mut data);

        assert_eq!(report.skill_levels, vec![2]);
        assert_eq!(report.removed(), 1);
        assert_eq!(data, minimal());
    }

    #[test]
    fn test_dangling_ascension_level_is_removed() {
        let mut data = minimal();
        data.ascension_levels.insert(
            1,
            AscensionLevel {
                ascend_to: 1,
                servant_id: 1,
            },
        );
        data.ascension_levels.insert(
            2,
            AscensionLevel {
                ascend_to: 1,
                servant_id: 42,
            },
        );

        let report = ReferenceCleaner::clean(&mut data);

        assert_eq!(report.ascension_levels, vec![2]);
        assert!(data.ascension_levels.contains_key(&1));
        assert!(!data.ascension_levels.contains_key(&2));
    }

    #[test]
    fn test_costs_of_removed_levels_are_removed() {
        let mut data = minimal();
        data.skill_levels.insert(
            2,
            SkillLevel {
                level_to: 3,
                servant_id: 99,
            },
        );
        data.skill_costs.insert(
            2,
            SkillCost {
                skill_level_id: 2,
                material_id: 1,
                amount: 4,
            },
        );
        data.ascension_levels.insert(
            5,
            AscensionLevel {
                ascend_to: 1,
                servant_id: 99,
            },
        );
        data.ascension_costs.insert(
            7,
            AscensionCost {
                ascension_level_id: 5,
                material_id: 1,
                amount: 10,
            },
        );

        let report = ReferenceCleaner::clean(&mut data);

        assert_eq!(report.skill_levels, vec![2]);
        assert_eq!(report.skill_costs, vec![2]);
        assert_eq!(report.ascension_levels, vec![5]);
        assert_eq!(report.ascension_costs, vec![7]);
        assert_eq!(data, minimal());
    }

    #[test]
    fn test_unknown_class_and_material_are_left_for_the_store() {
        let mut data = minimal();
        data.servants.get_mut(&1).unwrap().class_id = 7;
        data.skill_costs.get_mut(&1).unwrap().material_id = 7;
        let expected = data.clone();

        let report = ReferenceCleaner::clean(&mut data);

        assert!(report.is_empty());
        assert_eq!(data, expected);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut data = minimal();
        data.skill_levels.insert(
            3,
            SkillLevel {
                level_to: 4,
                servant_id: 2,
            },
        );
        data.skill_costs.insert(
            9,
            SkillCost {
                skill_level_id: 3,
                material_id: 1,
                amount: 1,
            },
        );

        ReferenceCleaner::clean(&mut data);
        let once = data.clone();
        let second = ReferenceCleaner::clean(&mut data);

        assert!(second.is_empty());
        assert_eq!(data, once);
    }

    #[test]
    fn test_every_remaining_level_references_a_servant() {
        let mut data = minimal();
        for id in 10..20 {
            data.skill_levels.insert(
                id,
                SkillLevel {
                    level_to: id,
                    servant_id: id % 3,
                },
            );
            data.ascension_levels.insert(
                id,
                AscensionLevel {
                    ascend_to: id,
                    servant_id: id % 2,
                },
            );
        }

        ReferenceCleaner::clean(&mut data);

        assert!(
            data.skill_levels
                .values()
                .all(|l| data.servants.contains_key(&l.servant_id))
        );
        assert!(
            data.ascension_levels
                .values()
                .all(|l| data.servants.contains_key(&l.servant_id))
        );
    }
}
