use sqlx::{PgConnection, PgPool};
use tracing::debug;

use crate::error::Result;

/// Static description of one managed table.
///
/// The drop and COPY statements are derived from the name and column list,
/// so a table is fully described by this value.
#[derive(Debug, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    /// Column order used by COPY; `id` always comes first.
    pub columns: &'static [&'static str],
    /// Tables this one holds foreign keys into.
    pub references: &'static [&'static str],
    pub create: &'static str,
}

impl Table {
    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    pub fn copy_statement(&self) -> String {
        format!("COPY {} ({}) FROM STDIN", self.name, self.columns.join(", "))
    }
}

pub const MATERIALS: Table = Table {
    name: "materials",
    columns: &["id", "name", "icon", "position"],
    references: &[],
    create: r#"
        CREATE TABLE materials (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL UNIQUE,
            position INTEGER NOT NULL UNIQUE
        )
    "#,
};

pub const CLASSES: Table = Table {
    name: "classes",
    columns: &["id", "name", "icon"],
    references: &[],
    create: r#"
        CREATE TABLE classes (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL UNIQUE
        )
    "#,
};

pub const SERVANTS: Table = Table {
    name: "servants",
    columns: &["id", "name", "icon", "rarity", "class_id"],
    references: &["classes"],
    create: r#"
        CREATE TABLE servants (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT NOT NULL UNIQUE,
            rarity INTEGER NOT NULL,
            class_id INTEGER NOT NULL REFERENCES classes(id),

            UNIQUE (class_id, rarity, name)
        )
    "#,
};

pub const ASCENSION_LEVELS: Table = Table {
    name: "ascension_levels",
    columns: &["id", "servant_id", "ascend_to"],
    references: &["servants"],
    create: r#"
        CREATE TABLE ascension_levels (
            id INTEGER PRIMARY KEY,
            servant_id INTEGER NOT NULL REFERENCES servants(id),
            ascend_to INTEGER NOT NULL,

            UNIQUE (servant_id, ascend_to)
        )
    "#,
};

pub const SKILL_LEVELS: Table = Table {
    name: "skill_levels",
    columns: &["id", "servant_id", "level_to"],
    references: &["servants"],
    create: r#"
        CREATE TABLE skill_levels (
            id INTEGER PRIMARY KEY,
            servant_id INTEGER NOT NULL REFERENCES servants(id),
            level_to INTEGER NOT NULL,

            UNIQUE (servant_id, level_to)
        )
    "#,
};

pub const ASCENSION_COSTS: Table = Table {
    name: "ascension_costs",
    columns: &["id", "ascension_level_id", "material_id", "amount"],
    references: &["ascension_levels", "materials"],
    create: r#"
        CREATE TABLE ascension_costs (
            id INTEGER PRIMARY KEY,
            ascension_level_id INTEGER NOT NULL REFERENCES ascension_levels(id),
            material_id INTEGER NOT NULL REFERENCES materials(id),
            amount INTEGER NOT NULL,

            UNIQUE (ascension_level_id, material_id)
        )
    "#,
};

pub const SKILL_COSTS: Table = Table {
    name: "skill_costs",
    columns: &["id", "skill_level_id", "material_id", "amount"],
    references: &["skill_levels", "materials"],
    create: r#"
        CREATE TABLE skill_costs (
            id INTEGER PRIMARY KEY,
            skill_level_id INTEGER NOT NULL REFERENCES skill_levels(id),
            material_id INTEGER NOT NULL REFERENCES materials(id),
            amount INTEGER NOT NULL,

            UNIQUE (skill_level_id, material_id)
        )
    "#,
};

/// Every managed table, in create order. Dropping walks it backwards.
pub const TABLES: [&Table; 7] = [
    &MATERIALS,
    &CLASSES,
    &SERVANTS,
    &ASCENSION_LEVELS,
    &SKILL_LEVELS,
    &ASCENSION_COSTS,
    &SKILL_COSTS,
];

/// Issues DROP / CREATE for the managed tables in foreign key order.
pub struct SchemaManager {
    tables: &'static [&'static Table],
}

impl SchemaManager {
    pub fn new() -> Self {
        Self { tables: &TABLES }
    }

    pub fn create_order(&self) -> impl Iterator<Item = &'static Table> + '_ {
        self.tables.iter().copied()
    }

    pub fn drop_order(&self) -> impl Iterator<Item = &'static Table> + '_ {
        self.tables.iter().rev().copied()
    }

    /// Groups tables by dependency depth. Tables sharing a tier have no
    /// foreign key between them; every tier only references earlier tiers.
    pub fn load_tiers(&self) -> Vec<Vec<&'static Table>> {
        let mut depths: Vec<(&'static Table, usize)> = Vec::with_capacity(self.tables.len());

        // Create order is already topological, so referenced depths are known.
        for table in self.create_order() {
            let depth = table
                .references
                .iter()
                .filter_map(|r| depths.iter().find(|(t, _)| t.name == *r))
                .map(|(_, d)| d + 1)
                .max()
                .unwrap_or(0);
            depths.push((table, depth));
        }

        let max_depth = depths.iter().map(|(_, d)| *d).max().unwrap_or(0);
        (0..=max_depth)
            .map(|depth| {
                depths
                    .iter()
                    .filter(|(_, d)| *d == depth)
                    .map(|(t, _)| *t)
                    .collect()
            })
            .collect()
    }

    pub async fn drop_all(&self, conn: &mut PgConnection) -> Result<()> {
        for table in self.drop_order() {
            debug!("Dropping table {}", table.name);
            sqlx::query(&table.drop_statement()).execute(&mut *conn).await?;
        }

        Ok(())
    }

    pub async fn create_all(&self, conn: &mut PgConnection) -> Result<()> {
        for table in self.create_order() {
            debug!("Creating table {}", table.name);
            sqlx::query(table.create).execute(&mut *conn).await?;
        }

        Ok(())
    }

    /// Drops and recreates every table inside one transaction. Nothing is
    /// committed unless the whole sequence succeeds.
    pub async fn reset(&self, pool: &PgPool) -> Result<()> {
        let mut tx = pool.begin().await?;

        let result = match self.drop_all(&mut tx).await {
            Ok(()) => self.create_all(&mut tx).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    debug!("Schema rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new()
    }
}
