//! SQLite persistence for a goal assignment.
//!
//! One `goals` table holds the whole hierarchy: a `high` row, one `mid` row
//! per mid goal pointing at the high row, one `low` row per linked low goal
//! pointing at its mid row. Every save replaces the previous contents.

use crate::assignment::GoalAssignment;
use crate::tree::Level;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_DB_FILE: &str = "goals.db";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS goals (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              level TEXT,
              content TEXT,
              parent_id INTEGER
            );
            "#,
        )?;
        Ok(())
    }

    /// Replace the stored hierarchy with `assignment`. Pool entries that are
    /// not linked to a mid goal are not stored.
    pub fn save(&mut self, assignment: &GoalAssignment) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM goals", [])?;
        tx.execute(
            "INSERT INTO goals (level, content) VALUES (?1, ?2)",
            params![Level::High.as_str(), assignment.high_goal],
        )?;
        let high_id = tx.last_insert_rowid();

        let mut low_rows = 0usize;
        for (i, mid) in assignment.mid_goals.iter().enumerate() {
            tx.execute(
                "INSERT INTO goals (level, content, parent_id) VALUES (?1, ?2, ?3)",
                params![Level::Mid.as_str(), mid, high_id],
            )?;
            let mid_id = tx.last_insert_rowid();

            for low in assignment.low_goals_for(i) {
                tx.execute(
                    "INSERT INTO goals (level, content, parent_id) VALUES (?1, ?2, ?3)",
                    params![Level::Low.as_str(), low, mid_id],
                )?;
                low_rows += 1;
            }
        }

        tx.commit()?;
        log::info!(
            "saved goals: {} mid, {} low",
            assignment.mid_goals.len(),
            low_rows
        );
        Ok(())
    }

    /// Load the stored hierarchy. An empty store yields an empty assignment.
    pub fn load(&self) -> Result<GoalAssignment, StoreError> {
        let high_goal: Option<String> = self
            .conn
            .query_row(
                "SELECT content FROM goals WHERE level = ?1 ORDER BY id LIMIT 1",
                params![Level::High.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        let mut mid_stmt = self
            .conn
            .prepare("SELECT id, content FROM goals WHERE level = ?1 ORDER BY id")?;
        let mids = mid_stmt
            .query_map(params![Level::Mid.as_str()], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut low_stmt = self.conn.prepare(
            "SELECT content FROM goals WHERE level = ?1 AND parent_id = ?2 ORDER BY id",
        )?;

        let mut assignment = GoalAssignment::new(high_goal.unwrap_or_default());
        let mut mapping: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (i, (mid_id, content)) in mids.into_iter().enumerate() {
            assignment.mid_goals.push(content.unwrap_or_default());

            let lows = low_stmt
                .query_map(params![Level::Low.as_str(), mid_id], |row| {
                    row.get::<_, Option<String>>(0)
                })?
                .map(|r| r.map(Option::unwrap_or_default))
                .collect::<Result<Vec<_>, _>>()?;
            if !lows.is_empty() {
                mapping.insert(i, lows);
            }
        }

        for low in mapping.values().flatten() {
            if !assignment.low_goals.contains(low) {
                assignment.low_goals.push(low.clone());
            }
        }
        assignment.low_goals_by_mid_index = mapping;

        log::info!(
            "loaded goals: {} mid, {} low",
            assignment.mid_goals.len(),
            assignment.low_goals.len()
        );
        Ok(assignment)
    }
}
