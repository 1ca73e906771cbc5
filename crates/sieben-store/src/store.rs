// store.rs — GoalStore: a goal graph persisted in SQLite.
//
// Layout (after all migrations):
//   goals(goal_id, name, open)     one row per id, tombstones have NULL name
//   edges(parent, child)           in insertion order (rowid)
//   settings(name, goal)           `selection`, `previous_selection`
//
// `save` rewrites all three tables in one transaction; `load` reads them
// back and hands them to `Goals::build`, so a corrupt file is refused
// instead of producing a graph that breaks its own invariants.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use sieben_goal::{EdgeRow, GoalId, GoalRow, Goals};

use crate::error::StoreError;
use crate::schema;

/// Persistent store for one goal graph.
pub struct GoalStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl GoalStore {
    /// Open (or create) a database file and bring its schema up to date.
    /// Creates the parent directory if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let conn = Connection::open(&path)?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.migrate()?;
        Ok(store)
    }

    /// A throwaway store, mostly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Apply any pending schema migrations. Safe to call repeatedly.
    pub fn migrate(&self) -> Result<(), StoreError> {
        schema::run_migrations(&self.conn)
    }

    /// Versions of every migration applied to this database, oldest first.
    pub fn applied_versions(&self) -> Result<Vec<String>, StoreError> {
        schema::applied_versions(&self.conn)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replace the stored graph with `goals`.
    pub fn save(&mut self, goals: &Goals) -> Result<(), StoreError> {
        let rows = goals.export();
        let tx = self.conn.transaction()?;
        tx.execute_batch("DELETE FROM goals; DELETE FROM edges; DELETE FROM settings;")?;
        {
            let mut insert_goal =
                tx.prepare("INSERT INTO goals (goal_id, name, open) VALUES (?1, ?2, ?3)")?;
            for goal in &rows.goals {
                insert_goal.execute((to_sql(goal.goal_id), &goal.name, goal.open))?;
            }

            let mut insert_edge = tx.prepare("INSERT INTO edges (parent, child) VALUES (?1, ?2)")?;
            for edge in &rows.edges {
                insert_edge.execute((to_sql(edge.parent), to_sql(edge.child)))?;
            }

            let mut insert_setting = tx.prepare("INSERT INTO settings (name, goal) VALUES (?1, ?2)")?;
            for (name, goal) in &rows.settings {
                insert_setting.execute((name, to_sql(*goal)))?;
            }
        }
        tx.commit()?;

        tracing::info!(
            goals = rows.goals.len(),
            edges = rows.edges.len(),
            "goal graph saved"
        );
        Ok(())
    }

    /// Load the stored graph. Returns `None` when the database holds no goals.
    pub fn load(&self) -> Result<Option<Goals>, StoreError> {
        let goals = self.read_goals()?;
        if goals.is_empty() {
            return Ok(None);
        }
        let edges = self.read_edges()?;
        let settings = self.read_settings()?;

        let built = Goals::build(goals, edges, settings)?;
        tracing::info!(goals = built.live_count(), "goal graph loaded");
        Ok(Some(built))
    }

    /// Load the stored graph, or start a fresh one whose root is `root_name`.
    pub fn load_or_new(&self, root_name: &str) -> Result<Goals, StoreError> {
        match self.load()? {
            Some(goals) => Ok(goals),
            None => {
                tracing::info!(root_name, "no stored goals, starting a new graph");
                Ok(Goals::new(root_name))
            }
        }
    }

    fn read_goals(&self) -> Result<Vec<GoalRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT goal_id, name, open FROM goals ORDER BY goal_id")?;
        let goals = stmt
            .query_map([], |row| {
                Ok(GoalRow {
                    goal_id: goal_id_at(row, 0)?,
                    name: row.get(1)?,
                    open: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    fn read_edges(&self) -> Result<Vec<EdgeRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT parent, child FROM edges ORDER BY rowid")?;
        let edges = stmt
            .query_map([], |row| {
                Ok(EdgeRow::new(goal_id_at(row, 0)?, goal_id_at(row, 1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    fn read_settings(&self) -> Result<Vec<(String, GoalId)>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name, goal FROM settings")?;
        let settings = stmt
            .query_map([], |row| Ok((row.get(0)?, goal_id_at(row, 1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(settings)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

// SQLite integers are signed; goal ids never come close to i64::MAX.
fn to_sql(id: GoalId) -> i64 {
    id as i64
}

/// Read a goal id column. Negative values are corrupt data, not ids.
fn goal_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<GoalId> {
    let value: i64 = row.get(idx)?;
    GoalId::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
