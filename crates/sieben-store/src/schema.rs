// schema.rs — Versioned schema migrations.
//
// Applied migrations are recorded in `schema_migrations`; anything missing
// from that table is applied in order, each inside its own transaction
// together with its bookkeeping row.

use rusqlite::Connection;

use crate::error::StoreError;

struct Migration {
    version: &'static str,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "001",
        name: "initial",
        sql: include_str!("migrations/001_initial.sql"),
    },
    Migration {
        version: "002",
        name: "settings",
        sql: include_str!("migrations/002_settings.sql"),
    },
];

pub(crate) fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    run_migrations_up_to(conn, MIGRATIONS.len())
}

/// Apply only the first `count` migrations. Used to stage older layouts.
pub(crate) fn run_migrations_up_to(conn: &Connection, count: usize) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;

    let applied = applied_versions(conn)?;
    for migration in MIGRATIONS.iter().take(count) {
        if !applied.iter().any(|v| v == migration.version) {
            apply_migration(conn, migration)?;
        }
    }
    Ok(())
}

pub(crate) fn applied_versions(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(versions)
}

fn apply_migration(conn: &Connection, migration: &Migration) -> Result<(), StoreError> {
    tracing::info!(
        "Applying migration {}: {}",
        migration.version,
        migration.name
    );

    let failed = |source| StoreError::Migration {
        version: migration.version,
        name: migration.name,
        source,
    };

    let tx = conn.unchecked_transaction().map_err(failed)?;
    tx.execute_batch(migration.sql).map_err(failed)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        (migration.version, migration.name, chrono::Utc::now().to_rfc3339()),
    )
    .map_err(failed)?;
    tx.commit().map_err(failed)?;

    tracing::info!("Migration {} applied successfully", migration.version);
    Ok(())
}
