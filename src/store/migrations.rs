//! Schema migrations for the libSQL backend.
//!
//! Applied versions are recorded in `_migrations`. Each pending step runs in
//! its own transaction together with its version record, so a failed step
//! leaves the schema at the previous version.

use libsql::Connection;
use tracing::info;

use crate::error::DatabaseError;

/// One schema step.
struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by version; new steps go last.
static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                phone_number TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_todos_owner ON todos(owner_id);
        "#,
    },
    Migration {
        version: 2,
        name: "todo_title_index",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_todos_title ON todos(title);
        "#,
    },
];

/// Bring the schema up to the latest version. A no-op when nothing is
/// pending.
pub async fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .await
    .map_err(|e| DatabaseError::Migration(format!("_migrations table: {e}")))?;

    let applied = schema_version(conn).await?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > applied).collect();
    if pending.is_empty() {
        return Ok(());
    }

    for step in pending {
        info!(version = step.version, name = step.name, "Applying migration");
        apply(conn, step).await?;
    }

    let version = schema_version(conn).await?;
    info!(version, "Schema up to date");
    Ok(())
}

async fn apply(conn: &Connection, step: &Migration) -> Result<(), DatabaseError> {
    let fail = |stage: &str, e: libsql::Error| {
        DatabaseError::Migration(format!("V{} {} {stage}: {e}", step.version, step.name))
    };

    let tx = conn.transaction().await.map_err(|e| fail("begin", e))?;
    if let Err(e) = tx.execute_batch(step.sql).await {
        tx.rollback().await.ok();
        return Err(fail("apply", e));
    }
    if let Err(e) = tx
        .execute(
            "INSERT INTO _migrations (version, name) VALUES (?1, ?2)",
            libsql::params![step.version, step.name],
        )
        .await
    {
        tx.rollback().await.ok();
        return Err(fail("record", e));
    }
    tx.commit().await.map_err(|e| fail("commit", e))
}

/// Highest recorded version, 0 on a fresh database.
async fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM _migrations", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("schema version: {e}")))?;

    let Some(row) = rows
        .next()
        .await
        .map_err(|e| DatabaseError::Migration(format!("schema version row: {e}")))?
    else {
        return Ok(0);
    };
    row.get::<i64>(0)
        .map_err(|e| DatabaseError::Migration(format!("schema version value: {e}")))
}
