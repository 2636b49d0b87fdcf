//! libSQL implementation of the async `Database` trait.
//!
//! Supports local file and in-memory databases.

use std::path::Path;

use async_trait::async_trait;
use libsql::params::IntoParams;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::Database;
use crate::todos::model::{NewTodo, TodoItem};
use crate::users::model::{NewUser, User};

/// libSQL database backend.
///
/// Holds a single connection. Every operation keeps the connection locked
/// until it finishes, so statements of concurrent requests never land inside
/// another request's transaction.
pub struct LibSqlBackend {
    _db: LibSqlDatabase,
    conn: Mutex<Connection>,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::connect(db).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        Self::connect(db).await
    }

    async fn connect(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        // SQLite leaves foreign keys off per connection; the todo cascade needs them.
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to enable foreign keys: {e}")))?;

        let backend = Self {
            _db: db,
            conn: Mutex::new(conn),
        };
        backend.run_migrations().await?;
        Ok(backend)
    }
}

// ── Helper functions ────────────────────────────────────────────────

const USER_COLUMNS: &str = "id, name, phone_number";

const TODO_COLUMNS: &str = "id, owner_id, title, description, completed";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    let id: i64 = row.get(0).map_err(|e| DatabaseError::Query(format!("user.id: {e}")))?;
    let name: String = row.get(1).map_err(|e| DatabaseError::Query(format!("user.name: {e}")))?;
    let phone_number: String = row
        .get(2)
        .map_err(|e| DatabaseError::Query(format!("user.phone_number: {e}")))?;
    Ok(User {
        id,
        name,
        phone_number,
    })
}

fn row_to_todo(row: &libsql::Row) -> Result<TodoItem, DatabaseError> {
    let id: i64 = row.get(0).map_err(|e| DatabaseError::Query(format!("todo.id: {e}")))?;
    let owner_id: i64 = row
        .get(1)
        .map_err(|e| DatabaseError::Query(format!("todo.owner_id: {e}")))?;
    let title: String = row.get(2).map_err(|e| DatabaseError::Query(format!("todo.title: {e}")))?;

    // NULL and '' both mean "no description".
    let description = row.get::<String>(3).ok().filter(|s| !s.is_empty());

    let completed: i64 = row
        .get(4)
        .map_err(|e| DatabaseError::Query(format!("todo.completed: {e}")))?;

    Ok(TodoItem {
        id,
        owner_id,
        title,
        description,
        completed: completed != 0,
    })
}

/// Build a `LIKE` pattern matching `fragment` anywhere, with `\` as the
/// escape character for literal `%`, `_` and `\`.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

async fn query_users(
    conn: &Connection,
    op: &str,
    sql: &str,
    params: impl IntoParams,
) -> Result<Vec<User>, DatabaseError> {
    let mut rows = conn
        .query(sql, params)
        .await
        .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;

    let mut users = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .map_err(|e| DatabaseError::Query(format!("{op} row: {e}")))?
    {
        users.push(row_to_user(&row)?);
    }
    Ok(users)
}

async fn query_todos(
    conn: &Connection,
    op: &str,
    sql: &str,
    params: impl IntoParams,
) -> Result<Vec<TodoItem>, DatabaseError> {
    let mut rows = conn
        .query(sql, params)
        .await
        .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;

    let mut todos = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .map_err(|e| DatabaseError::Query(format!("{op} row: {e}")))?
    {
        todos.push(row_to_todo(&row)?);
    }
    Ok(todos)
}

async fn insert_user(conn: &Connection, user: &NewUser) -> Result<User, DatabaseError> {
    conn.execute(
        "INSERT INTO users (name, phone_number) VALUES (?1, ?2)",
        params![user.name.as_str(), user.phone_number.as_str()],
    )
    .await
    .map_err(|e| DatabaseError::from_libsql("create_user", e))?;

    let created = User {
        id: conn.last_insert_rowid(),
        name: user.name.clone(),
        phone_number: user.phone_number.clone(),
    };
    debug!(id = created.id, "User created");
    Ok(created)
}

async fn insert_todo(
    conn: &Connection,
    owner_id: i64,
    todo: &NewTodo,
) -> Result<TodoItem, DatabaseError> {
    conn.execute(
        "INSERT INTO todos (owner_id, title, description, completed) VALUES (?1, ?2, ?3, 0)",
        params![owner_id, todo.title.as_str(), todo.description.as_deref()],
    )
    .await
    .map_err(|e| DatabaseError::from_libsql("create_todo", e))?;

    let created = TodoItem {
        id: conn.last_insert_rowid(),
        owner_id,
        title: todo.title.clone(),
        description: todo.description.clone(),
        completed: false,
    };
    debug!(id = created.id, owner_id, "Todo created");
    Ok(created)
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let conn = self.conn.lock().await;
        migrations::run_migrations(&conn).await
    }

    // ── Users ───────────────────────────────────────────────────────

    async fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let conn = self.conn.lock().await;
        insert_user(&conn, user).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let conn = self.conn.lock().await;
        let users = query_users(
            &conn,
            "get_user",
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
        )
        .await?;
        Ok(users.into_iter().next())
    }

    async fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<User>, DatabaseError> {
        let conn = self.conn.lock().await;
        let users = query_users(
            &conn,
            "find_user_by_phone",
            &format!("SELECT {USER_COLUMNS} FROM users WHERE phone_number = ?1 LIMIT 1"),
            params![phone_number],
        )
        .await?;
        Ok(users.into_iter().next())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let conn = self.conn.lock().await;
        query_users(
            &conn,
            "list_users",
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"),
            (),
        )
        .await
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.conn.lock().await;
        let count = conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_user: {e}")))?;
        Ok(count > 0)
    }

    // ── Todos ───────────────────────────────────────────────────────

    async fn create_todo(&self, owner_id: i64, todo: &NewTodo) -> Result<TodoItem, DatabaseError> {
        let conn = self.conn.lock().await;
        insert_todo(&conn, owner_id, todo).await
    }

    async fn create_user_with_todo(
        &self,
        user: &NewUser,
        todo: &NewTodo,
    ) -> Result<(User, TodoItem), DatabaseError> {
        let conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| DatabaseError::Query(format!("create_user_with_todo begin: {e}")))?;

        let result = async {
            let created_user = insert_user(&tx, user).await?;
            let created_todo = insert_todo(&tx, created_user.id, todo).await?;
            Ok::<_, DatabaseError>((created_user, created_todo))
        }
        .await;

        match result {
            Ok(pair) => {
                tx.commit().await.map_err(|e| {
                    DatabaseError::Query(format!("create_user_with_todo commit: {e}"))
                })?;
                Ok(pair)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn get_todo(&self, id: i64) -> Result<Option<TodoItem>, DatabaseError> {
        let conn = self.conn.lock().await;
        let todos = query_todos(
            &conn,
            "get_todo",
            &format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1"),
            params![id],
        )
        .await?;
        Ok(todos.into_iter().next())
    }

    async fn list_todos(&self, owner_id: i64) -> Result<Vec<TodoItem>, DatabaseError> {
        let conn = self.conn.lock().await;
        query_todos(
            &conn,
            "list_todos",
            &format!("SELECT {TODO_COLUMNS} FROM todos WHERE owner_id = ?1 ORDER BY id ASC"),
            params![owner_id],
        )
        .await
    }

    async fn find_todo_by_title(
        &self,
        owner_id: i64,
        fragment: &str,
    ) -> Result<Option<TodoItem>, DatabaseError> {
        let conn = self.conn.lock().await;
        let todos = query_todos(
            &conn,
            "find_todo_by_title",
            &format!(
                "SELECT {TODO_COLUMNS} FROM todos \
                 WHERE owner_id = ?1 AND title LIKE ?2 ESCAPE '\\' \
                 ORDER BY id ASC LIMIT 1"
            ),
            params![owner_id, like_pattern(fragment)],
        )
        .await?;
        Ok(todos.into_iter().next())
    }

    async fn complete_todo(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.conn.lock().await;
        let count = conn
            .execute("UPDATE todos SET completed = 1 WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::Query(format!("complete_todo: {e}")))?;
        Ok(count > 0)
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, DatabaseError> {
        let conn = self.conn.lock().await;
        let count = conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])
            .await
            .map_err(|e| DatabaseError::Query(format!("delete_todo: {e}")))?;
        Ok(count > 0)
    }
}
