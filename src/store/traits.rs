//! The async `Database` trait, the single interface for all persistence.

use async_trait::async_trait;

use crate::error::DatabaseError;
use crate::todos::model::{NewTodo, TodoItem};
use crate::users::model::{NewUser, User};

/// Backend-agnostic database trait covering users and their todos.
///
/// Reads within one method are snapshot-consistent; nothing spans methods.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Users ───────────────────────────────────────────────────────

    /// Insert a user. A duplicate phone number fails with
    /// [`DatabaseError::Constraint`].
    async fn create_user(&self, user: &NewUser) -> Result<User, DatabaseError>;

    /// Get a user by id.
    async fn get_user(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Exact-match lookup by phone number.
    async fn find_user_by_phone(&self, phone_number: &str) -> Result<Option<User>, DatabaseError>;

    /// All users in id order.
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// Delete a user and, by cascade, all of their todos.
    /// Returns `false` if no such user existed.
    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError>;

    // ── Todos ───────────────────────────────────────────────────────

    /// Insert an incomplete todo owned by `owner_id`.
    async fn create_todo(&self, owner_id: i64, todo: &NewTodo) -> Result<TodoItem, DatabaseError>;

    /// Insert a user and a first todo for them atomically.
    async fn create_user_with_todo(
        &self,
        user: &NewUser,
        todo: &NewTodo,
    ) -> Result<(User, TodoItem), DatabaseError>;

    /// Get a todo by id.
    async fn get_todo(&self, id: i64) -> Result<Option<TodoItem>, DatabaseError>;

    /// All todos of a user in insertion order.
    async fn list_todos(&self, owner_id: i64) -> Result<Vec<TodoItem>, DatabaseError>;

    /// First todo (insertion order) of `owner_id` whose title contains
    /// `fragment`, ignoring ASCII case. Wildcard characters in `fragment`
    /// match literally.
    async fn find_todo_by_title(
        &self,
        owner_id: i64,
        fragment: &str,
    ) -> Result<Option<TodoItem>, DatabaseError>;

    /// Mark a todo completed. Returns `false` if no such todo existed.
    async fn complete_todo(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Permanently delete a todo. Returns `false` if no such todo existed.
    async fn delete_todo(&self, id: i64) -> Result<bool, DatabaseError>;
}
