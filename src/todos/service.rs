//! Todo command handlers.
//!
//! Every handler resolves the caller by `phone_number` (trimmed). Only
//! [`create_todo`] provisions a missing user; the others fail with
//! [`ServiceError::UserNotFound`].

use tracing::{debug, info, warn};

use crate::error::{DatabaseError, ServiceError};
use crate::store::Database;
use crate::todos::model::{NewTodo, TodoItem, TodoSummary};
use crate::users::model::{NewUser, User};
use crate::vapi::ToolArguments;

fn phone_number(args: &ToolArguments) -> &str {
    args.str_or_empty("phone_number").trim()
}

async fn require_user(db: &dyn Database, phone_number: &str) -> Result<User, ServiceError> {
    match db.find_user_by_phone(phone_number).await? {
        Some(user) => Ok(user),
        None => {
            warn!(phone_number, "User not found");
            Err(ServiceError::UserNotFound)
        }
    }
}

/// The caller's first todo whose title contains the `title` argument.
async fn find_owned_todo(db: &dyn Database, args: &ToolArguments) -> Result<TodoItem, ServiceError> {
    let user = require_user(db, phone_number(args)).await?;

    let Some(fragment) = args.trimmed("title") else {
        return Err(ServiceError::InvalidRequest("Missing To-Do title".to_string()));
    };

    match db.find_todo_by_title(user.id, fragment).await? {
        Some(todo) => {
            debug!(id = todo.id, fragment, "Matched todo by title");
            Ok(todo)
        }
        None => {
            warn!(owner_id = user.id, fragment, "Todo not found");
            Err(ServiceError::TodoNotFound)
        }
    }
}

/// Add a todo for the caller, registering them first if the phone number is
/// unknown.
pub async fn create_todo(db: &dyn Database, args: &ToolArguments) -> Result<TodoItem, ServiceError> {
    let phone_number = phone_number(args);
    let new_todo = NewTodo::new(args.str_or_empty("title"))
        .with_description(args.str_or_empty("description"));

    if let Some(user) = db.find_user_by_phone(phone_number).await? {
        let todo = db.create_todo(user.id, &new_todo).await?;
        info!(id = todo.id, owner_id = user.id, "Todo created");
        return Ok(todo);
    }

    let new_user = NewUser::new(args.str_or_empty("name"), phone_number);
    match db.create_user_with_todo(&new_user, &new_todo).await {
        Ok((user, todo)) => {
            info!(id = todo.id, owner_id = user.id, "Todo created for new user");
            Ok(todo)
        }
        // Someone registered this number since the lookup; use their row.
        Err(DatabaseError::Constraint(_)) => {
            let user = require_user(db, phone_number).await?;
            let todo = db.create_todo(user.id, &new_todo).await?;
            info!(id = todo.id, owner_id = user.id, "Todo created");
            Ok(todo)
        }
        Err(e) => Err(e.into()),
    }
}

/// All of the caller's todos in insertion order.
pub async fn list_todos(
    db: &dyn Database,
    args: &ToolArguments,
) -> Result<Vec<TodoSummary>, ServiceError> {
    let user = require_user(db, phone_number(args)).await?;
    let todos = db.list_todos(user.id).await?;
    debug!(owner_id = user.id, count = todos.len(), "Listed todos");
    Ok(todos.iter().map(TodoItem::summary).collect())
}

/// Mark the caller's first todo matching `title` as completed.
pub async fn complete_todo(
    db: &dyn Database,
    args: &ToolArguments,
) -> Result<TodoItem, ServiceError> {
    let todo = find_owned_todo(db, args).await?;
    if !db.complete_todo(todo.id).await? {
        return Err(ServiceError::TodoNotFound);
    }
    info!(id = todo.id, "Todo completed");
    Ok(TodoItem {
        completed: true,
        ..todo
    })
}

/// Permanently remove the caller's first todo matching `title`.
pub async fn delete_todo(db: &dyn Database, args: &ToolArguments) -> Result<TodoItem, ServiceError> {
    let todo = find_owned_todo(db, args).await?;
    if !db.delete_todo(todo.id).await? {
        return Err(ServiceError::TodoNotFound);
    }
    info!(id = todo.id, "Todo deleted");
    Ok(todo)
}
