//! User command handlers.

use tracing::{info, warn};

use crate::error::{DatabaseError, ServiceError};
use crate::store::Database;
use crate::users::model::{NewUser, User};
use crate::vapi::ToolArguments;

/// Register a caller from `name` / `phone_number`.
///
/// Missing keys become empty strings. A phone number that is already
/// registered fails with [`ServiceError::UserAlreadyExists`] and nothing is
/// written.
pub async fn create_user(db: &dyn Database, args: &ToolArguments) -> Result<User, ServiceError> {
    let phone_number = args.str_or_empty("phone_number").trim();
    let name = args.str_or_empty("name");

    if db.find_user_by_phone(phone_number).await?.is_some() {
        warn!(phone_number, "User already exists");
        return Err(ServiceError::UserAlreadyExists);
    }

    match db.create_user(&NewUser::new(name, phone_number)).await {
        Ok(user) => {
            info!(id = user.id, "User created");
            Ok(user)
        }
        // Lost a race against a concurrent registration of the same number.
        Err(DatabaseError::Constraint(_)) => Err(ServiceError::UserAlreadyExists),
        Err(e) => Err(e.into()),
    }
}

/// Every registered user, unpaginated.
pub async fn list_users(db: &dyn Database) -> Result<Vec<User>, ServiceError> {
    Ok(db.list_users().await?)
}
